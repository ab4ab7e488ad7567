//! Minimal 2D drawing capability used by every effect.
//!
//! Effects paint through the [`Surface`] trait so the same code drives a
//! browser canvas ([`CanvasSurface`]) and the in-memory [`RecordingSurface`]
//! used by tests. Gradients borrow their stops from the caller's stack, so a
//! frame never allocates gradient buffers.

use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::BackdropError;
use super::theme::Color;
use super::viewport::Viewport;

/// One color stop of a gradient, `offset` in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
	pub offset: f64,
	pub color: Color,
}

impl GradientStop {
	pub const fn new(offset: f64, color: Color) -> Self {
		Self { offset, color }
	}
}

/// Gradient geometry plus its stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gradient<'a> {
	Linear {
		from: (f64, f64),
		to: (f64, f64),
		stops: &'a [GradientStop],
	},
	Radial {
		center: (f64, f64),
		inner_radius: f64,
		outer_radius: f64,
		stops: &'a [GradientStop],
	},
}

impl Gradient<'_> {
	pub fn stops(&self) -> &[GradientStop] {
		match self {
			Gradient::Linear { stops, .. } | Gradient::Radial { stops, .. } => stops,
		}
	}
}

/// Fill or stroke style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint<'a> {
	Solid(Color),
	Gradient(Gradient<'a>),
}

impl From<Color> for Paint<'_> {
	fn from(color: Color) -> Self {
		Paint::Solid(color)
	}
}

/// A 2D drawing target.
pub trait Surface {
	fn viewport(&self) -> Viewport;

	/// Resizes the backing store; contents are lost.
	fn resize(&mut self, viewport: Viewport);

	/// Erases the whole surface to transparent.
	fn clear(&mut self);

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint<'_>);

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: Paint<'_>);

	/// Strokes a round-capped line segment.
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: Paint<'_>);

	/// Fills a closed polygon. Fewer than three points draws nothing.
	fn fill_polygon(&mut self, points: &[(f64, f64)], paint: Paint<'_>);
}

/// [`Surface`] backed by an HTML canvas 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	viewport: Viewport,
}

impl CanvasSurface {
	/// Acquires the 2D context; fails when the environment has none.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, BackdropError> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(BackdropError::from)?
			.ok_or(BackdropError::ContextUnavailable)?
			.dyn_into()
			.map_err(|_| BackdropError::ContextUnavailable)?;
		let viewport = Viewport::new(canvas.width() as f64, canvas.height() as f64);
		Ok(Self {
			canvas,
			ctx,
			viewport,
		})
	}

	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}

	/// Encodes the current pixels as a PNG data URI.
	pub fn to_data_url(&self) -> Result<String, BackdropError> {
		self.canvas
			.to_data_url_with_type("image/png")
			.map_err(BackdropError::from)
	}

	fn gradient(&self, gradient: &Gradient<'_>) -> Option<CanvasGradient> {
		let canvas_gradient = match *gradient {
			Gradient::Linear { from, to, .. } => {
				self.ctx.create_linear_gradient(from.0, from.1, to.0, to.1)
			}
			Gradient::Radial {
				center,
				inner_radius,
				outer_radius,
				..
			} => self
				.ctx
				.create_radial_gradient(
					center.0,
					center.1,
					inner_radius.max(0.0),
					center.0,
					center.1,
					outer_radius.max(0.0),
				)
				.ok()?,
		};
		for stop in gradient.stops() {
			let _ = canvas_gradient.add_color_stop(stop.offset.clamp(0.0, 1.0) as f32, &stop.color.to_css());
		}
		Some(canvas_gradient)
	}

	fn set_fill(&self, paint: Paint<'_>) {
		match paint {
			Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
			Paint::Gradient(g) => {
				if let Some(canvas_gradient) = self.gradient(&g) {
					#[allow(deprecated)]
					self.ctx.set_fill_style(&canvas_gradient);
				}
			}
		}
	}

	fn set_stroke(&self, paint: Paint<'_>) {
		match paint {
			Paint::Solid(color) => self.ctx.set_stroke_style_str(&color.to_css()),
			Paint::Gradient(g) => {
				if let Some(canvas_gradient) = self.gradient(&g) {
					#[allow(deprecated)]
					self.ctx.set_stroke_style(&canvas_gradient);
				}
			}
		}
	}
}

impl Surface for CanvasSurface {
	fn viewport(&self) -> Viewport {
		self.viewport
	}

	fn resize(&mut self, viewport: Viewport) {
		self.canvas.set_width(viewport.width as u32);
		self.canvas.set_height(viewport.height as u32);
		self.viewport = viewport;
	}

	fn clear(&mut self) {
		self.ctx
			.clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint<'_>) {
		self.set_fill(paint);
		self.ctx.fill_rect(x, y, width, height);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: Paint<'_>) {
		if radius <= 0.0 {
			return;
		}
		self.set_fill(paint);
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
		self.ctx.fill();
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: Paint<'_>) {
		self.set_stroke(paint);
		self.ctx.set_line_width(width);
		self.ctx.set_line_cap("round");
		self.ctx.begin_path();
		self.ctx.move_to(from.0, from.1);
		self.ctx.line_to(to.0, to.1);
		self.ctx.stroke();
	}

	fn fill_polygon(&mut self, points: &[(f64, f64)], paint: Paint<'_>) {
		let [first, rest @ ..] = points else {
			return;
		};
		if rest.len() < 2 {
			return;
		}
		self.set_fill(paint);
		self.ctx.begin_path();
		self.ctx.move_to(first.0, first.1);
		for &(x, y) in rest {
			self.ctx.line_to(x, y);
		}
		self.ctx.close_path();
		self.ctx.fill();
	}
}

/// Owned copy of a [`Paint`], as captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedPaint {
	Solid(Color),
	Linear { stops: Vec<GradientStop> },
	Radial { outer_radius: f64, stops: Vec<GradientStop> },
}

impl RecordedPaint {
	/// Largest alpha this paint can produce.
	pub fn max_alpha(&self) -> f64 {
		match self {
			RecordedPaint::Solid(c) => c.a,
			RecordedPaint::Linear { stops } | RecordedPaint::Radial { stops, .. } => {
				stops.iter().map(|s| s.color.a).fold(0.0, f64::max)
			}
		}
	}
}

impl From<Paint<'_>> for RecordedPaint {
	fn from(paint: Paint<'_>) -> Self {
		match paint {
			Paint::Solid(c) => RecordedPaint::Solid(c),
			Paint::Gradient(Gradient::Linear { stops, .. }) => RecordedPaint::Linear {
				stops: stops.to_vec(),
			},
			Paint::Gradient(Gradient::Radial {
				outer_radius,
				stops,
				..
			}) => RecordedPaint::Radial {
				outer_radius,
				stops: stops.to_vec(),
			},
		}
	}
}

/// A recorded draw operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
	Clear,
	Rect {
		x: f64,
		y: f64,
		width: f64,
		height: f64,
		paint: RecordedPaint,
	},
	Circle {
		x: f64,
		y: f64,
		radius: f64,
		paint: RecordedPaint,
	},
	Line {
		from: (f64, f64),
		to: (f64, f64),
		width: f64,
		paint: RecordedPaint,
	},
	Polygon {
		points: Vec<(f64, f64)>,
		paint: RecordedPaint,
	},
}

impl DrawOp {
	pub fn paint(&self) -> Option<&RecordedPaint> {
		match self {
			DrawOp::Clear => None,
			DrawOp::Rect { paint, .. }
			| DrawOp::Circle { paint, .. }
			| DrawOp::Line { paint, .. }
			| DrawOp::Polygon { paint, .. } => Some(paint),
		}
	}
}

/// [`Surface`] that records every operation instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	viewport: Viewport,
	ops: Vec<DrawOp>,
}

impl RecordingSurface {
	pub fn new(viewport: Viewport) -> Self {
		Self {
			viewport,
			ops: Vec::new(),
		}
	}

	pub fn ops(&self) -> &[DrawOp] {
		&self.ops
	}

	pub fn take_ops(&mut self) -> Vec<DrawOp> {
		std::mem::take(&mut self.ops)
	}

	pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
		self.ops.iter().filter(|op| pred(op)).count()
	}

	pub fn circles(&self) -> usize {
		self.count(|op| matches!(op, DrawOp::Circle { .. }))
	}

	pub fn lines(&self) -> usize {
		self.count(|op| matches!(op, DrawOp::Line { .. }))
	}
}

impl Surface for RecordingSurface {
	fn viewport(&self) -> Viewport {
		self.viewport
	}

	fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
	}

	fn clear(&mut self) {
		self.ops.push(DrawOp::Clear);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint<'_>) {
		self.ops.push(DrawOp::Rect {
			x,
			y,
			width,
			height,
			paint: paint.into(),
		});
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: Paint<'_>) {
		self.ops.push(DrawOp::Circle {
			x,
			y,
			radius,
			paint: paint.into(),
		});
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, paint: Paint<'_>) {
		self.ops.push(DrawOp::Line {
			from,
			to,
			width,
			paint: paint.into(),
		});
	}

	fn fill_polygon(&mut self, points: &[(f64, f64)], paint: Paint<'_>) {
		if points.len() < 3 {
			return;
		}
		self.ops.push(DrawOp::Polygon {
			points: points.to_vec(),
			paint: paint.into(),
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recording_surface_captures_gradient_stops() {
		let stops = [
			GradientStop::new(0.0, Color::WHITE),
			GradientStop::new(1.0, Color::TRANSPARENT),
		];
		let mut surface = RecordingSurface::new(Viewport::new(10.0, 10.0));
		surface.clear();
		surface.fill_circle(
			1.0,
			2.0,
			3.0,
			Paint::Gradient(Gradient::Radial {
				center: (1.0, 2.0),
				inner_radius: 0.0,
				outer_radius: 3.0,
				stops: &stops,
			}),
		);
		assert_eq!(surface.ops()[0], DrawOp::Clear);
		let paint = surface.ops()[1].paint().cloned();
		assert_eq!(
			paint,
			Some(RecordedPaint::Radial {
				outer_radius: 3.0,
				stops: stops.to_vec()
			})
		);
		assert_eq!(paint.map(|p| p.max_alpha()), Some(1.0));
	}

	#[test]
	fn degenerate_polygons_are_skipped() {
		let mut surface = RecordingSurface::new(Viewport::new(10.0, 10.0));
		surface.fill_polygon(&[(0.0, 0.0), (1.0, 1.0)], Color::WHITE.into());
		assert!(surface.ops().is_empty());
	}
}
