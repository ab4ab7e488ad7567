//! Slowly rotating linear gradient behind everything else.

use std::f64::consts::PI;

use rand::rngs::SmallRng;

use super::config::GradientConfig;
use super::engine::Effect;
use super::pointer::PointerState;
use super::surface::{Gradient, GradientStop, Paint, Surface};
use super::theme::{self, ThemeMode};
use super::update;
use super::viewport::Viewport;

#[derive(Clone, Debug, PartialEq)]
pub struct GradientSweep {
	config: GradientConfig,
	viewport: Viewport,
	angle: f64,
}

impl GradientSweep {
	pub fn new(config: GradientConfig) -> Self {
		Self {
			config,
			viewport: Viewport::default(),
			angle: 0.0,
		}
	}

	pub fn angle(&self) -> f64 {
		self.angle
	}

	/// Gradient axis: through the center, `max(w, h)` out on either side.
	pub fn axis(&self) -> ((f64, f64), (f64, f64)) {
		let (cx, cy) = self.viewport.center();
		let radius = self.viewport.width.max(self.viewport.height);
		(
			(cx + self.angle.cos() * radius, cy + self.angle.sin() * radius),
			(
				cx + (self.angle + PI).cos() * radius,
				cy + (self.angle + PI).sin() * radius,
			),
		)
	}
}

impl Default for GradientSweep {
	fn default() -> Self {
		Self::new(GradientConfig::default())
	}
}

impl Effect for GradientSweep {
	fn name(&self) -> &'static str {
		"gradient"
	}

	fn reseed(&mut self, viewport: Viewport, _theme: ThemeMode, _rng: &mut SmallRng) {
		self.viewport = viewport;
	}

	fn advance(&mut self, elapsed_ms: f64, _time_ms: f64, _pointer: &PointerState, _rng: &mut SmallRng) {
		self.angle = (self.angle + self.config.sweep_speed * update::frames_for(elapsed_ms)).rem_euclid(2.0 * PI);
	}

	fn draw(&self, surface: &mut dyn Surface, theme: ThemeMode) {
		surface.clear();
		if self.viewport.is_empty() {
			return;
		}
		let stops = theme::sweep_stops(theme).map(|(offset, color)| GradientStop::new(offset, color));
		let (from, to) = self.axis();
		surface.fill_rect(
			0.0,
			0.0,
			self.viewport.width,
			self.viewport.height,
			Paint::Gradient(Gradient::Linear {
				from,
				to,
				stops: &stops,
			}),
		);
	}

	fn population(&self) -> usize {
		0
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::super::surface::{DrawOp, RecordedPaint, RecordingSurface};
	use super::*;

	#[test]
	fn sweep_rotates_with_elapsed_time() {
		let mut sweep = GradientSweep::default();
		let mut rng = SmallRng::seed_from_u64(0);
		sweep.reseed(Viewport::new(400.0, 200.0), ThemeMode::Dark, &mut rng);
		sweep.advance(160.0, 160.0, &PointerState::default(), &mut rng);
		assert!((sweep.angle() - 0.01).abs() < 1e-12);
		let ((x0, y0), (x1, y1)) = sweep.axis();
		assert!(((x0 + x1) / 2.0 - 200.0).abs() < 1e-9);
		assert!(((y0 + y1) / 2.0 - 100.0).abs() < 1e-9);
		assert!((((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt() - 800.0).abs() < 1e-9);
	}

	#[test]
	fn fills_whole_surface_with_theme_stops() {
		let mut sweep = GradientSweep::default();
		let mut rng = SmallRng::seed_from_u64(0);
		sweep.reseed(Viewport::new(300.0, 300.0), ThemeMode::Light, &mut rng);
		let mut surface = RecordingSurface::new(Viewport::new(300.0, 300.0));
		sweep.draw(&mut surface, ThemeMode::Light);
		assert_eq!(surface.ops().len(), 2);
		match &surface.ops()[1] {
			DrawOp::Rect {
				width,
				height,
				paint: RecordedPaint::Linear { stops },
				..
			} => {
				assert_eq!((*width, *height), (300.0, 300.0));
				assert_eq!(stops.len(), 4);
				assert_eq!(stops[0].color.r, 240);
			}
			op => panic!("unexpected {op:?}"),
		}
	}
}
