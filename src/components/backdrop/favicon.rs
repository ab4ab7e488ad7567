//! Animated favicon: a lit, spinning "H" over a brand gradient.
//!
//! The mark is three boxes (two upright bars and a crossbar) rendered with a
//! tiny flat-shaded rasterizer: rotate, cull faces pointing away from the
//! camera, sort back to front and fill each face as a polygon.

use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlLinkElement};

use super::BackdropError;
use super::config::FaviconConfig;
use super::engine::Effect;
use super::pointer::PointerState;
use super::surface::{Gradient, GradientStop, Paint, Surface};
use super::theme::{self, Color, ThemeMode};
use super::update;
use super::viewport::Viewport;

type Vec3 = [f64; 3];

const CAMERA_Z: f64 = 3.0;
const FOV_DEGREES: f64 = 75.0;
const AMBIENT: f64 = 0.5;
const LIGHT: Vec3 = [1.0, 1.0, 2.0];

/// (center, size) of each box in the mark.
const BOXES: [(Vec3, Vec3); 3] = [
	([-0.5, 0.0, 0.0], [0.4, 1.8, 0.4]),
	([0.5, 0.0, 0.0], [0.4, 1.8, 0.4]),
	([0.0, 0.0, 0.0], [1.4, 0.4, 0.4]),
];

/// Outward normals of a box, with the two axes spanning each face.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
	([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
	([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
	([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
	([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
	([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
	([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
];

fn dot(a: Vec3, b: Vec3) -> f64 {
	a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(v: Vec3) -> Vec3 {
	let len = dot(v, v).sqrt();
	[v[0] / len, v[1] / len, v[2] / len]
}

/// A face that survived culling, already projected to surface pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedFace {
	pub points: [(f64, f64); 4],
	/// Mean camera-space z; larger is closer to the camera.
	pub depth: f64,
	/// Lambert brightness in [AMBIENT, 1].
	pub brightness: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaviconMark {
	config: FaviconConfig,
	viewport: Viewport,
	rot_x: f64,
	rot_y: f64,
}

impl FaviconMark {
	pub fn new(config: FaviconConfig) -> Self {
		let size = config.size as f64;
		Self {
			config,
			viewport: Viewport::square(size),
			rot_x: 0.0,
			rot_y: 0.0,
		}
	}

	pub fn rotation(&self) -> (f64, f64) {
		(self.rot_x, self.rot_y)
	}

	fn rotate(&self, [x, y, z]: Vec3) -> Vec3 {
		let (sin_x, cos_x) = self.rot_x.sin_cos();
		let (sin_y, cos_y) = self.rot_y.sin_cos();
		let (y1, z1) = (y * cos_x - z * sin_x, y * sin_x + z * cos_x);
		[x * cos_y + z1 * sin_y, y1, -x * sin_y + z1 * cos_y]
	}

	fn project(&self, [x, y, z]: Vec3) -> (f64, f64) {
		let (cx, cy) = self.viewport.center();
		let focal = cy / (FOV_DEGREES.to_radians() / 2.0).tan();
		let depth = CAMERA_Z - z;
		(cx + x * focal / depth, cy - y * focal / depth)
	}

	/// Camera-facing faces of the mark, sorted far to near.
	pub fn visible_faces(&self) -> Vec<ProjectedFace> {
		let light = normalize(LIGHT);
		let mut faces = Vec::with_capacity(BOXES.len() * 3);

		for (center, size) in BOXES {
			let half = [size[0] / 2.0, size[1] / 2.0, size[2] / 2.0];
			for (normal, u, v) in FACES {
				let offset = |axis: Vec3, s: f64| -> Vec3 {
					[axis[0] * half[0] * s, axis[1] * half[1] * s, axis[2] * half[2] * s]
				};
				let n = offset(normal, 1.0);
				let face_center = [center[0] + n[0], center[1] + n[1], center[2] + n[2]];
				let corners = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)].map(|(su, sv)| {
					let (du, dv) = (offset(u, su), offset(v, sv));
					self.rotate([
						face_center[0] + du[0] + dv[0],
						face_center[1] + du[1] + dv[1],
						face_center[2] + du[2] + dv[2],
					])
				});

				let world_normal = self.rotate(normal);
				let mid = self.rotate(face_center);
				let to_camera = [-mid[0], -mid[1], CAMERA_Z - mid[2]];
				if dot(world_normal, to_camera) <= 0.0 {
					continue;
				}
				faces.push(ProjectedFace {
					points: corners.map(|c| self.project(c)),
					depth: corners.iter().map(|c| c[2]).sum::<f64>() / 4.0,
					brightness: (AMBIENT + dot(world_normal, light).max(0.0)).min(1.0),
				});
			}
		}
		faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));
		faces
	}
}

impl Default for FaviconMark {
	fn default() -> Self {
		Self::new(FaviconConfig::default())
	}
}

impl Effect for FaviconMark {
	fn name(&self) -> &'static str {
		"favicon"
	}

	/// The mark has no population; only the surface size matters.
	fn reseed(&mut self, viewport: Viewport, _theme: ThemeMode, _rng: &mut SmallRng) {
		self.viewport = viewport;
	}

	fn advance(&mut self, elapsed_ms: f64, time_ms: f64, _pointer: &PointerState, _rng: &mut SmallRng) {
		self.rot_y += self.config.spin * update::frames_for(elapsed_ms);
		self.rot_x = self.config.tilt * (time_ms * 0.001).sin();
	}

	fn draw(&self, surface: &mut dyn Surface, _theme: ThemeMode) {
		surface.clear();
		if self.viewport.is_empty() {
			return;
		}
		let (cx, cy) = self.viewport.center();
		let stops = [
			GradientStop::new(0.0, theme::PRIMARY),
			GradientStop::new(1.0, theme::SECONDARY),
		];
		surface.fill_rect(
			0.0,
			0.0,
			self.viewport.width,
			self.viewport.height,
			Paint::Gradient(Gradient::Radial {
				center: (cx, cy),
				inner_radius: 0.0,
				outer_radius: self.viewport.width / 2.0,
				stops: &stops,
			}),
		);
		for face in self.visible_faces() {
			surface.fill_polygon(&face.points, Color::WHITE.shade(face.brightness).into());
		}
	}

	fn population(&self) -> usize {
		BOXES.len()
	}
}

/// Points the document's `<link rel="icon">` at `data_uri`, creating the
/// link on first use.
pub fn publish_favicon(document: &Document, data_uri: &str) -> Result<(), BackdropError> {
	if let Some(existing) = document.query_selector("link[rel='icon']")? {
		existing.set_attribute("href", data_uri)?;
		return Ok(());
	}
	let link: HtmlLinkElement = document
		.create_element("link")?
		.dyn_into()
		.map_err(|_| BackdropError::Js("link element has unexpected type".into()))?;
	link.set_rel("icon");
	link.set_type("image/png");
	link.set_href(data_uri);
	document
		.head()
		.ok_or(BackdropError::NoDocument)?
		.append_child(&link)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::super::surface::{DrawOp, RecordedPaint, RecordingSurface};
	use super::*;

	#[test]
	fn front_view_shows_fronts_and_inner_sides() {
		let mark = FaviconMark::default();
		let faces = mark.visible_faces();
		// Each box shows its front plus the sides facing the axis.
		assert!(faces.len() >= 3 && faces.len() <= 9);
		assert!(faces.windows(2).all(|w| w[0].depth <= w[1].depth));
		let fronts = faces.iter().filter(|f| f.brightness == 1.0).count();
		assert!(fronts >= 3);
		assert!(faces.iter().all(|f| (AMBIENT..=1.0).contains(&f.brightness)));
	}

	#[test]
	fn projected_mark_fits_the_icon() {
		let mark = FaviconMark::default();
		for face in mark.visible_faces() {
			for (x, y) in face.points {
				assert!((0.0..=64.0).contains(&x) && (0.0..=64.0).contains(&y));
			}
		}
	}

	#[test]
	fn spins_and_wobbles() {
		let mut mark = FaviconMark::default();
		let mut rng = SmallRng::seed_from_u64(0);
		mark.advance(160.0, 1000.0 * std::f64::consts::FRAC_PI_2, &PointerState::default(), &mut rng);
		let (rot_x, rot_y) = mark.rotation();
		assert!((rot_y - 0.2).abs() < 1e-12);
		assert!((rot_x - 0.2).abs() < 1e-12);
		// Seen from behind the mark is still an H.
		mark.rot_y = std::f64::consts::PI;
		assert!(mark.visible_faces().len() >= 3);
	}

	#[test]
	fn draws_gradient_then_shaded_faces() {
		let mark = FaviconMark::default();
		let mut surface = RecordingSurface::new(Viewport::square(64.0));
		mark.draw(&mut surface, ThemeMode::Light);
		let ops = surface.ops();
		assert_eq!(ops[0], DrawOp::Clear);
		assert!(matches!(
			&ops[1],
			DrawOp::Rect { paint: RecordedPaint::Radial { outer_radius, .. }, .. } if *outer_radius == 32.0
		));
		let polygons = surface.count(|op| matches!(op, DrawOp::Polygon { .. }));
		assert_eq!(polygons, mark.visible_faces().len());
		let shaded = surface.count(|op| {
			matches!(op, DrawOp::Polygon { paint: RecordedPaint::Solid(c), .. } if c.r < 255)
		});
		assert!(shaded > 0);
	}
}
