//! Hero-section point cloud with pointer parallax.
//!
//! Points are scattered in a cube in front of a perspective camera and split
//! into three depth layers. The whole cloud spins slowly; on top of that each
//! layer eases toward a rotation offset proportional to the pointer position,
//! nearer layers with a larger sensitivity so they visibly lead the far ones.

use rand::Rng;
use rand::rngs::SmallRng;

use super::config::ParallaxConfig;
use super::engine::Effect;
use super::pointer::PointerState;
use super::surface::Surface;
use super::theme::{self, ThemeMode};
use super::update;
use super::viewport::Viewport;

/// Points closer to the camera than this are not drawn.
const NEAR_PLANE: f64 = 0.1;

/// (radius px at unit depth ratio, alpha) for far, middle and near layers.
const LAYER_LOOK: [(f64, f64); 3] = [(0.6, 0.35), (1.0, 0.6), (1.5, 0.9)];

#[derive(Clone, Debug, PartialEq)]
pub struct DepthLayer {
	pub points: Vec<[f64; 3]>,
	pub sensitivity: f64,
	pub radius: f64,
	pub alpha: f64,
	/// Current pointer-driven rotation offset (about X, about Y).
	pub offset: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxCloud {
	config: ParallaxConfig,
	viewport: Viewport,
	layers: Vec<DepthLayer>,
	rotation: (f64, f64),
}

impl ParallaxCloud {
	pub fn new(config: ParallaxConfig) -> Self {
		Self {
			config,
			viewport: Viewport::default(),
			layers: Vec::new(),
			rotation: (0.0, 0.0),
		}
	}

	pub fn layers(&self) -> &[DepthLayer] {
		&self.layers
	}

	pub fn rotation(&self) -> (f64, f64) {
		self.rotation
	}

	pub fn point_count(&self, width: f64) -> usize {
		if width <= 0.0 {
			return 0;
		}
		((width * self.config.density).floor() as usize).min(self.config.ceiling)
	}

	/// Rotates `p` about X by `rx`, then about Y by `ry`, and projects it.
	/// Returns screen coordinates and the depth ratio (1.0 at the origin).
	fn project(&self, p: [f64; 3], (sin_x, cos_x): (f64, f64), (sin_y, cos_y): (f64, f64)) -> Option<(f64, f64, f64)> {
		let [x, y, z] = p;
		let (y1, z1) = (y * cos_x - z * sin_x, y * sin_x + z * cos_x);
		let (x2, z2) = (x * cos_y + z1 * sin_y, -x * sin_y + z1 * cos_y);

		let depth = self.config.camera_distance - z2;
		if depth < NEAR_PLANE {
			return None;
		}
		let (cx, cy) = self.viewport.center();
		let focal = cy / (self.config.fov_degrees.to_radians() / 2.0).tan();
		let (sx, sy) = (cx + x2 * focal / depth, cy - y1 * focal / depth);
		if !self.viewport.contains(sx, sy) {
			return None;
		}
		Some((sx, sy, self.config.camera_distance / depth))
	}
}

impl Default for ParallaxCloud {
	fn default() -> Self {
		Self::new(ParallaxConfig::default())
	}
}

impl Effect for ParallaxCloud {
	fn name(&self) -> &'static str {
		"parallax"
	}

	fn reseed(&mut self, viewport: Viewport, _theme: ThemeMode, rng: &mut SmallRng) {
		self.viewport = viewport;
		let count = self.point_count(viewport.width);
		let half = self.config.extent / 2.0;

		let mut layers: Vec<DepthLayer> = LAYER_LOOK
			.iter()
			.zip(self.config.sensitivity)
			.map(|(&(radius, alpha), sensitivity)| DepthLayer {
				points: Vec::with_capacity(count / LAYER_LOOK.len() + 1),
				sensitivity,
				radius,
				alpha,
				offset: (0.0, 0.0),
			})
			.collect();
		for i in 0..count {
			let point = [
				rng.gen_range(-half..half),
				rng.gen_range(-half..half),
				rng.gen_range(-half..half),
			];
			layers[i % LAYER_LOOK.len()].points.push(point);
		}
		self.layers = layers;
	}

	fn advance(&mut self, elapsed_ms: f64, _time_ms: f64, pointer: &PointerState, _rng: &mut SmallRng) {
		let frames = update::frames_for(elapsed_ms);
		if frames == 0.0 {
			return;
		}
		self.rotation.0 += self.config.spin * frames;
		self.rotation.1 += self.config.spin * frames;

		let blend = 1.0 - (1.0 - self.config.ease).powf(frames);
		for layer in &mut self.layers {
			let target = (pointer.ny * layer.sensitivity, pointer.nx * layer.sensitivity);
			layer.offset.0 += (target.0 - layer.offset.0) * blend;
			layer.offset.1 += (target.1 - layer.offset.1) * blend;
		}
	}

	fn draw(&self, surface: &mut dyn Surface, _theme: ThemeMode) {
		surface.clear();
		if self.viewport.is_empty() {
			return;
		}

		for layer in &self.layers {
			let rx = (self.rotation.0 + layer.offset.0).sin_cos();
			let ry = (self.rotation.1 + layer.offset.1).sin_cos();
			let color = theme::SECONDARY.with_alpha(layer.alpha);
			for &p in &layer.points {
				if let Some((x, y, depth_ratio)) = self.project(p, rx, ry) {
					surface.fill_circle(x, y, layer.radius * depth_ratio.clamp(0.5, 3.0), color.into());
				}
			}
		}
	}

	fn population(&self) -> usize {
		self.layers.iter().map(|l| l.points.len()).sum()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::super::surface::RecordingSurface;
	use super::*;

	fn cloud(width: f64) -> (ParallaxCloud, SmallRng) {
		let mut rng = SmallRng::seed_from_u64(11);
		let mut cloud = ParallaxCloud::default();
		cloud.reseed(Viewport::new(width, 900.0), ThemeMode::Dark, &mut rng);
		(cloud, rng)
	}

	#[test]
	fn point_count_tracks_width_with_ceiling() {
		assert_eq!(cloud(800.0).0.population(), 1000);
		assert_eq!(cloud(1600.0).0.population(), 2000);
		assert_eq!(cloud(4000.0).0.population(), 2000);
		assert_eq!(cloud(800.0).0.layers().len(), 3);
	}

	#[test]
	fn nearer_layers_follow_the_pointer_more() {
		let (mut cloud, mut rng) = cloud(800.0);
		let pointer = PointerState {
			nx: 0.5,
			ny: -0.25,
			seen: true,
			..PointerState::default()
		};
		for _ in 0..200 {
			cloud.advance(16.0, 0.0, &pointer, &mut rng);
		}
		let offsets: Vec<f64> = cloud.layers().iter().map(|l| l.offset.1).collect();
		assert!(offsets[0] < offsets[1] && offsets[1] < offsets[2]);
		assert!((offsets[2] - 0.25).abs() < 1e-3);
		assert!(cloud.layers()[2].offset.0 < cloud.layers()[0].offset.0);
	}

	#[test]
	fn centered_pointer_only_spins() {
		let (mut cloud, mut rng) = cloud(800.0);
		cloud.advance(160.0, 0.0, &PointerState::default(), &mut rng);
		assert!((cloud.rotation().0 - 0.003).abs() < 1e-12);
		assert!(cloud.layers().iter().all(|l| l.offset == (0.0, 0.0)));
	}

	#[test]
	fn projected_points_land_on_screen() {
		let (cloud, _) = cloud(800.0);
		let mut surface = RecordingSurface::new(Viewport::new(800.0, 900.0));
		cloud.draw(&mut surface, ThemeMode::Dark);
		let drawn = surface.circles();
		assert!(drawn > 0 && drawn < cloud.population());
		for op in surface.ops() {
			if let super::super::surface::DrawOp::Circle { x, y, .. } = op {
				assert!((0.0..=800.0).contains(x) && (0.0..=900.0).contains(y));
			}
		}
	}
}
