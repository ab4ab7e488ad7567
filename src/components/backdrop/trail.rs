//! Pointer trail: short-lived dots dropped under the mouse or finger.

use rand::Rng;
use rand::rngs::SmallRng;

use super::config::TrailConfig;
use super::engine::Effect;
use super::particles::{Lifetime, Particle, ParticleStore};
use super::pointer::{PointerKind, PointerSample, PointerState};
use super::render;
use super::surface::Surface;
use super::theme::{Color, ThemeMode, TrailStyle};
use super::update::{self, Boundary};
use super::viewport::Viewport;

#[derive(Clone, Debug, PartialEq)]
pub struct PointerTrail {
	config: TrailConfig,
	viewport: Viewport,
	points: ParticleStore,
}

impl PointerTrail {
	pub fn new(config: TrailConfig) -> Self {
		let cap = config.cap;
		Self {
			config,
			viewport: Viewport::default(),
			points: ParticleStore::with_cap(cap),
		}
	}

	pub fn points(&self) -> &ParticleStore {
		&self.points
	}

	fn spawn(&mut self, sample: PointerSample, theme: ThemeMode, rng: &mut impl Rng) {
		let style = TrailStyle::for_theme(theme);
		let (size, life) = match sample.kind {
			PointerKind::Mouse => (style.mouse_size.clone(), self.config.mouse_lifetime),
			PointerKind::Touch => (style.touch_size.clone(), self.config.touch_lifetime),
		};
		let color = match &style.hue {
			Some(hue) => Color::hsl(rng.gen_range(hue.clone()), 1.0, 0.5),
			None => Color::WHITE,
		};
		let remaining = if life[1] > life[0] {
			rng.gen_range(life[0]..life[1])
		} else {
			life[0]
		};
		if remaining <= 0.0 {
			return;
		}

		let mut point = Particle::at(sample.x, sample.y, rng.gen_range(size), color, style.opacity_scale)
			.with_lifetime(Lifetime::expiring(remaining, self.config.fade_span, self.config.decay));
		point.opacity = point.base_opacity * (remaining / self.config.fade_span).min(1.0);
		self.points.push(point);
	}
}

impl Default for PointerTrail {
	fn default() -> Self {
		Self::new(TrailConfig::default())
	}
}

impl Effect for PointerTrail {
	fn name(&self) -> &'static str {
		"trail"
	}

	/// Trail points are pinned to where the pointer was; a resize only
	/// drops them.
	fn reseed(&mut self, viewport: Viewport, _theme: ThemeMode, _rng: &mut SmallRng) {
		self.viewport = viewport;
		self.points.clear();
	}

	fn advance(&mut self, elapsed_ms: f64, time_ms: f64, _pointer: &PointerState, _rng: &mut SmallRng) {
		update::advance(&mut self.points, elapsed_ms, time_ms, self.viewport, Boundary::Expire);
	}

	fn draw(&self, surface: &mut dyn Surface, _theme: ThemeMode) {
		surface.clear();
		render::draw_particles(surface, &self.points, None);
	}

	fn spawn_at(&mut self, sample: PointerSample, theme: ThemeMode, rng: &mut SmallRng) {
		self.spawn(sample, theme, rng);
	}

	fn population(&self) -> usize {
		self.points.len()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::super::surface::RecordingSurface;
	use super::*;

	#[test]
	fn spawns_are_capped() {
		let mut trail = PointerTrail::default();
		let mut rng = SmallRng::seed_from_u64(5);
		for i in 0..500 {
			trail.spawn(PointerSample::mouse(i as f64, 10.0), ThemeMode::Dark, &mut rng);
		}
		assert_eq!(trail.points().len(), 50);
		// The newest points survive.
		assert_eq!(trail.points().as_slice()[49].x, 499.0);
	}

	#[test]
	fn dark_points_are_white_and_sized_by_input() {
		let mut trail = PointerTrail::default();
		let mut rng = SmallRng::seed_from_u64(5);
		trail.spawn(PointerSample::mouse(1.0, 1.0), ThemeMode::Dark, &mut rng);
		trail.spawn(PointerSample::touch(2.0, 2.0), ThemeMode::Dark, &mut rng);
		let [mouse, touch] = trail.points().as_slice() else {
			panic!("expected two points");
		};
		assert_eq!(mouse.color, Color::WHITE);
		assert!((2.0..6.0).contains(&mouse.radius));
		assert!((2.5..7.0).contains(&touch.radius));
		assert!((15.0..23.0).contains(&mouse.lifetime.remaining().unwrap_or_default()));
		assert!((12.0..20.0).contains(&touch.lifetime.remaining().unwrap_or_default()));
	}

	#[test]
	fn light_points_are_tinted_and_softer() {
		let mut trail = PointerTrail::default();
		let mut rng = SmallRng::seed_from_u64(9);
		trail.spawn(PointerSample::mouse(1.0, 1.0), ThemeMode::Light, &mut rng);
		let p = &trail.points().as_slice()[0];
		assert_ne!(p.color, Color::WHITE);
		assert!(p.color.b >= p.color.r);
		assert_eq!(p.base_opacity, 0.5);
		assert!(p.opacity < 0.5);
	}

	#[test]
	fn points_fade_out_and_disappear() {
		let mut trail = PointerTrail::default();
		let mut rng = SmallRng::seed_from_u64(1);
		trail.reseed(Viewport::new(100.0, 100.0), ThemeMode::Dark, &mut rng);
		trail.spawn(PointerSample::mouse(5.0, 5.0), ThemeMode::Dark, &mut rng);
		let mut last = trail.points().as_slice()[0].opacity;
		let mut time = 0.0;
		while !trail.points().is_empty() {
			time += 16.0;
			trail.advance(16.0, time, &PointerState::default(), &mut rng);
			if let Some(p) = trail.points().as_slice().first() {
				assert!(p.opacity < last);
				last = p.opacity;
			}
			assert!(time < 16.0 * 50.0, "trail point never expired");
		}
		let mut surface = RecordingSurface::new(Viewport::new(100.0, 100.0));
		trail.draw(&mut surface, ThemeMode::Dark);
		assert_eq!(surface.circles(), 0);
	}
}
