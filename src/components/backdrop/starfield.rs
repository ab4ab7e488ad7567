//! Full-page star field: drifting, twinkling stars over faint nebula clouds,
//! with constellation lines and the occasional shooting star.

use std::f64::consts::PI;

use rand::Rng;
use rand::rngs::SmallRng;

use super::config::StarfieldConfig;
use super::engine::Effect;
use super::particles::{self, Lifetime, Particle, ParticleStore};
use super::pointer::PointerState;
use super::render;
use super::surface::Surface;
use super::theme::{Color, StarStyle, ThemeMode};
use super::update::{self, Boundary};
use super::viewport::Viewport;

/// Shooting-star tail opacity reaches full strength at half its life.
const STREAK_FADE_SPAN: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Starfield {
	config: StarfieldConfig,
	viewport: Viewport,
	stars: ParticleStore,
	nebula: Vec<Particle>,
	shooting: ParticleStore,
}

impl Starfield {
	pub fn new(config: StarfieldConfig) -> Self {
		let (star_cap, shooting_cap) = (config.star_ceiling, config.shooting_star_cap);
		Self {
			config,
			viewport: Viewport::default(),
			stars: ParticleStore::with_cap(star_cap),
			nebula: Vec::new(),
			shooting: ParticleStore::with_cap(shooting_cap),
		}
	}

	pub fn stars(&self) -> &ParticleStore {
		&self.stars
	}

	pub fn nebula(&self) -> &[Particle] {
		&self.nebula
	}

	pub fn shooting_stars(&self) -> &ParticleStore {
		&self.shooting
	}

	/// Star count for a viewport width.
	pub fn star_count(&self, width: f64) -> usize {
		particles::population_for_width(width, self.config.star_divisor, self.config.star_ceiling)
	}

	pub fn nebula_count(&self, width: f64, theme: ThemeMode) -> usize {
		let c = &self.config;
		match theme {
			ThemeMode::Dark => particles::population_for_width(width, c.nebula_divisor_dark, c.nebula_ceiling_dark),
			ThemeMode::Light => particles::population_for_width(width, c.nebula_divisor_light, c.nebula_ceiling_light),
		}
	}

	/// Launches a shooting star from the upper half of the sky.
	pub fn launch_shooting_star(&mut self, rng: &mut impl Rng) {
		if self.shooting.len() >= self.config.shooting_star_cap || self.viewport.is_empty() {
			return;
		}
		let angle = rng.gen_range(PI / 8.0..3.0 * PI / 8.0);
		let speed = rng.gen_range(10.0..25.0);
		// Head travels speed * 20 px over its life, which lasts 1000 / speed frames.
		let px_per_frame = speed * speed * 0.02;
		let mut star = Particle::at(
			rng.gen_range(0.0..=self.viewport.width),
			rng.gen_range(0.0..=self.viewport.height / 2.0),
			rng.gen_range(1.0..3.0),
			Color::WHITE,
			1.0,
		)
		.with_velocity(angle.cos() * px_per_frame, angle.sin() * px_per_frame)
		.with_lifetime(Lifetime::expiring(1.0, STREAK_FADE_SPAN, speed / 1000.0));
		star.streak = rng.gen_range(100.0..250.0);
		self.shooting.push(star);
	}
}

impl Default for Starfield {
	fn default() -> Self {
		Self::new(StarfieldConfig::default())
	}
}

impl Effect for Starfield {
	fn name(&self) -> &'static str {
		"starfield"
	}

	fn reseed(&mut self, viewport: Viewport, theme: ThemeMode, rng: &mut SmallRng) {
		self.viewport = viewport;
		let stars = particles::create_population(self.star_count(viewport.width), viewport, theme, rng);
		self.stars.replace(stars);
		self.nebula = particles::create_nebula(self.nebula_count(viewport.width, theme), viewport, theme, rng);
		self.shooting.clear();
	}

	fn advance(&mut self, elapsed_ms: f64, time_ms: f64, _pointer: &PointerState, rng: &mut SmallRng) {
		update::advance(&mut self.stars, elapsed_ms, time_ms, self.viewport, Boundary::Bounce);
		update::advance(&mut self.shooting, elapsed_ms, time_ms, self.viewport, Boundary::Expire);

		let frames = update::frames_for(elapsed_ms);
		if frames > 0.0 {
			let chance = 1.0 - (1.0 - self.config.shooting_star_chance).powf(frames);
			if rng.gen_bool(chance.clamp(0.0, 1.0)) {
				self.launch_shooting_star(rng);
			}
		}
	}

	fn draw(&self, surface: &mut dyn Surface, theme: ThemeMode) {
		let style = StarStyle::for_theme(theme);
		surface.clear();

		if style.nebula_visible {
			render::draw_nebula(surface, &self.nebula);
		}
		render::draw_particles(surface, &self.stars, style.glow.then_some(self.config.glow_min_radius));
		if style.connections {
			render::draw_connections(
				surface,
				self.stars.as_slice(),
				self.config.connection_distance,
				self.config.connection_alpha,
			);
		}
		render::draw_streaks(surface, self.shooting.as_slice());
	}

	fn population(&self) -> usize {
		self.stars.len() + self.shooting.len()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::super::surface::{DrawOp, RecordingSurface};
	use super::*;

	fn seeded(theme: ThemeMode, width: f64) -> (Starfield, SmallRng) {
		let mut rng = SmallRng::seed_from_u64(42);
		let mut field = Starfield::default();
		field.reseed(Viewport::new(width, 700.0), theme, &mut rng);
		(field, rng)
	}

	#[test]
	fn counts_follow_viewport_width() {
		let (field, _) = seeded(ThemeMode::Dark, 800.0);
		assert_eq!(field.stars().len(), 100);
		assert_eq!(field.nebula().len(), 26);
		let (field, _) = seeded(ThemeMode::Light, 1920.0);
		assert_eq!(field.stars().len(), 150);
		assert_eq!(field.nebula().len(), 15);
	}

	#[test]
	fn light_theme_skips_nebula_glow_and_lines() {
		let (field, _) = seeded(ThemeMode::Light, 800.0);
		let mut surface = RecordingSurface::new(Viewport::new(800.0, 700.0));
		field.draw(&mut surface, ThemeMode::Light);
		assert_eq!(surface.ops()[0], DrawOp::Clear);
		assert_eq!(surface.lines(), 0);
		assert_eq!(surface.circles(), field.stars().len());
	}

	#[test]
	fn dark_theme_draws_background_first() {
		let (field, _) = seeded(ThemeMode::Dark, 800.0);
		let mut surface = RecordingSurface::new(Viewport::new(800.0, 700.0));
		field.draw(&mut surface, ThemeMode::Dark);
		let ops = surface.ops();
		assert_eq!(ops[0], DrawOp::Clear);
		// Nebula clouds come straight after the clear.
		for op in &ops[1..=field.nebula().len()] {
			match op {
				DrawOp::Circle { radius, .. } => assert!(*radius >= 40.0),
				other => panic!("expected nebula circle, got {other:?}"),
			}
		}
		assert!(surface.circles() > field.stars().len() + field.nebula().len());
	}

	#[test]
	fn shooting_stars_are_capped_and_expire() {
		let (mut field, mut rng) = seeded(ThemeMode::Dark, 800.0);
		for _ in 0..10 {
			field.launch_shooting_star(&mut rng);
		}
		assert_eq!(field.shooting_stars().len(), 3);
		// Slowest star lives 1000 / 10 = 100 frames.
		field.config = StarfieldConfig {
			shooting_star_chance: 0.0,
			..StarfieldConfig::default()
		};
		for i in 1..=101 {
			field.advance(16.0, i as f64 * 16.0, &PointerState::default(), &mut rng);
		}
		assert!(field.shooting_stars().is_empty());
	}

	#[test]
	fn stars_stay_on_screen() {
		let (mut field, mut rng) = seeded(ThemeMode::Dark, 400.0);
		for i in 1..=2_000 {
			field.advance(100.0, i as f64 * 100.0, &PointerState::default(), &mut rng);
		}
		let vp = Viewport::new(400.0, 700.0);
		assert!(field.stars().iter().all(|p| vp.contains(p.x, p.y)));
		assert!(field.stars().iter().all(|p| (0.0..=1.0).contains(&p.opacity)));
	}
}
