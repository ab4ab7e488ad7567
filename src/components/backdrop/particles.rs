//! Particle records, the capped particle store, and the population factory.

use std::f64::consts::TAU;

use rand::Rng;

use super::theme::{Color, StarStyle, ThemeMode};
use super::viewport::Viewport;

/// How long a particle lives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lifetime {
	/// Never expires; animated by its phase (twinkling stars).
	Eternal,
	/// Counts down by `decay` per reference frame and is removed at zero.
	/// Opacity fades once `remaining` drops below `fade_span`.
	Expiring {
		remaining: f64,
		fade_span: f64,
		decay: f64,
	},
}

impl Lifetime {
	pub fn expiring(remaining: f64, fade_span: f64, decay: f64) -> Self {
		Lifetime::Expiring {
			remaining,
			fade_span,
			decay,
		}
	}

	pub fn remaining(&self) -> Option<f64> {
		match self {
			Lifetime::Eternal => None,
			Lifetime::Expiring { remaining, .. } => Some(*remaining),
		}
	}

	pub fn is_expired(&self) -> bool {
		matches!(self, Lifetime::Expiring { remaining, .. } if *remaining <= 0.0)
	}
}

/// A single animated particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	/// Velocity in pixels per 16 ms reference frame.
	pub vx: f64,
	pub vy: f64,
	/// Current radius (pulse-modulated) and the radius it pulses around.
	pub radius: f64,
	pub base_radius: f64,
	pub color: Color,
	pub base_opacity: f64,
	pub opacity: f64,
	pub lifetime: Lifetime,
	pub phase: f64, // For twinkling
	/// Twinkle angular speed in radians per millisecond.
	pub twinkle_speed: f64,
	/// Tail length for streaking particles (shooting stars); 0 otherwise.
	pub streak: f64,
	pub twinkles: bool,
	pub pulses: bool,
	pub connects: bool,
}

impl Particle {
	/// A motionless, eternal dot at full base opacity.
	pub fn at(x: f64, y: f64, radius: f64, color: Color, base_opacity: f64) -> Self {
		let base_opacity = base_opacity.clamp(0.0, 1.0);
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius,
			base_radius: radius,
			color,
			base_opacity,
			opacity: base_opacity,
			lifetime: Lifetime::Eternal,
			phase: 0.0,
			twinkle_speed: 0.0,
			streak: 0.0,
			twinkles: false,
			pulses: false,
			connects: false,
		}
	}

	pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
		self.vx = vx;
		self.vy = vy;
		self
	}

	pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
		self.lifetime = lifetime;
		self
	}

	pub fn with_twinkle(mut self, speed: f64, phase: f64) -> Self {
		self.twinkles = true;
		self.twinkle_speed = speed;
		self.phase = phase;
		self
	}

	pub fn is_alive(&self) -> bool {
		!self.lifetime.is_expired()
	}
}

/// Ordered particle collection with a hard population cap.
///
/// Pushing past the cap evicts the oldest particles, so the newest ones
/// (e.g. the head of a pointer trail) always survive.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleStore {
	particles: Vec<Particle>,
	cap: usize,
}

impl ParticleStore {
	pub fn with_cap(cap: usize) -> Self {
		Self {
			particles: Vec::with_capacity(cap.min(4096)),
			cap,
		}
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
		self.particles.iter()
	}

	pub fn as_slice(&self) -> &[Particle] {
		&self.particles
	}

	pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
		&mut self.particles
	}

	pub fn push(&mut self, particle: Particle) {
		if self.cap == 0 {
			return;
		}
		self.particles.push(particle);
		if self.particles.len() > self.cap {
			let excess = self.particles.len() - self.cap;
			self.particles.drain(..excess);
		}
	}

	/// Replaces the whole population in one step, truncated to the cap.
	pub fn replace(&mut self, mut population: Vec<Particle>) {
		population.truncate(self.cap);
		self.particles = population;
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}
}

impl<'a> IntoIterator for &'a ParticleStore {
	type Item = &'a Particle;
	type IntoIter = std::slice::Iter<'a, Particle>;

	fn into_iter(self) -> Self::IntoIter {
		self.particles.iter()
	}
}

/// Number of stars for a viewport width: one per `divisor` pixels, capped.
pub fn population_for_width(width: f64, divisor: f64, ceiling: usize) -> usize {
	if width <= 0.0 || divisor <= 0.0 {
		return 0;
	}
	((width / divisor).floor() as usize).min(ceiling)
}

fn sample(rng: &mut impl Rng, range: &std::ops::Range<f64>) -> f64 {
	if range.end > range.start {
		rng.gen_range(range.start..range.end)
	} else {
		range.start
	}
}

/// Creates `count` stars scattered across `viewport`.
///
/// Ranges: radius 0.5..3.5, drift up to 0.1 px per frame on each axis,
/// base opacity from the theme's [`StarStyle`]. About 30% of stars twinkle
/// and about 30% of those also pulse in size.
pub fn create_population(
	count: usize,
	viewport: Viewport,
	theme: ThemeMode,
	rng: &mut impl Rng,
) -> Vec<Particle> {
	let style = StarStyle::for_theme(theme);
	let mut particles = Vec::with_capacity(count);
	if viewport.is_empty() {
		return particles;
	}

	for _ in 0..count {
		let twinkles = rng.gen_bool(0.3);
		let radius = rng.gen_range(0.0..1.0) * 3.0 + 0.5;
		let color = style.star_color(rng.gen_range(0.0..1.0));
		let base_opacity = sample(rng, &style.base_opacity);

		let mut star = Particle::at(
			rng.gen_range(0.0..=viewport.width),
			rng.gen_range(0.0..=viewport.height),
			radius,
			color,
			base_opacity,
		)
		.with_velocity(rng.gen_range(-0.1..0.1), rng.gen_range(-0.1..0.1));
		star.phase = rng.gen_range(0.0..TAU);
		star.connects = true;
		if twinkles {
			let phase = star.phase;
			star = star.with_twinkle(rng.gen_range(0.01..0.04), phase);
			star.pulses = rng.gen_bool(0.3);
		}
		particles.push(star);
	}

	particles
}

/// Creates soft nebula clouds: large, static, very faint.
pub fn create_nebula(
	count: usize,
	viewport: Viewport,
	theme: ThemeMode,
	rng: &mut impl Rng,
) -> Vec<Particle> {
	let style = StarStyle::for_theme(theme);
	if viewport.is_empty() {
		return Vec::new();
	}
	(0..count)
		.map(|_| {
			Particle::at(
				rng.gen_range(0.0..=viewport.width),
				rng.gen_range(0.0..=viewport.height),
				rng.gen_range(40.0..120.0),
				style.nebula_color(rng.gen_range(0.0..1.0)),
				sample(rng, &style.nebula_opacity),
			)
		})
		.collect()
}
