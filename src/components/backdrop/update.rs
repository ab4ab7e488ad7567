//! Per-frame particle integration.
//!
//! Velocities and decay rates are expressed per 16 ms reference frame, so a
//! tick of `elapsed_ms` advances everything by `elapsed_ms / FRAME_MS` frames.
//! Twinkle and pulse are functions of absolute animation time, which keeps
//! them periodic regardless of how the frames were sliced.

use super::particles::{Lifetime, Particle, ParticleStore};
use super::viewport::Viewport;

/// Reference frame duration in milliseconds.
pub const FRAME_MS: f64 = 16.0;

/// Pulse frequency in radians per millisecond.
const PULSE_SPEED: f64 = 0.001;
const PULSE_DEPTH: f64 = 0.3;

/// What happens when a particle crosses a surface edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
	/// Clamp to the edge and reflect the velocity component.
	Bounce,
	/// Leave it alone; the particle disappears when its lifetime runs out.
	Expire,
}

/// `base * (0.5 + 0.5 * sin(time * speed + phase))`, clamped to [0, 1].
pub fn twinkle_opacity(base: f64, time_ms: f64, speed: f64, phase: f64) -> f64 {
	(base * (0.5 + 0.5 * (time_ms * speed + phase).sin())).clamp(0.0, 1.0)
}

pub fn pulse_radius(base: f64, time_ms: f64, phase: f64) -> f64 {
	base * (1.0 + PULSE_DEPTH * (time_ms * PULSE_SPEED + phase).sin())
}

/// Converts elapsed milliseconds into reference frames; garbage becomes 0.
pub fn frames_for(elapsed_ms: f64) -> f64 {
	if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
		elapsed_ms / FRAME_MS
	} else {
		0.0
	}
}

fn bounce(p: &mut Particle, bounds: Viewport) {
	if p.x < 0.0 {
		p.x = 0.0;
		p.vx = p.vx.abs();
	} else if p.x > bounds.width {
		p.x = bounds.width;
		p.vx = -p.vx.abs();
	}
	if p.y < 0.0 {
		p.y = 0.0;
		p.vy = p.vy.abs();
	} else if p.y > bounds.height {
		p.y = bounds.height;
		p.vy = -p.vy.abs();
	}
}

fn refresh_opacity(p: &mut Particle, time_ms: f64) {
	p.opacity = match p.lifetime {
		Lifetime::Expiring {
			remaining,
			fade_span,
			..
		} if fade_span > 0.0 => p.base_opacity * (remaining / fade_span).min(1.0),
		_ if p.twinkles => twinkle_opacity(p.base_opacity, time_ms, p.twinkle_speed, p.phase),
		_ => p.base_opacity,
	}
	.clamp(0.0, 1.0);
}

/// Advances every particle by `elapsed_ms` and drops the expired ones.
///
/// `time_ms` is the animation time *after* this tick.
pub fn advance(
	store: &mut ParticleStore,
	elapsed_ms: f64,
	time_ms: f64,
	bounds: Viewport,
	boundary: Boundary,
) {
	if store.is_empty() {
		return;
	}
	let frames = frames_for(elapsed_ms);

	for p in store.particles_mut().iter_mut() {
		p.x += p.vx * frames;
		p.y += p.vy * frames;
		if boundary == Boundary::Bounce {
			bounce(p, bounds);
		}

		if let Lifetime::Expiring {
			remaining, decay, ..
		} = &mut p.lifetime
		{
			*remaining -= *decay * frames;
		}

		if p.pulses {
			p.radius = pulse_radius(p.base_radius, time_ms, p.phase);
		}
		refresh_opacity(p, time_ms);
	}

	store.particles_mut().retain(Particle::is_alive);
}

#[cfg(test)]
mod tests {
	use std::f64::consts::{PI, TAU};

	use super::super::theme::Color;
	use super::*;

	fn store_of(particles: Vec<Particle>) -> ParticleStore {
		let mut store = ParticleStore::with_cap(64);
		store.replace(particles);
		store
	}

	#[test]
	fn empty_store_is_a_noop() {
		let mut store = ParticleStore::with_cap(4);
		advance(&mut store, 16.0, 16.0, Viewport::new(10.0, 10.0), Boundary::Bounce);
		assert!(store.is_empty());
	}

	#[test]
	fn zero_elapsed_does_not_move_or_age() {
		let p = Particle::at(5.0, 5.0, 1.0, Color::WHITE, 0.5)
			.with_velocity(1.0, 1.0)
			.with_lifetime(Lifetime::expiring(10.0, 30.0, 0.5));
		let mut store = store_of(vec![p]);
		advance(&mut store, 0.0, 0.0, Viewport::new(10.0, 10.0), Boundary::Expire);
		let p = &store.as_slice()[0];
		assert_eq!((p.x, p.y), (5.0, 5.0));
		assert_eq!(p.lifetime.remaining(), Some(10.0));
		advance(&mut store, f64::NAN, 0.0, Viewport::new(10.0, 10.0), Boundary::Expire);
		assert_eq!(store.as_slice()[0].lifetime.remaining(), Some(10.0));
	}

	#[test]
	fn velocity_scales_with_elapsed_frames() {
		let p = Particle::at(10.0, 10.0, 1.0, Color::WHITE, 0.5).with_velocity(1.0, -0.5);
		let mut store = store_of(vec![p]);
		advance(&mut store, 32.0, 32.0, Viewport::new(100.0, 100.0), Boundary::Bounce);
		let p = &store.as_slice()[0];
		assert!((p.x - 12.0).abs() < 1e-9);
		assert!((p.y - 9.0).abs() < 1e-9);
	}

	#[test]
	fn bounce_reflects_and_clamps() {
		let p = Particle::at(99.5, 0.2, 1.0, Color::WHITE, 0.5).with_velocity(2.0, -1.0);
		let mut store = store_of(vec![p]);
		advance(&mut store, FRAME_MS, FRAME_MS, Viewport::new(100.0, 100.0), Boundary::Bounce);
		let p = &store.as_slice()[0];
		assert_eq!((p.x, p.y), (100.0, 0.0));
		assert!(p.vx < 0.0 && p.vy > 0.0);
	}

	#[test]
	fn expire_boundary_lets_particles_leave() {
		let p = Particle::at(99.5, 50.0, 1.0, Color::WHITE, 0.5).with_velocity(2.0, 0.0);
		let mut store = store_of(vec![p]);
		advance(&mut store, FRAME_MS, FRAME_MS, Viewport::new(100.0, 100.0), Boundary::Expire);
		assert!(store.as_slice()[0].x > 100.0);
	}

	#[test]
	fn expired_particles_are_removed() {
		let dying = Particle::at(1.0, 1.0, 1.0, Color::WHITE, 1.0)
			.with_lifetime(Lifetime::expiring(0.5, 30.0, 0.5));
		let living = Particle::at(2.0, 2.0, 1.0, Color::WHITE, 1.0)
			.with_lifetime(Lifetime::expiring(20.0, 30.0, 0.5));
		let mut store = store_of(vec![dying, living]);
		advance(&mut store, FRAME_MS, FRAME_MS, Viewport::new(10.0, 10.0), Boundary::Expire);
		assert_eq!(store.len(), 1);
		assert_eq!(store.as_slice()[0].x, 2.0);
		assert!((store.as_slice()[0].opacity - 19.5 / 30.0).abs() < 1e-9);
	}

	#[test]
	fn twinkle_follows_sine() {
		assert!((twinkle_opacity(0.8, 0.0, 0.02, PI / 2.0) - 0.8).abs() < 1e-12);
		assert!(twinkle_opacity(0.8, 0.0, 0.02, -PI / 2.0).abs() < 1e-12);
		let period = TAU / 0.02;
		let a = twinkle_opacity(0.6, 123.0, 0.02, 1.0);
		let b = twinkle_opacity(0.6, 123.0 + period, 0.02, 1.0);
		assert!((a - b).abs() < 1e-9);
	}

	#[test]
	fn pulse_stays_within_depth() {
		for t in (0..10_000).step_by(250) {
			let r = pulse_radius(2.0, t as f64, 0.3);
			assert!((1.4..=2.6).contains(&r));
		}
	}
}
