//! Shared drawing passes.
//!
//! Effects compose these back to front:
//! 1. Background fields (nebula clouds, gradient sweeps)
//! 2. Particles, each with an optional glow halo underneath
//! 3. Overlays (constellation lines, shooting-star streaks)

use super::particles::Particle;
use super::surface::{Gradient, GradientStop, Paint, Surface};
use super::theme::Color;

/// Constellation line width in pixels.
const CONNECTION_WIDTH: f64 = 0.5;

/// Halo radius as a multiple of the particle radius.
const GLOW_SCALE: f64 = 3.0;

/// Soft radial clouds fading to transparent.
pub fn draw_nebula(surface: &mut dyn Surface, clouds: &[Particle]) {
	for cloud in clouds {
		let stops = [
			GradientStop::new(0.0, cloud.color.with_alpha(cloud.opacity)),
			GradientStop::new(1.0, Color::TRANSPARENT),
		];
		surface.fill_circle(
			cloud.x,
			cloud.y,
			cloud.radius,
			Paint::Gradient(Gradient::Radial {
				center: (cloud.x, cloud.y),
				inner_radius: 0.0,
				outer_radius: cloud.radius,
				stops: &stops,
			}),
		);
	}
}

/// Filled particles. With `glow_min_radius`, particles larger than that
/// radius get a halo of three times their radius painted first.
pub fn draw_particles<'a>(
	surface: &mut dyn Surface,
	particles: impl IntoIterator<Item = &'a Particle>,
	glow_min_radius: Option<f64>,
) {
	for p in particles {
		if p.opacity <= 0.0 || p.radius <= 0.0 {
			continue;
		}
		if glow_min_radius.is_some_and(|min| p.radius > min) {
			let halo = p.radius * GLOW_SCALE;
			let stops = [
				GradientStop::new(0.0, p.color.with_alpha(p.opacity)),
				GradientStop::new(0.5, p.color.with_alpha(p.opacity * 0.3)),
				GradientStop::new(1.0, Color::TRANSPARENT),
			];
			surface.fill_circle(
				p.x,
				p.y,
				halo,
				Paint::Gradient(Gradient::Radial {
					center: (p.x, p.y),
					inner_radius: 0.0,
					outer_radius: halo,
					stops: &stops,
				}),
			);
		}
		surface.fill_circle(p.x, p.y, p.radius, p.color.with_alpha(p.opacity).into());
	}
}

/// Joins every pair of connectable particles closer than `max_distance`,
/// alpha falling linearly from `max_alpha` to zero with distance.
pub fn draw_connections(surface: &mut dyn Surface, particles: &[Particle], max_distance: f64, max_alpha: f64) {
	if max_distance <= 0.0 || max_alpha <= 0.0 {
		return;
	}
	let max_sq = max_distance * max_distance;
	for (i, a) in particles.iter().enumerate() {
		if !a.connects {
			continue;
		}
		for b in particles[i + 1..].iter().filter(|b| b.connects) {
			let (dx, dy) = (a.x - b.x, a.y - b.y);
			let dist_sq = dx * dx + dy * dy;
			if dist_sq >= max_sq {
				continue;
			}
			let alpha = (1.0 - dist_sq.sqrt() / max_distance) * max_alpha;
			surface.stroke_line(
				(a.x, a.y),
				(b.x, b.y),
				CONNECTION_WIDTH,
				Color::WHITE.with_alpha(alpha).into(),
			);
		}
	}
}

/// Shooting stars: a tapering gradient tail behind a glowing head.
///
/// The tail shrinks and thins as the particle's opacity (remaining life)
/// falls.
pub fn draw_streaks(surface: &mut dyn Surface, streaks: &[Particle]) {
	for s in streaks {
		let speed = s.vx.hypot(s.vy);
		if speed <= 0.0 || s.opacity <= 0.0 {
			continue;
		}
		let life = s.lifetime.remaining().unwrap_or(1.0).clamp(0.0, 1.0);
		let (ux, uy) = (s.vx / speed, s.vy / speed);
		let tail = s.streak * life;
		let end = (s.x - ux * tail, s.y - uy * tail);
		let stops = [
			GradientStop::new(0.0, Color::WHITE.with_alpha(s.opacity)),
			GradientStop::new(0.1, Color::rgb(200, 200, 255).with_alpha(s.opacity * 0.8)),
			GradientStop::new(0.5, Color::rgb(180, 180, 255).with_alpha(s.opacity * 0.4)),
			GradientStop::new(1.0, Color::rgba(100, 100, 255, 0.0)),
		];
		surface.stroke_line(
			(s.x, s.y),
			end,
			s.base_radius * (1.0 - (1.0 - life) * 0.7),
			Paint::Gradient(Gradient::Linear {
				from: (s.x, s.y),
				to: end,
				stops: &stops,
			}),
		);
		surface.fill_circle(s.x, s.y, s.base_radius * 2.0, Color::WHITE.with_alpha(s.opacity).into());
	}
}
