//! Tuning knobs for every effect.
//!
//! All fields have defaults, so the host page may supply any subset as JSON:
//!
//! ```json
//! { "starfield": { "star_ceiling": 80 }, "trail": { "cap": 30 } }
//! ```

use serde::Deserialize;

/// Star-field background tuning.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
	/// One star per this many pixels of viewport width.
	pub star_divisor: f64,
	pub star_ceiling: usize,
	pub nebula_divisor_dark: f64,
	pub nebula_ceiling_dark: usize,
	pub nebula_divisor_light: f64,
	pub nebula_ceiling_light: usize,
	pub shooting_star_cap: usize,
	/// Spawn probability per reference frame.
	pub shooting_star_chance: f64,
	/// Stars closer than this (px) are joined by a faint line.
	pub connection_distance: f64,
	pub connection_alpha: f64,
	/// Stars larger than this (px) get a glow halo.
	pub glow_min_radius: f64,
}

impl Default for StarfieldConfig {
	fn default() -> Self {
		Self {
			star_divisor: 8.0,
			star_ceiling: 150,
			nebula_divisor_dark: 30.0,
			nebula_ceiling_dark: 30,
			nebula_divisor_light: 60.0,
			nebula_ceiling_light: 15,
			shooting_star_cap: 3,
			shooting_star_chance: 0.005,
			connection_distance: 150.0,
			connection_alpha: 0.08,
			glow_min_radius: 1.5,
		}
	}
}

/// Pointer-trail tuning. Lifetimes are in reference frames.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
	pub cap: usize,
	pub decay: f64,
	pub fade_span: f64,
	pub mouse_lifetime: [f64; 2],
	pub touch_lifetime: [f64; 2],
}

impl Default for TrailConfig {
	fn default() -> Self {
		Self {
			cap: 50,
			decay: 0.5,
			fade_span: 30.0,
			mouse_lifetime: [15.0, 23.0],
			touch_lifetime: [12.0, 20.0],
		}
	}
}

/// Rotating background gradient tuning.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradientConfig {
	/// Radians per reference frame.
	pub sweep_speed: f64,
}

impl Default for GradientConfig {
	fn default() -> Self {
		Self { sweep_speed: 0.001 }
	}
}

/// Hero point-cloud tuning.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParallaxConfig {
	/// Points per pixel of viewport width.
	pub density: f64,
	pub ceiling: usize,
	/// Base rotation in radians per reference frame, both axes.
	pub spin: f64,
	/// Pointer sensitivity per depth layer, far to near.
	pub sensitivity: [f64; 3],
	/// Fraction of the remaining offset closed each reference frame.
	pub ease: f64,
	pub fov_degrees: f64,
	pub camera_distance: f64,
	/// Side length of the cube the points are scattered in.
	pub extent: f64,
}

impl Default for ParallaxConfig {
	fn default() -> Self {
		Self {
			density: 1.25,
			ceiling: 2000,
			spin: 0.0003,
			sensitivity: [0.2, 0.35, 0.5],
			ease: 0.05,
			fov_degrees: 75.0,
			camera_distance: 2.0,
			extent: 5.0,
		}
	}
}

/// Animated favicon tuning.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaviconConfig {
	pub enabled: bool,
	pub size: u32,
	/// Y-axis rotation in radians per reference frame.
	pub spin: f64,
	/// Amplitude of the X-axis wobble in radians.
	pub tilt: f64,
}

impl Default for FaviconConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			size: 64,
			spin: 0.02,
			tilt: 0.2,
		}
	}
}

/// Complete backdrop configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackdropConfig {
	/// Probability that a pointer sample spawns a trail particle.
	pub pointer_sample_rate: f64,
	pub starfield: StarfieldConfig,
	pub trail: TrailConfig,
	pub gradient: GradientConfig,
	pub parallax: ParallaxConfig,
	pub favicon: FaviconConfig,
}

impl Default for BackdropConfig {
	fn default() -> Self {
		Self {
			pointer_sample_rate: 0.5,
			starfield: StarfieldConfig::default(),
			trail: TrailConfig::default(),
			gradient: GradientConfig::default(),
			parallax: ParallaxConfig::default(),
			favicon: FaviconConfig::default(),
		}
	}
}

/// Upper bounds for hand-edited populations. Connection lines cost
/// O(n^2) per frame, so the star ceiling is the tightest.
const MAX_STARS: usize = 500;
const MAX_NEBULA: usize = 60;
const MAX_SHOOTING_STARS: usize = 10;
const MAX_TRAIL: usize = 500;
const MAX_PARALLAX_POINTS: usize = 5000;
const MAX_PARALLAX_DENSITY: f64 = 5.0;

fn finite_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() { value } else { fallback }
}

fn ordered(range: [f64; 2], fallback: [f64; 2]) -> [f64; 2] {
	let (a, b) = (finite_or(range[0], fallback[0]), finite_or(range[1], fallback[1]));
	if a <= b { [a.max(0.0), b.max(0.0)] } else { [b.max(0.0), a.max(0.0)] }
}

impl BackdropConfig {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str::<Self>(json).map(Self::validated)
	}

	/// Clamps caps and probabilities and replaces nonsensical numbers with
	/// defaults, so hand-edited JSON cannot stall or blow up a frame.
	pub fn validated(mut self) -> Self {
		let d = BackdropConfig::default();

		self.pointer_sample_rate = finite_or(self.pointer_sample_rate, d.pointer_sample_rate).clamp(0.0, 1.0);

		let s = &mut self.starfield;
		if !(s.star_divisor.is_finite() && s.star_divisor > 0.0) {
			s.star_divisor = d.starfield.star_divisor;
		}
		if !(s.nebula_divisor_dark.is_finite() && s.nebula_divisor_dark > 0.0) {
			s.nebula_divisor_dark = d.starfield.nebula_divisor_dark;
		}
		if !(s.nebula_divisor_light.is_finite() && s.nebula_divisor_light > 0.0) {
			s.nebula_divisor_light = d.starfield.nebula_divisor_light;
		}
		s.star_ceiling = s.star_ceiling.min(MAX_STARS);
		s.nebula_ceiling_dark = s.nebula_ceiling_dark.min(MAX_NEBULA);
		s.nebula_ceiling_light = s.nebula_ceiling_light.min(MAX_NEBULA);
		s.shooting_star_cap = s.shooting_star_cap.min(MAX_SHOOTING_STARS);
		s.shooting_star_chance = finite_or(s.shooting_star_chance, d.starfield.shooting_star_chance).clamp(0.0, 1.0);
		s.connection_distance = finite_or(s.connection_distance, d.starfield.connection_distance).max(0.0);
		s.connection_alpha = finite_or(s.connection_alpha, d.starfield.connection_alpha).clamp(0.0, 1.0);
		s.glow_min_radius = finite_or(s.glow_min_radius, d.starfield.glow_min_radius).max(0.0);

		let t = &mut self.trail;
		if !(t.decay.is_finite() && t.decay > 0.0) {
			t.decay = d.trail.decay;
		}
		if !(t.fade_span.is_finite() && t.fade_span > 0.0) {
			t.fade_span = d.trail.fade_span;
		}
		t.cap = t.cap.min(MAX_TRAIL);
		t.mouse_lifetime = ordered(t.mouse_lifetime, d.trail.mouse_lifetime);
		t.touch_lifetime = ordered(t.touch_lifetime, d.trail.touch_lifetime);

		self.gradient.sweep_speed = finite_or(self.gradient.sweep_speed, d.gradient.sweep_speed);

		let p = &mut self.parallax;
		p.density = finite_or(p.density, d.parallax.density).clamp(0.0, MAX_PARALLAX_DENSITY);
		p.ceiling = p.ceiling.min(MAX_PARALLAX_POINTS);
		p.spin = finite_or(p.spin, d.parallax.spin);
		p.ease = finite_or(p.ease, d.parallax.ease).clamp(0.0, 1.0);
		if !(p.fov_degrees.is_finite() && p.fov_degrees > 1.0 && p.fov_degrees < 179.0) {
			p.fov_degrees = d.parallax.fov_degrees;
		}
		if !(p.camera_distance.is_finite() && p.camera_distance > 0.0) {
			p.camera_distance = d.parallax.camera_distance;
		}
		if !(p.extent.is_finite() && p.extent > 0.0) {
			p.extent = d.parallax.extent;
		}
		for (value, fallback) in p.sensitivity.iter_mut().zip(d.parallax.sensitivity) {
			*value = finite_or(*value, fallback);
		}

		let f = &mut self.favicon;
		f.size = f.size.clamp(16, 256);
		f.spin = finite_or(f.spin, d.favicon.spin);
		f.tilt = finite_or(f.tilt, d.favicon.tilt);

		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_json_is_the_default() {
		assert_eq!(BackdropConfig::from_json("{}").ok(), Some(BackdropConfig::default()));
	}

	#[test]
	fn partial_override_keeps_other_defaults() {
		let cfg = BackdropConfig::from_json(r#"{ "starfield": { "star_ceiling": 80 }, "trail": { "cap": 30 } }"#)
			.unwrap();
		assert_eq!(cfg.starfield.star_ceiling, 80);
		assert_eq!(cfg.starfield.star_divisor, 8.0);
		assert_eq!(cfg.trail.cap, 30);
		assert_eq!(cfg.trail.decay, 0.5);
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(BackdropConfig::from_json("{ starfield: ").is_err());
		assert!(BackdropConfig::from_json(r#"{ "trail": { "cap": -3 } }"#).is_err());
	}

	#[test]
	fn validation_sanitizes_values() {
		let cfg = BackdropConfig::from_json(
			r#"{
				"pointer_sample_rate": 4.0,
				"starfield": { "star_divisor": 0, "shooting_star_chance": -1 },
				"trail": { "decay": 0, "mouse_lifetime": [30, 10] },
				"parallax": { "fov_degrees": 400, "ease": 2 },
				"favicon": { "size": 4 }
			}"#,
		)
		.unwrap();
		assert_eq!(cfg.pointer_sample_rate, 1.0);
		assert_eq!(cfg.starfield.star_divisor, 8.0);
		assert_eq!(cfg.starfield.shooting_star_chance, 0.0);
		assert_eq!(cfg.trail.decay, 0.5);
		assert_eq!(cfg.trail.mouse_lifetime, [10.0, 30.0]);
		assert_eq!(cfg.parallax.fov_degrees, 75.0);
		assert_eq!(cfg.parallax.ease, 1.0);
		assert_eq!(cfg.favicon.size, 16);
	}

	#[test]
	fn validation_caps_populations() {
		let cfg = BackdropConfig::from_json(
			r#"{
				"starfield": {
					"star_ceiling": 100000, "star_divisor": 0.01,
					"nebula_ceiling_dark": 9000, "nebula_ceiling_light": 9000,
					"shooting_star_cap": 400
				},
				"trail": { "cap": 1000000 },
				"parallax": { "ceiling": 3000000, "density": 5000 }
			}"#,
		)
		.unwrap();
		assert_eq!(cfg.starfield.star_ceiling, MAX_STARS);
		assert_eq!(cfg.starfield.nebula_ceiling_dark, MAX_NEBULA);
		assert_eq!(cfg.starfield.nebula_ceiling_light, MAX_NEBULA);
		assert_eq!(cfg.starfield.shooting_star_cap, MAX_SHOOTING_STARS);
		assert_eq!(cfg.trail.cap, MAX_TRAIL);
		assert_eq!(cfg.parallax.ceiling, MAX_PARALLAX_POINTS);
		assert_eq!(cfg.parallax.density, MAX_PARALLAX_DENSITY);

		// Caps already inside the bounds are left alone.
		let cfg = BackdropConfig::default().validated();
		assert_eq!(cfg, BackdropConfig::default());
	}
}
