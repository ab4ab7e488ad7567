//! Visual theming for the backdrop effects.
//!
//! The host page supplies a two-valued [`ThemeMode`]; every effect derives its
//! palette and opacity ranges from it. Dark mode gets saturated, glow-friendly
//! hues; light mode gets desaturated inks at low opacity so nothing competes
//! with the page content.

use std::ops::Range;

use serde::Deserialize;

/// Light or dark page theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
	#[default]
	Light,
	Dark,
}

impl ThemeMode {
	pub fn is_dark(self) -> bool {
		self == ThemeMode::Dark
	}

	pub fn toggled(self) -> Self {
		match self {
			ThemeMode::Light => ThemeMode::Dark,
			ThemeMode::Dark => ThemeMode::Light,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ThemeMode::Light => "light",
			ThemeMode::Dark => "dark",
		}
	}

	/// Parses a stored theme flag. Anything other than `"dark"` is light.
	pub fn parse(value: &str) -> Self {
		if value.trim().eq_ignore_ascii_case("dark") {
			ThemeMode::Dark
		} else {
			ThemeMode::Light
		}
	}
}

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Builds a color from hue (degrees), saturation and lightness (0..1).
	pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
		let h = hue.rem_euclid(360.0) / 60.0;
		let s = saturation.clamp(0.0, 1.0);
		let l = lightness.clamp(0.0, 1.0);
		let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
		let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
		let (r, g, b) = match h as u32 {
			0 => (chroma, x, 0.0),
			1 => (x, chroma, 0.0),
			2 => (0.0, chroma, x),
			3 => (0.0, x, chroma),
			4 => (x, 0.0, chroma),
			_ => (chroma, 0.0, x),
		};
		let m = l - chroma / 2.0;
		let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
		Self::rgb(channel(r), channel(g), channel(b))
	}

	/// Replaces the alpha channel, clamped to [0, 1].
	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	/// Scales the alpha channel, clamped to [0, 1].
	pub fn fade(self, factor: f64) -> Self {
		self.with_alpha(self.a * factor)
	}

	/// Multiplies each channel by `factor` (light shading).
	pub fn shade(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Star-field palette and opacity ranges for one theme.
#[derive(Clone, Debug)]
pub struct StarStyle {
	/// Star colors with cumulative selection thresholds in [0, 1).
	pub colors: &'static [(f64, Color)],
	pub nebula_colors: &'static [Color],
	pub base_opacity: Range<f64>,
	pub nebula_opacity: Range<f64>,
	/// Nebula clouds, glow halos and constellation lines are dark-only.
	pub nebula_visible: bool,
	pub glow: bool,
	pub connections: bool,
}

const DARK_STARS: &[(f64, Color)] = &[
	(0.2, Color::rgb(255, 255, 255)), // White
	(0.4, Color::rgb(173, 216, 230)), // Light blue
	(0.6, Color::rgb(255, 223, 186)), // Warm yellow
	(0.8, Color::rgb(255, 192, 203)), // Pink
	(1.0, Color::rgb(202, 225, 255)), // Light cyan
];

const LIGHT_STARS: &[(f64, Color)] = &[
	(0.3, Color::rgb(0, 0, 0)),
	(0.6, Color::rgb(30, 30, 60)),
	(1.0, Color::rgb(60, 60, 90)),
];

const DARK_NEBULA: &[Color] = &[
	Color::rgb(75, 0, 130),    // Indigo
	Color::rgb(138, 43, 226),  // Purple
	Color::rgb(0, 0, 255),     // Blue
	Color::rgb(30, 144, 255),  // Dodger blue
	Color::rgb(0, 191, 255),   // Deep sky blue
	Color::rgb(220, 20, 60),   // Crimson
];

const LIGHT_NEBULA: &[Color] = &[
	Color::rgb(200, 220, 255),
	Color::rgb(230, 240, 255),
	Color::rgb(220, 225, 235),
	Color::rgb(240, 248, 255), // Alice blue
];

impl StarStyle {
	pub fn for_theme(theme: ThemeMode) -> Self {
		match theme {
			ThemeMode::Dark => Self {
				colors: DARK_STARS,
				nebula_colors: DARK_NEBULA,
				base_opacity: 0.3..0.8,
				nebula_opacity: 0.01..0.06,
				nebula_visible: true,
				glow: true,
				connections: true,
			},
			// The light layer is rendered at 40% strength.
			ThemeMode::Light => Self {
				colors: LIGHT_STARS,
				nebula_colors: LIGHT_NEBULA,
				base_opacity: 0.12..0.28,
				nebula_opacity: 0.005..0.025,
				nebula_visible: false,
				glow: false,
				connections: false,
			},
		}
	}

	/// Picks a star color from a uniform sample in [0, 1).
	pub fn star_color(&self, sample: f64) -> Color {
		self.colors
			.iter()
			.find(|(threshold, _)| sample < *threshold)
			.or(self.colors.last())
			.map(|(_, c)| *c)
			.unwrap_or(Color::WHITE)
	}

	pub fn nebula_color(&self, sample: f64) -> Color {
		let idx = ((sample * self.nebula_colors.len() as f64) as usize)
			.min(self.nebula_colors.len().saturating_sub(1));
		self.nebula_colors.get(idx).copied().unwrap_or(Color::WHITE)
	}
}

/// Pointer-trail appearance for one theme.
#[derive(Clone, Debug)]
pub struct TrailStyle {
	/// `None` means white points; otherwise a hue range in degrees.
	pub hue: Option<Range<f64>>,
	pub mouse_size: Range<f64>,
	pub touch_size: Range<f64>,
	pub opacity_scale: f64,
}

impl TrailStyle {
	pub fn for_theme(theme: ThemeMode) -> Self {
		match theme {
			ThemeMode::Dark => Self {
				hue: None,
				mouse_size: 2.0..6.0,
				touch_size: 2.5..7.0,
				opacity_scale: 1.0,
			},
			ThemeMode::Light => Self {
				hue: Some(180.0..240.0),
				mouse_size: 0.5..2.5,
				touch_size: 1.0..3.5,
				opacity_scale: 0.5,
			},
		}
	}
}

/// Gradient stops for the rotating background sweep.
pub fn sweep_stops(theme: ThemeMode) -> [(f64, Color); 4] {
	match theme {
		ThemeMode::Dark => [
			(0.0, Color::rgba(10, 15, 30, 0.4)),
			(0.3, Color::rgba(17, 24, 39, 0.2)),
			(0.6, Color::rgba(30, 41, 59, 0.2)),
			(1.0, Color::rgba(15, 23, 42, 0.4)),
		],
		ThemeMode::Light => [
			(0.0, Color::rgba(240, 249, 255, 0.4)),
			(0.3, Color::rgba(248, 250, 252, 0.2)),
			(0.6, Color::rgba(224, 242, 254, 0.2)),
			(1.0, Color::rgba(240, 249, 255, 0.4)),
		],
	}
}

/// Brand colors shared by the hero cloud and the favicon.
pub const PRIMARY: Color = Color::rgb(0x4f, 0x46, 0xe5);
pub const SECONDARY: Color = Color::rgb(0x0e, 0xa5, 0xe9);
