//! Procedural canvas backdrops.
//!
//! Every effect implements [`Effect`] and is driven by an [`Engine`], which
//! owns the effect's particles, frame clock, pointer state and random source.
//! Effects paint through the [`Surface`] trait, so the same code renders to
//! an HTML canvas in the browser and to a [`RecordingSurface`] in tests.
//!
//! Available effects:
//! - [`Starfield`]: twinkling stars, nebula clouds, constellation lines and
//!   shooting stars
//! - [`PointerTrail`]: fading dots under the mouse or finger
//! - [`GradientSweep`]: a slowly rotating brand gradient
//! - [`ParallaxCloud`]: a 3D point cloud that leans toward the pointer
//! - [`FaviconMark`]: the spinning "H" drawn into the page favicon
//!
//! # Example
//!
//! ```ignore
//! use portfolio_fx::{BackdropCanvas, BackdropConfig, EffectKind, ThemeMode};
//!
//! let (theme, _) = signal(ThemeMode::Dark);
//! view! { <BackdropCanvas kind=EffectKind::Starfield theme=theme config=BackdropConfig::default() /> }
//! ```

use wasm_bindgen::JsValue;

mod clock;
mod component;
pub mod config;
mod engine;
mod favicon;
mod gradient;
mod parallax;
pub mod particles;
mod pointer;
mod render;
mod starfield;
pub mod surface;
pub mod theme;
mod trail;
pub mod update;
pub mod viewport;

pub use clock::{FrameClock, MAX_FRAME_MS, RafLoop};
pub use component::{AnimatedFavicon, BackdropCanvas, EffectKind, EventListener, FaviconAnimator, start_favicon};
pub use config::BackdropConfig;
pub use engine::{Effect, Engine};
pub use favicon::{FaviconMark, publish_favicon};
pub use gradient::GradientSweep;
pub use parallax::ParallaxCloud;
pub use pointer::{PointerKind, PointerSample, PointerState, PointerTracker};
pub use starfield::Starfield;
pub use surface::{CanvasSurface, RecordingSurface, Surface};
pub use theme::{Color, ThemeMode};
pub use trail::PointerTrail;
pub use viewport::Viewport;

/// Why a backdrop could not be mounted.
#[derive(Debug, thiserror::Error)]
pub enum BackdropError {
	#[error("no global window")]
	NoWindow,
	#[error("window has no document")]
	NoDocument,
	#[error("canvas element is not mounted")]
	MissingCanvas,
	#[error("2D canvas context unavailable")]
	ContextUnavailable,
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for BackdropError {
	fn from(value: JsValue) -> Self {
		BackdropError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
