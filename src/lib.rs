//! portfolio-fx: Procedural canvas backdrops for a portfolio site.
//!
//! This crate provides WASM-based animated backgrounds (star field, pointer
//! trail, gradient sweep), a parallax point cloud for the hero section and an
//! animated favicon, plus the host app that layers them under the page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Storage, Window};

pub mod components;

pub use components::backdrop::{
	AnimatedFavicon, BackdropCanvas, BackdropConfig, BackdropError, EffectKind, Engine, ThemeMode,
};

const THEME_KEY: &str = "theme";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("portfolio-fx: logging initialized");
}

/// Load backdrop tuning from a script element with id="backdrop-config".
/// Missing element means defaults; malformed JSON is logged and ignored.
pub fn load_config() -> BackdropConfig {
	let Some(json_text) = config_script_text() else {
		return BackdropConfig::default();
	};

	match BackdropConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"portfolio-fx: loaded config (star ceiling {}, trail cap {})",
				config.starfield.star_ceiling, config.trail.cap
			);
			config.validated()
		}
		Err(e) => {
			warn!("portfolio-fx: failed to parse backdrop config: {}", e);
			BackdropConfig::default()
		}
	}
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("backdrop-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

fn local_storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

/// Theme persisted by the page, `light` when unset.
fn stored_theme() -> ThemeMode {
	local_storage()
		.and_then(|s| s.get_item(THEME_KEY).ok().flatten())
		.map(|v| ThemeMode::parse(&v))
		.unwrap_or_default()
}

/// Persists `theme` and mirrors it as the `dark` class on `<html>`.
fn apply_theme(theme: ThemeMode) {
	if let Some(storage) = local_storage() {
		let _ = storage.set_item(THEME_KEY, theme.as_str());
	}
	let root = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.document_element());
	if let Some(root) = root {
		let _ = root.class_list().toggle_with_force("dark", theme.is_dark());
	}
}

/// Main application component.
/// Layers the animated backdrops under the page and wires the theme toggle.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let (theme, set_theme) = signal(stored_theme());
	Effect::new(move |_| apply_theme(theme.get()));

	let toggle = move |_| set_theme.update(|t| *t = t.toggled());
	let label = move || {
		if theme.get().is_dark() {
			"Light mode"
		} else {
			"Dark mode"
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=move || theme.get().as_str() />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<AnimatedFavicon config=config.favicon.clone() />
		<BackdropCanvas kind=EffectKind::Gradient theme=theme config=config.clone() />
		<BackdropCanvas kind=EffectKind::Starfield theme=theme config=config.clone() />
		<BackdropCanvas kind=EffectKind::Trail theme=theme config=config.clone() />

		<header class="site-header">
			<button class="theme-toggle" on:click=toggle>{label}</button>
		</header>
		<section class="hero">
			<BackdropCanvas kind=EffectKind::Parallax theme=theme config=config />
			<div class="hero-content">
				<h1>"Hello, I build things for the web."</h1>
				<p class="subtitle">"Move the pointer to look around."</p>
			</div>
		</section>
	}
}
