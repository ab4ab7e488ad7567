//! Leptos components mounting the backdrop effects.
//!
//! Mounting sizes the canvas to the window, wraps the effect in an
//! [`Engine`], registers resize/visibility/pointer listeners and starts a
//! `requestAnimationFrame` loop. Everything acquired during mount lives in a
//! [`Mounted`] value; dropping it removes the listeners and cancels the
//! pending frame, so every unmount path tears the backdrop down.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::BackdropError;
use super::clock::RafLoop;
use super::config::{BackdropConfig, FaviconConfig};
use super::engine::{self, Engine};
use super::favicon::{FaviconMark, publish_favicon};
use super::gradient::GradientSweep;
use super::parallax::ParallaxCloud;
use super::pointer::PointerSample;
use super::starfield::Starfield;
use super::surface::CanvasSurface;
use super::theme::ThemeMode;
use super::trail::PointerTrail;
use super::viewport::Viewport;

/// Which effect a [`BackdropCanvas`] runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
	Gradient,
	Starfield,
	Trail,
	Parallax,
}

impl EffectKind {
	fn class(self) -> &'static str {
		match self {
			EffectKind::Gradient => "backdrop backdrop-gradient",
			EffectKind::Starfield => "backdrop backdrop-starfield",
			EffectKind::Trail => "backdrop backdrop-trail",
			EffectKind::Parallax => "hero-canvas",
		}
	}

	fn style(self) -> &'static str {
		match self {
			EffectKind::Gradient => "position: fixed; inset: 0; z-index: -3; pointer-events: none;",
			EffectKind::Starfield => "position: fixed; inset: 0; z-index: -2; pointer-events: none;",
			EffectKind::Trail => "position: fixed; inset: 0; z-index: -1; pointer-events: none;",
			EffectKind::Parallax => "position: absolute; inset: 0; pointer-events: none;",
		}
	}
}

/// A DOM listener that unregisters itself on drop.
pub struct EventListener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
	/// Registers `handler` for `event` on `target`.
	pub fn new(
		target: &EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, BackdropError> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for EventListener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// A running backdrop. Dropping it stops the animation and detaches every
/// listener.
struct Mounted {
	name: &'static str,
	raf: Rc<RafLoop>,
	listeners: Vec<EventListener>,
	set_theme: Box<dyn Fn(ThemeMode)>,
}

impl Drop for Mounted {
	fn drop(&mut self) {
		self.raf.stop();
		self.listeners.clear();
		info!("portfolio-fx: {} unmounted", self.name);
	}
}

fn window_viewport(window: &Window) -> Viewport {
	let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn random_seed() -> u64 {
	let entropy = (js_sys::Math::random() * u32::MAX as f64) as u64;
	(entropy << 32) ^ js_sys::Date::now() as u64
}

fn document_of(window: &Window) -> Result<Document, BackdropError> {
	window.document().ok_or(BackdropError::NoDocument)
}

/// Pauses `engine` and cancels its frame loop while the tab is hidden.
fn visibility_listener<E: engine::Effect + 'static>(
	document: &Document,
	engine: &Rc<RefCell<Engine<E>>>,
	raf: &Rc<RafLoop>,
) -> Result<EventListener, BackdropError> {
	let (engine, raf, doc) = (engine.clone(), raf.clone(), document.clone());
	EventListener::new(document, "visibilitychange", move |_| {
		apply_visibility(&engine, &raf, !doc.hidden());
	})
}

fn apply_visibility<E: engine::Effect>(engine: &RefCell<Engine<E>>, raf: &RafLoop, visible: bool) {
	engine.borrow_mut().set_visible(visible);
	if visible {
		raf.resume();
	} else {
		raf.stop();
	}
}

fn mount<E: engine::Effect + 'static>(
	canvas: HtmlCanvasElement,
	effect: E,
	theme: ThemeMode,
	sample_rate: f64,
) -> Result<Mounted, BackdropError> {
	let window = web_sys::window().ok_or(BackdropError::NoWindow)?;
	let document = document_of(&window)?;
	let viewport = window_viewport(&window);

	canvas.set_width(viewport.width as u32);
	canvas.set_height(viewport.height as u32);
	let mut surface = CanvasSurface::new(canvas)?;

	let name = effect.name();
	let engine = Rc::new(RefCell::new(Engine::new(effect, theme, viewport, sample_rate, random_seed())));
	info!(
		"portfolio-fx: {} mounted at {}x{} with {} particles",
		name,
		viewport.width,
		viewport.height,
		engine.borrow().population()
	);

	let raf = Rc::new(RafLoop::new(window.clone()));
	let engine_frame = engine.clone();
	raf.start(move |now| {
		engine_frame.borrow_mut().frame(now, &mut surface);
	});
	apply_visibility(&engine, &raf, !document.hidden());

	let target: &EventTarget = window.as_ref();
	let mut listeners = Vec::with_capacity(4);

	let (engine_resize, window_resize) = (engine.clone(), window.clone());
	listeners.push(EventListener::new(target, "resize", move |_| {
		engine_resize
			.borrow_mut()
			.request_resize(window_viewport(&window_resize));
	})?);

	listeners.push(visibility_listener(&document, &engine, &raf)?);

	let engine_mouse = engine.clone();
	listeners.push(EventListener::new(target, "mousemove", move |ev| {
		if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
			let sample = PointerSample::mouse(ev.client_x() as f64, ev.client_y() as f64);
			engine_mouse.borrow_mut().pointer_moved(sample);
		}
	})?);

	let engine_touch = engine.clone();
	listeners.push(EventListener::new(target, "touchmove", move |ev| {
		let Some(touch) = ev.dyn_ref::<TouchEvent>().and_then(|ev| ev.touches().get(0)) else {
			return;
		};
		let sample = PointerSample::touch(touch.client_x() as f64, touch.client_y() as f64);
		engine_touch.borrow_mut().pointer_moved(sample);
	})?);

	Ok(Mounted {
		name,
		raf,
		listeners,
		set_theme: Box::new(move |theme| engine.borrow_mut().set_theme(theme)),
	})
}

fn mount_kind(
	kind: EffectKind,
	canvas: HtmlCanvasElement,
	theme: ThemeMode,
	config: &BackdropConfig,
) -> Result<Mounted, BackdropError> {
	let rate = config.pointer_sample_rate;
	match kind {
		EffectKind::Gradient => mount(canvas, GradientSweep::new(config.gradient.clone()), theme, rate),
		EffectKind::Starfield => mount(canvas, Starfield::new(config.starfield.clone()), theme, rate),
		EffectKind::Trail => mount(canvas, PointerTrail::new(config.trail.clone()), theme, rate),
		EffectKind::Parallax => mount(canvas, ParallaxCloud::new(config.parallax.clone()), theme, rate),
	}
}

/// Renders one backdrop effect on a window-sized canvas.
///
/// The canvas follows the window size and pauses while the tab is hidden.
/// Theme changes regenerate the population in place. If the browser cannot
/// provide a 2D context the component logs a warning and renders an idle
/// canvas.
#[component]
pub fn BackdropCanvas(
	kind: EffectKind,
	#[prop(into)] theme: Signal<ThemeMode>,
	#[prop(optional)] config: BackdropConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted = StoredValue::new_local(None::<Mounted>);
	let config = config.validated();

	Effect::new(move |_| {
		let theme = theme.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let retheme = mounted.try_update_value(|m| match m {
			Some(m) => {
				(m.set_theme)(theme);
				true
			}
			None => false,
		});
		if retheme != Some(false) {
			return;
		}
		match mount_kind(kind, canvas.into(), theme, &config) {
			Ok(m) => mounted.set_value(Some(m)),
			Err(e) => warn!("portfolio-fx: {:?} backdrop disabled: {}", kind, e),
		}
	});

	on_cleanup(move || {
		mounted.try_update_value(Option::take);
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class=kind.class()
			style=kind.style()
			aria-hidden="true"
		/>
	}
}

/// Keeps the favicon animation alive; dropping it stops the animation.
pub struct FaviconAnimator {
	raf: Rc<RafLoop>,
	_visibility: EventListener,
}

impl Drop for FaviconAnimator {
	fn drop(&mut self) {
		self.raf.stop();
		info!("portfolio-fx: favicon animation stopped");
	}
}

/// Renders the spinning mark into an offscreen canvas and publishes each
/// frame as the page favicon.
pub fn start_favicon(config: &FaviconConfig) -> Result<FaviconAnimator, BackdropError> {
	let window = web_sys::window().ok_or(BackdropError::NoWindow)?;
	let document = document_of(&window)?;
	let canvas: HtmlCanvasElement = document
		.create_element("canvas")?
		.dyn_into()
		.map_err(|_| BackdropError::MissingCanvas)?;
	canvas.set_width(config.size);
	canvas.set_height(config.size);
	let mut surface = CanvasSurface::new(canvas)?;

	let engine = Rc::new(RefCell::new(Engine::new(
		FaviconMark::new(config.clone()),
		ThemeMode::default(),
		Viewport::square(config.size as f64),
		0.0,
		random_seed(),
	)));
	let raf = Rc::new(RafLoop::new(window));
	let (engine_frame, document_frame) = (engine.clone(), document.clone());
	let mut warned = false;
	raf.start(move |now| {
		if !engine_frame.borrow_mut().frame(now, &mut surface) {
			return;
		}
		let published = surface.to_data_url().and_then(|uri| publish_favicon(&document_frame, &uri));
		if let Err(e) = published {
			if !warned {
				warn!("portfolio-fx: favicon update failed: {}", e);
				warned = true;
			}
		}
	});
	apply_visibility(&engine, &raf, !document.hidden());
	let visibility = visibility_listener(&document, &engine, &raf)?;
	info!("portfolio-fx: favicon animation started ({}px)", config.size);

	Ok(FaviconAnimator {
		raf,
		_visibility: visibility,
	})
}

/// Starts the favicon animation for as long as this component is mounted.
/// Renders nothing.
#[component]
pub fn AnimatedFavicon(#[prop(optional)] config: FaviconConfig) -> impl IntoView {
	let animator = StoredValue::new_local(None::<FaviconAnimator>);

	Effect::new(move |_| {
		if !config.enabled || animator.with_value(Option::is_some) {
			return;
		}
		match start_favicon(&config) {
			Ok(a) => animator.set_value(Some(a)),
			Err(e) => warn!("portfolio-fx: favicon disabled: {}", e),
		}
	});

	on_cleanup(move || {
		animator.try_update_value(Option::take);
	});
}
