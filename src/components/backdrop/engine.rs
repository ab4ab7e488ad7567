//! The effect-agnostic animation engine.
//!
//! An [`Engine`] owns one [`Effect`] together with everything that effect
//! needs between frames: the frame clock, pointer state, pending resize and
//! a seeded random source. Several effects on one page are several engines;
//! nothing is shared through globals.
//!
//! The engine can be driven two ways:
//! - push-based, by the browser: [`Engine::frame`] with the
//!   `requestAnimationFrame` timestamp (no-op while stopped);
//! - pull-based, by tests or a custom scheduler: [`Engine::advance`] then
//!   [`Engine::render`].

use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::clock::FrameClock;
use super::pointer::{PointerSample, PointerState, PointerTracker};
use super::surface::Surface;
use super::theme::ThemeMode;
use super::viewport::{ResizeQueue, Viewport};

/// A procedural animation driven by the engine.
pub trait Effect {
	/// Short name used in log messages.
	fn name(&self) -> &'static str;

	/// Discards the current population and generates a fresh one sized for
	/// `viewport`, in a single step.
	fn reseed(&mut self, viewport: Viewport, theme: ThemeMode, rng: &mut SmallRng);

	/// Advances the simulation by `elapsed_ms`; `time_ms` is the total
	/// animation time after this step.
	fn advance(&mut self, elapsed_ms: f64, time_ms: f64, pointer: &PointerState, rng: &mut SmallRng);

	/// Clears `surface` and paints the current state.
	fn draw(&self, surface: &mut dyn Surface, theme: ThemeMode);

	/// Called for pointer samples that pass the sampling filter.
	fn spawn_at(&mut self, _sample: PointerSample, _theme: ThemeMode, _rng: &mut SmallRng) {}

	/// Number of live particles (or points) the effect currently holds.
	fn population(&self) -> usize;
}

/// One running instance of an [`Effect`].
pub struct Engine<E> {
	effect: E,
	theme: ThemeMode,
	viewport: Viewport,
	resize: ResizeQueue,
	clock: FrameClock,
	pointer: PointerTracker,
	rng: SmallRng,
	regenerations: u32,
}

impl<E: Effect> Engine<E> {
	/// Creates a stopped engine and seeds the initial population.
	pub fn new(mut effect: E, theme: ThemeMode, viewport: Viewport, sample_rate: f64, seed: u64) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		effect.reseed(viewport, theme, &mut rng);
		Self {
			effect,
			theme,
			viewport,
			resize: ResizeQueue::default(),
			clock: FrameClock::default(),
			pointer: PointerTracker::new(sample_rate),
			rng,
			regenerations: 1,
		}
	}

	pub fn effect(&self) -> &E {
		&self.effect
	}

	pub fn theme(&self) -> ThemeMode {
		self.theme
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn pointer(&self) -> &PointerState {
		self.pointer.state()
	}

	pub fn is_running(&self) -> bool {
		self.clock.is_running()
	}

	pub fn time_ms(&self) -> f64 {
		self.clock.time_ms()
	}

	/// How many times the population has been generated, including the
	/// initial seed.
	pub fn regenerations(&self) -> u32 {
		self.regenerations
	}

	pub fn population(&self) -> usize {
		self.effect.population()
	}

	pub fn start(&mut self) {
		self.clock.start();
	}

	pub fn stop(&mut self) {
		self.clock.stop();
	}

	/// Pauses while the tab is hidden, resumes without catch-up.
	pub fn set_visible(&mut self, visible: bool) {
		debug!("portfolio-fx: {} visible={}", self.effect.name(), visible);
		if visible {
			self.clock.start();
		} else {
			self.clock.stop();
		}
	}

	/// Queues a resize; applied once at the start of the next step.
	pub fn request_resize(&mut self, viewport: Viewport) {
		self.resize.push(viewport);
	}

	pub fn set_theme(&mut self, theme: ThemeMode) {
		if theme == self.theme {
			return;
		}
		self.theme = theme;
		self.reseed();
	}

	/// Records a pointer sample. While running, accepted samples are handed
	/// to the effect. Returns whether the sample was accepted.
	pub fn pointer_moved(&mut self, sample: PointerSample) -> bool {
		let accepted = self.pointer.record(sample, self.viewport, &mut self.rng);
		if accepted && self.clock.is_running() {
			self.effect.spawn_at(sample, self.theme, &mut self.rng);
		}
		accepted
	}

	fn reseed(&mut self) {
		self.effect.reseed(self.viewport, self.theme, &mut self.rng);
		self.regenerations += 1;
	}

	/// Applies a queued resize; returns the new viewport if one was applied.
	fn apply_resize(&mut self) -> Option<Viewport> {
		let (viewport, coalesced) = self.resize.take()?;
		debug!(
			"portfolio-fx: {} resized to {}x{} ({} events coalesced)",
			self.effect.name(),
			viewport.width,
			viewport.height,
			coalesced
		);
		self.viewport = viewport;
		self.reseed();
		Some(viewport)
	}

	/// Pull-based step: applies pending resizes and advances by
	/// `elapsed_ms`, regardless of the clock state.
	pub fn advance(&mut self, elapsed_ms: f64) {
		self.apply_resize();
		let elapsed = self.clock.advance_by(elapsed_ms);
		self.effect
			.advance(elapsed, self.clock.time_ms(), self.pointer.state(), &mut self.rng);
	}

	/// Pull-based paint of the current state.
	pub fn render(&self, surface: &mut dyn Surface) {
		self.effect.draw(surface, self.theme);
	}

	/// Push-based frame at browser timestamp `now_ms`. Returns `false` and
	/// touches nothing while stopped.
	pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> bool {
		let Some(elapsed) = self.clock.tick(now_ms) else {
			return false;
		};
		if let Some(viewport) = self.apply_resize() {
			surface.resize(viewport);
		}
		self.effect
			.advance(elapsed, self.clock.time_ms(), self.pointer.state(), &mut self.rng);
		self.effect.draw(surface, self.theme);
		true
	}
}

#[cfg(test)]
mod tests {
	use rand::Rng;

	use super::super::surface::RecordingSurface;
	use super::*;

	/// Counts calls; population is one dot per 100 px of width.
	#[derive(Default)]
	struct CountingEffect {
		dots: usize,
		advances: usize,
		spawns: usize,
		last_elapsed: f64,
	}

	impl Effect for CountingEffect {
		fn name(&self) -> &'static str {
			"counting"
		}

		fn reseed(&mut self, viewport: Viewport, _theme: ThemeMode, rng: &mut SmallRng) {
			let _ = rng.r#gen::<u32>();
			self.dots = (viewport.width / 100.0) as usize;
		}

		fn advance(&mut self, elapsed_ms: f64, _time_ms: f64, _pointer: &PointerState, _rng: &mut SmallRng) {
			self.advances += 1;
			self.last_elapsed = elapsed_ms;
		}

		fn draw(&self, surface: &mut dyn Surface, _theme: ThemeMode) {
			surface.clear();
		}

		fn spawn_at(&mut self, _sample: PointerSample, _theme: ThemeMode, _rng: &mut SmallRng) {
			self.spawns += 1;
		}

		fn population(&self) -> usize {
			self.dots
		}
	}

	fn engine() -> Engine<CountingEffect> {
		Engine::new(CountingEffect::default(), ThemeMode::Dark, Viewport::new(800.0, 600.0), 1.0, 3)
	}

	#[test]
	fn stopped_engine_ignores_frames() {
		let mut engine = engine();
		let mut surface = RecordingSurface::new(engine.viewport());
		engine.start();
		engine.stop();
		for i in 0..10 {
			assert!(!engine.frame(i as f64 * 16.0, &mut surface));
		}
		assert_eq!(engine.effect().advances, 0);
		assert!(surface.ops().is_empty());
	}

	#[test]
	fn running_engine_advances_and_draws() {
		let mut engine = engine();
		let mut surface = RecordingSurface::new(engine.viewport());
		engine.start();
		assert!(engine.frame(100.0, &mut surface));
		assert!(engine.frame(116.0, &mut surface));
		assert_eq!(engine.effect().advances, 2);
		assert_eq!(engine.effect().last_elapsed, 16.0);
		assert_eq!(surface.ops().len(), 2);
	}

	#[test]
	fn hidden_tab_pauses_without_backlog() {
		let mut engine = engine();
		let mut surface = RecordingSurface::new(engine.viewport());
		engine.start();
		engine.frame(0.0, &mut surface);
		engine.set_visible(false);
		assert!(!engine.frame(16.0, &mut surface));
		engine.set_visible(true);
		engine.frame(90_000.0, &mut surface);
		assert_eq!(engine.effect().last_elapsed, 0.0);
		assert_eq!(engine.time_ms(), 0.0);
	}

	#[test]
	fn resize_burst_regenerates_once_for_latest_viewport() {
		let mut engine = engine();
		let mut surface = RecordingSurface::new(engine.viewport());
		engine.start();
		for w in [900.0, 1000.0, 1200.0, 1600.0] {
			engine.request_resize(Viewport::new(w, 600.0));
		}
		engine.frame(0.0, &mut surface);
		assert_eq!(engine.regenerations(), 2);
		assert_eq!(engine.population(), 16);
		assert_eq!(surface.viewport(), Viewport::new(1600.0, 600.0));
	}

	#[test]
	fn theme_change_reseeds() {
		let mut engine = engine();
		engine.set_theme(ThemeMode::Dark);
		assert_eq!(engine.regenerations(), 1);
		engine.set_theme(ThemeMode::Light);
		assert_eq!(engine.regenerations(), 2);
		assert_eq!(engine.theme(), ThemeMode::Light);
	}

	#[test]
	fn pointer_spawns_only_while_running() {
		let mut engine = engine();
		assert!(engine.pointer_moved(PointerSample::mouse(10.0, 10.0)));
		assert_eq!(engine.effect().spawns, 0);
		engine.start();
		engine.pointer_moved(PointerSample::mouse(400.0, 300.0));
		assert_eq!(engine.effect().spawns, 1);
		assert_eq!((engine.pointer().nx, engine.pointer().ny), (0.0, 0.0));
	}

	#[test]
	fn pull_based_advance_accumulates_time() {
		let mut engine = engine();
		engine.advance(16.0);
		engine.advance(-5.0);
		engine.advance(34.0);
		assert_eq!(engine.time_ms(), 50.0);
		assert_eq!(engine.effect().advances, 3);
	}
}
