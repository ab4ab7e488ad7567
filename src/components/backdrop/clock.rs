//! Frame timing.
//!
//! [`FrameClock`] turns absolute frame timestamps into clamped per-frame
//! elapsed times and remembers whether the animation is running.
//! [`RafLoop`] drives a callback from `requestAnimationFrame` and guarantees
//! that after [`RafLoop::stop`] (or drop) no further callback runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Longest frame we will integrate in one step.
pub const MAX_FRAME_MS: f64 = 100.0;

/// Running/stopped state plus the timestamp of the previous frame.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
	running: bool,
	last: Option<f64>,
	time_ms: f64,
}

impl FrameClock {
	/// Starts (or restarts) the clock. The next tick reports 0 ms elapsed,
	/// so time spent stopped is never caught up.
	pub fn start(&mut self) {
		self.running = true;
		self.last = None;
	}

	pub fn stop(&mut self) {
		self.running = false;
		self.last = None;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Accumulated animation time in milliseconds.
	pub fn time_ms(&self) -> f64 {
		self.time_ms
	}

	/// Records a frame at `now_ms`; returns elapsed milliseconds, or `None`
	/// while stopped.
	pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
		if !self.running {
			return None;
		}
		let elapsed = match self.last {
			Some(last) if now_ms.is_finite() => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
			_ => 0.0,
		};
		if now_ms.is_finite() {
			self.last = Some(now_ms);
		}
		self.time_ms += elapsed;
		Some(elapsed)
	}

	/// Advances animation time directly (pull-based driving, tests).
	pub fn advance_by(&mut self, elapsed_ms: f64) -> f64 {
		let elapsed = if elapsed_ms.is_finite() {
			elapsed_ms.max(0.0)
		} else {
			0.0
		};
		self.time_ms += elapsed;
		elapsed
	}
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// A cancellable `requestAnimationFrame` loop.
///
/// The callback reschedules itself each frame. Starting an already running
/// loop cancels the pending frame first, so there is never more than one
/// scheduled frame.
pub struct RafLoop {
	window: web_sys::Window,
	handle: Rc<Cell<Option<i32>>>,
	callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl RafLoop {
	pub fn new(window: web_sys::Window) -> Self {
		Self {
			window,
			handle: Rc::new(Cell::new(None)),
			callback: Rc::new(RefCell::new(None)),
		}
	}

	pub fn is_running(&self) -> bool {
		self.handle.get().is_some()
	}

	/// Begins invoking `frame(timestamp_ms)` once per display refresh.
	pub fn start(&self, mut frame: impl FnMut(f64) + 'static) {
		self.stop();

		let (handle, callback) = (self.handle.clone(), self.callback.clone());
		let window = self.window.clone();
		*self.callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			// Cleared by stop(): this frame was already in flight.
			if handle.get().is_none() {
				return;
			}
			frame(timestamp);
			if handle.get().is_none() {
				return;
			}
			if let Some(ref cb) = *callback.borrow() {
				handle.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		self.resume();
	}

	/// Restarts a stopped loop with the callback from the last `start`.
	pub fn resume(&self) {
		if self.is_running() {
			return;
		}
		if let Some(ref cb) = *self.callback.borrow() {
			self.handle.set(
				self.window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok(),
			);
		}
	}

	/// Cancels the pending frame. The callback is kept for a later `start`.
	pub fn stop(&self) {
		if let Some(id) = self.handle.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
	}
}

impl Drop for RafLoop {
	fn drop(&mut self) {
		self.stop();
		// Break the closure's reference to itself.
		drop(self.callback.borrow_mut().take());
	}
}
