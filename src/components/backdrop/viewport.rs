//! Surface dimensions and resize coalescing.

/// Drawing-surface size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	/// Negative or non-finite sizes collapse to zero.
	pub fn new(width: f64, height: f64) -> Self {
		let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
		Self {
			width: sanitize(width),
			height: sanitize(height),
		}
	}

	pub fn square(side: f64) -> Self {
		Self::new(side, side)
	}

	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		(0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
	}

	/// Maps a pixel coordinate to [-0.5, 0.5] on both axes.
	pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
		if self.is_empty() {
			return (0.0, 0.0);
		}
		(
			(x / self.width - 0.5).clamp(-0.5, 0.5),
			(y / self.height - 0.5).clamp(-0.5, 0.5),
		)
	}
}

/// Collects resize notifications and hands back only the latest one.
///
/// Browsers fire `resize` many times per frame while a window is dragged;
/// the engine drains this once per frame so a burst costs one regeneration.
#[derive(Clone, Debug, Default)]
pub struct ResizeQueue {
	pending: Option<Viewport>,
	coalesced: u32,
}

impl ResizeQueue {
	pub fn push(&mut self, viewport: Viewport) {
		if self.pending.is_some() {
			self.coalesced += 1;
		}
		self.pending = Some(viewport);
	}

	/// Takes the latest viewport and how many earlier ones it superseded.
	pub fn take(&mut self) -> Option<(Viewport, u32)> {
		let viewport = self.pending.take()?;
		let coalesced = std::mem::take(&mut self.coalesced);
		Some((viewport, coalesced))
	}
}
