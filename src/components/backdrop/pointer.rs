//! Pointer and touch tracking.

use rand::Rng;

use super::viewport::Viewport;

/// Where an interaction sample came from; touch points are drawn larger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
	Mouse,
	Touch,
}

/// One pointer-move or touch-move coordinate, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
	pub x: f64,
	pub y: f64,
	pub kind: PointerKind,
}

impl PointerSample {
	pub fn mouse(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			kind: PointerKind::Mouse,
		}
	}

	pub fn touch(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			kind: PointerKind::Touch,
		}
	}
}

/// Latest known interaction point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
	/// Position mapped to [-0.5, 0.5] relative to the viewport center.
	pub nx: f64,
	pub ny: f64,
	/// False until the first sample arrives.
	pub seen: bool,
}

/// Records pointer samples and thins them out for particle spawning.
#[derive(Clone, Debug)]
pub struct PointerTracker {
	state: PointerState,
	accept_rate: f64,
}

impl PointerTracker {
	/// `accept_rate` is the probability that a sample spawns work.
	pub fn new(accept_rate: f64) -> Self {
		Self {
			state: PointerState::default(),
			accept_rate: if accept_rate.is_finite() {
				accept_rate.clamp(0.0, 1.0)
			} else {
				0.0
			},
		}
	}

	pub fn state(&self) -> &PointerState {
		&self.state
	}

	pub fn accept_rate(&self) -> f64 {
		self.accept_rate
	}

	/// Always updates the stored coordinate; returns whether the sample
	/// passed the sampling filter.
	pub fn record(&mut self, sample: PointerSample, viewport: Viewport, rng: &mut impl Rng) -> bool {
		if !sample.x.is_finite() || !sample.y.is_finite() {
			return false;
		}
		let (nx, ny) = viewport.normalize(sample.x, sample.y);
		self.state = PointerState {
			x: sample.x,
			y: sample.y,
			nx,
			ny,
			seen: true,
		};
		rng.gen_bool(self.accept_rate)
	}
}

impl Default for PointerTracker {
	fn default() -> Self {
		Self::new(0.5)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn every_sample_updates_state() {
		let mut tracker = PointerTracker::new(0.0);
		let mut rng = SmallRng::seed_from_u64(1);
		let vp = Viewport::new(400.0, 200.0);
		assert!(!tracker.record(PointerSample::mouse(300.0, 50.0), vp, &mut rng));
		let state = tracker.state();
		assert!(state.seen);
		assert_eq!((state.x, state.y), (300.0, 50.0));
		assert_eq!((state.nx, state.ny), (0.25, -0.25));
	}

	#[test]
	fn sampling_accepts_roughly_half() {
		let mut tracker = PointerTracker::default();
		let mut rng = SmallRng::seed_from_u64(99);
		let vp = Viewport::new(100.0, 100.0);
		let accepted = (0..2_000)
			.filter(|i| tracker.record(PointerSample::touch(*i as f64 % 100.0, 10.0), vp, &mut rng))
			.count();
		assert!((800..1_200).contains(&accepted), "accepted {accepted}");
	}

	#[test]
	fn non_finite_samples_are_ignored() {
		let mut tracker = PointerTracker::new(1.0);
		let mut rng = SmallRng::seed_from_u64(1);
		assert!(!tracker.record(PointerSample::mouse(f64::NAN, 1.0), Viewport::new(10.0, 10.0), &mut rng));
		assert!(!tracker.state().seen);
		assert_eq!(PointerTracker::new(f64::NAN).accept_rate(), 0.0);
		assert_eq!(PointerTracker::new(3.0).accept_rate(), 1.0);
	}
}
