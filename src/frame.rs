//! Frame scheduling: a cancellable `requestAnimationFrame` loop and the clock
//! that turns its timestamps into clamped simulation steps.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

/// Converts frame timestamps (milliseconds) into elapsed seconds, clamped to
/// `[min_dt, max_dt]` so a resumed tab never produces a huge step.
#[derive(Clone, Debug)]
pub struct FrameClock {
	last: Option<f64>,
	min_dt: f64,
	max_dt: f64,
}

impl FrameClock {
	/// An inverted range collapses to `min_dt`.
	pub fn new(min_dt: f64, max_dt: f64) -> Self {
		Self {
			last: None,
			min_dt,
			max_dt: max_dt.max(min_dt),
		}
	}

	/// Record `now_ms` and return the seconds elapsed since the previous frame.
	/// The first frame after construction or [`FrameClock::reset`] yields `min_dt`.
	pub fn advance(&mut self, now_ms: f64) -> f64 {
		let dt = match self.last {
			Some(last) => ((now_ms - last) / 1000.0).clamp(self.min_dt, self.max_dt),
			None => self.min_dt,
		};
		self.last = Some(now_ms);
		dt
	}

	/// Forget the baseline; the next frame starts a fresh time base.
	pub fn reset(&mut self) {
		self.last = None;
	}
}

struct FrameLoopInner {
	handle: Cell<Option<i32>>,
	running: Cell<bool>,
	tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoopInner {
	fn schedule(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.tick.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				self.handle.set(Some(id));
			}
		}
	}

	fn cancel(&self) {
		self.running.set(false);
		if let Some(id) = self.handle.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
	}
}

impl Drop for FrameLoopInner {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// A "run until cancelled" task driven by `requestAnimationFrame`.
///
/// Clones share the same loop. The per-tick callback receives the frame
/// timestamp in milliseconds. At most one frame request is in flight; the
/// pending request is cancelled when the last handle is dropped.
#[derive(Clone)]
pub struct FrameLoop {
	inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
	pub fn new(mut on_frame: impl FnMut(f64) + 'static) -> Self {
		let inner = Rc::new(FrameLoopInner {
			handle: Cell::new(None),
			running: Cell::new(false),
			tick: RefCell::new(None),
		});
		let weak: Weak<FrameLoopInner> = Rc::downgrade(&inner);
		*inner.tick.borrow_mut() = Some(Closure::new(move |now: f64| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			inner.handle.set(None);
			if !inner.running.get() {
				return;
			}
			on_frame(now);
			if inner.running.get() {
				inner.schedule();
			}
		}));
		Self { inner }
	}

	/// Start the loop. No-op if it is already running.
	pub fn start(&self) {
		if self.inner.running.replace(true) {
			return;
		}
		self.inner.schedule();
	}

	/// Stop the loop and cancel the pending frame request.
	pub fn cancel(&self) {
		self.inner.cancel();
	}

	pub fn is_running(&self) -> bool {
		self.inner.running.get()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_frame_uses_min_step() {
		let mut clock = FrameClock::new(0.001, 0.033);
		assert_eq!(clock.advance(1000.0), 0.001);
		let dt = clock.advance(1016.0);
		assert!((dt - 0.016).abs() < 1e-9, "dt = {dt}");
	}

	#[test]
	fn inverted_range_collapses_to_min() {
		let mut clock = FrameClock::new(0.05, 0.033);
		clock.advance(0.0);
		assert_eq!(clock.advance(16.0), 0.05);
	}

	#[test]
	fn long_gaps_are_clamped() {
		let mut clock = FrameClock::new(0.001, 0.033);
		clock.advance(0.0);
		assert_eq!(clock.advance(5000.0), 0.033);
		// Timestamps going backwards never produce a negative step.
		assert_eq!(clock.advance(4000.0), 0.001);
	}

	#[test]
	fn reset_discards_baseline() {
		let mut clock = FrameClock::new(0.001, 0.033);
		clock.advance(0.0);
		clock.reset();
		assert_eq!(clock.advance(60_000.0), 0.001);
	}
}
