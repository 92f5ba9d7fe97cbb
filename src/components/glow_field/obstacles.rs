//! Obstacle discovery: where the decorative spheres are on screen.
//!
//! The simulation only sees [`Obstacle`] snapshots through the
//! [`ObstacleProvider`] trait. [`DomObstacleProvider`] implements it by
//! querying marker images in the host document.

use std::cell::RefCell;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement};

use super::types::{Obstacle, ObstacleId, Rect};
use crate::dom::play_effect;

/// Source of obstacle circles and target of contact effects.
pub trait ObstacleProvider {
	/// Current screen-space circles of all obstacles.
	fn discover(&self) -> Vec<Obstacle>;

	/// Brief glow after a particle bounced off `id`.
	fn highlight(&self, _id: ObstacleId) {}

	/// Spin `id` in response to a direct tap.
	fn spin(&self, _id: ObstacleId) {}
}

/// Time- and invalidation-based cache over an [`ObstacleProvider`].
#[derive(Clone, Debug)]
pub struct ObstacleCache {
	obstacles: Vec<Obstacle>,
	refreshed_at: Option<f64>,
	dirty: bool,
	interval_ms: f64,
}

impl ObstacleCache {
	pub fn new(interval_ms: f64) -> Self {
		Self {
			obstacles: Vec::new(),
			refreshed_at: None,
			dirty: true,
			interval_ms,
		}
	}

	/// Force a re-query on the next [`ObstacleCache::refresh_if_stale`].
	pub fn invalidate(&mut self) {
		self.dirty = true;
	}

	pub fn is_stale(&self, now_ms: f64) -> bool {
		self.dirty
			|| self
				.refreshed_at
				.is_none_or(|at| now_ms - at >= self.interval_ms || now_ms < at)
	}

	pub fn refresh(&mut self, provider: &dyn ObstacleProvider, now_ms: f64) {
		let obstacles = provider.discover();
		if obstacles.len() != self.obstacles.len() {
			debug!("glow-field: tracking {} obstacles", obstacles.len());
		}
		self.obstacles = obstacles;
		self.refreshed_at = Some(now_ms);
		self.dirty = false;
	}

	/// Re-query the provider if the snapshot is dirty or older than the
	/// refresh interval. Returns true if a refresh happened.
	pub fn refresh_if_stale(&mut self, provider: &dyn ObstacleProvider, now_ms: f64) -> bool {
		if !self.is_stale(now_ms) {
			return false;
		}
		self.refresh(provider, now_ms);
		true
	}

	pub fn snapshot(&self) -> &[Obstacle] {
		&self.obstacles
	}

	/// The obstacle containing `(x, y)` whose center is closest to it.
	pub fn nearest_containing(&self, x: f64, y: f64) -> Option<&Obstacle> {
		self.obstacles
			.iter()
			.filter(|o| o.contains(x, y))
			.min_by(|a, b| {
				let da = (a.x - x).powi(2) + (a.y - y).powi(2);
				let db = (b.x - x).powi(2) + (b.y - y).powi(2);
				da.total_cmp(&db)
			})
	}
}

/// Finds obstacles among the document's `<img>` elements by `src` suffix.
pub struct DomObstacleProvider {
	document: Document,
	marker_suffix: String,
	elements: RefCell<Vec<Element>>,
}

impl DomObstacleProvider {
	pub fn new(document: Document, marker_suffix: &str) -> Self {
		Self {
			document,
			marker_suffix: marker_suffix.to_string(),
			elements: RefCell::new(Vec::new()),
		}
	}

	fn element(&self, id: ObstacleId) -> Option<Element> {
		self.elements.borrow().get(id).cloned()
	}
}

impl ObstacleProvider for DomObstacleProvider {
	fn discover(&self) -> Vec<Obstacle> {
		let mut elements = self.elements.borrow_mut();
		elements.clear();

		let Ok(images) = self.document.query_selector_all("img") else {
			return Vec::new();
		};

		let mut obstacles = Vec::new();
		for i in 0..images.length() {
			let Some(img) = images
				.item(i)
				.and_then(|n| n.dyn_into::<HtmlImageElement>().ok())
			else {
				continue;
			};
			if !img.src().ends_with(&self.marker_suffix) {
				continue;
			}
			let rect = img.get_bounding_client_rect();
			if rect.width() <= 0.0 || rect.height() <= 0.0 {
				continue;
			}
			let bounds = Rect {
				left: rect.left(),
				top: rect.top(),
				right: rect.right(),
				bottom: rect.bottom(),
			};
			obstacles.push(Obstacle::from_rect(elements.len(), bounds));
			elements.push(img.into());
		}
		obstacles
	}

	fn highlight(&self, id: ObstacleId) {
		if let Some(el) = self.element(id) {
			play_effect(
				&el,
				&[
					&[("filter", "brightness(1)")],
					&[(
						"filter",
						"brightness(1.35) drop-shadow(0 0 18px rgba(120, 175, 255, 0.65))",
					)],
					&[("filter", "brightness(1)")],
				],
				420.0,
				&[("easing", "ease-out")],
			);
		}
	}

	fn spin(&self, id: ObstacleId) {
		if let Some(el) = self.element(id) {
			play_effect(
				&el,
				&[
					&[("transform", "rotate(0deg)")],
					&[("transform", "rotate(360deg)")],
				],
				900.0,
				&[("easing", "cubic-bezier(0.2, 0.8, 0.2, 1)"), ("composite", "add")],
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	struct CountingProvider {
		obstacles: Vec<Obstacle>,
		calls: Cell<usize>,
	}

	impl ObstacleProvider for CountingProvider {
		fn discover(&self) -> Vec<Obstacle> {
			self.calls.set(self.calls.get() + 1);
			self.obstacles.clone()
		}
	}

	fn provider() -> CountingProvider {
		CountingProvider {
			obstacles: vec![
				Obstacle::circle(0, 100.0, 100.0, 40.0),
				Obstacle::circle(1, 130.0, 100.0, 40.0),
			],
			calls: Cell::new(0),
		}
	}

	#[test]
	fn refreshes_on_interval() {
		let provider = provider();
		let mut cache = ObstacleCache::new(500.0);

		assert!(cache.refresh_if_stale(&provider, 0.0));
		assert!(!cache.refresh_if_stale(&provider, 200.0));
		assert!(cache.refresh_if_stale(&provider, 500.0));
		assert_eq!(provider.calls.get(), 2);
		assert_eq!(cache.snapshot().len(), 2);
	}

	#[test]
	fn invalidation_forces_refresh() {
		let provider = provider();
		let mut cache = ObstacleCache::new(500.0);
		cache.refresh_if_stale(&provider, 0.0);
		cache.invalidate();
		assert!(cache.refresh_if_stale(&provider, 10.0));
		assert_eq!(provider.calls.get(), 2);
	}

	#[test]
	fn nearest_containing_prefers_closest_center() {
		let provider = provider();
		let mut cache = ObstacleCache::new(500.0);
		cache.refresh(&provider, 0.0);

		assert_eq!(cache.nearest_containing(125.0, 100.0).map(|o| o.id), Some(1));
		assert_eq!(cache.nearest_containing(95.0, 100.0).map(|o| o.id), Some(0));
		assert!(cache.nearest_containing(400.0, 400.0).is_none());
	}

	#[test]
	fn from_rect_inscribes_circle() {
		let o = Obstacle::from_rect(
			4,
			Rect {
				left: 10.0,
				top: 20.0,
				right: 110.0,
				bottom: 80.0,
			},
		);
		assert_eq!((o.x, o.y, o.radius), (60.0, 50.0, 30.0));
	}
}
