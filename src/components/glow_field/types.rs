//! Geometry shared by the particle field: viewport, rectangles, obstacles.

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn area(&self) -> f64 {
		self.width.max(0.0) * self.height.max(0.0)
	}

	/// A zero-sized viewport means the drawing surface is not laid out yet.
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}
}

/// Axis-aligned rectangle in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
}

impl Rect {
	pub fn expand(self, margin: f64) -> Self {
		Self {
			left: self.left - margin,
			top: self.top - margin,
			right: self.right + margin,
			bottom: self.bottom + margin,
		}
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
	}
}

/// Identifies an obstacle across snapshots (discovery order in the host page).
pub type ObstacleId = usize;

/// Screen-space circle of a decorative element that particles bounce off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
	pub id: ObstacleId,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub bounds: Rect,
}

impl Obstacle {
	/// Obstacle whose bounds are the square circumscribing the circle.
	pub fn circle(id: ObstacleId, x: f64, y: f64, radius: f64) -> Self {
		Self {
			id,
			x,
			y,
			radius,
			bounds: Rect {
				left: x - radius,
				top: y - radius,
				right: x + radius,
				bottom: y + radius,
			},
		}
	}

	/// Circle inscribed in an element's bounding rectangle.
	pub fn from_rect(id: ObstacleId, bounds: Rect) -> Self {
		let (w, h) = (bounds.right - bounds.left, bounds.bottom - bounds.top);
		Self {
			id,
			x: bounds.left + w / 2.0,
			y: bounds.top + h / 2.0,
			radius: w.min(h) / 2.0,
			bounds,
		}
	}

	/// Whether `(x, y)` lies on or inside the obstacle's circle.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		let (dx, dy) = (x - self.x, y - self.y);
		dx * dx + dy * dy <= self.radius * self.radius
	}
}
