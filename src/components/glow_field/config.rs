//! Tunable parameters for the particle field.
//!
//! Every section deserializes with per-field defaults, so a host page can
//! override a single value:
//!
//! ```json
//! { "pointer": { "radius": 180 }, "density": { "max_count": 80 } }
//! ```

use log::warn;
use rand::Rng;
use serde::Deserialize;

/// Closed range `[min, max]` sampled uniformly. Written as `[min, max]` in JSON.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span(pub f64, pub f64);

impl Span {
	pub fn sample(&self, rng: &mut impl Rng) -> f64 {
		let Span(min, max) = *self;
		if max > min {
			rng.gen_range(min..max)
		} else {
			min
		}
	}
}

/// How many particles the viewport should hold.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
	/// Screen area (px²) allotted to each particle.
	pub area_per_particle: f64,
	pub min_count: usize,
	pub max_count: usize,
	/// Most particles added by a single resize call.
	pub spawn_cap: usize,
}

impl Default for DensityConfig {
	fn default() -> Self {
		Self {
			area_per_particle: 9_000.0,
			min_count: 24,
			max_count: 120,
			spawn_cap: 40,
		}
	}
}

/// Randomization ranges for newly spawned particles.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
	pub radius: Span,
	pub opacity: Span,
	pub glow: Span,
	pub vx: Span,
	/// Base fall speed; `fall_per_radius * radius` is added on top.
	pub vy: Span,
	pub fall_per_radius: f64,
	pub drift: Span,
	/// Vertical band (above the viewport) used when a particle respawns.
	pub respawn_y: Span,
}

impl Default for SpawnConfig {
	fn default() -> Self {
		Self {
			radius: Span(8.0, 20.0),
			opacity: Span(0.22, 0.55),
			glow: Span(0.35, 0.9),
			vx: Span(-18.0, 18.0),
			vy: Span(28.0, 90.0),
			fall_per_radius: 4.0,
			drift: Span(12.0, 40.0),
			respawn_y: Span(-260.0, -40.0),
		}
	}
}

/// Frame timing, sway and viewport margins.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
	pub min_dt: f64,
	pub max_dt: f64,
	/// Sway phase speed (radians per second), sampled every frame.
	pub phase_rate: Span,
	/// Horizontal distance past either edge before a particle wraps.
	pub side_margin: f64,
	/// Distance below the bottom edge before a particle respawns.
	pub bottom_margin: f64,
	/// Rate (1/s) at which velocity eases back to its spawn value.
	pub relax_rate: f64,
}

impl Default for MotionConfig {
	fn default() -> Self {
		Self {
			min_dt: 0.001,
			max_dt: 0.033,
			phase_rate: Span(0.8, 1.4),
			side_margin: 120.0,
			bottom_margin: 160.0,
			relax_rate: 1.2,
		}
	}
}

/// Pointer repulsion.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RepulsionConfig {
	pub radius: f64,
	/// Impulse (px/s per second) at the pointer while a button is held.
	pub press_strength: f64,
	/// Impulse at the pointer while merely hovering.
	pub hover_strength: f64,
	/// How long hover repulsion lingers after the last pointer update.
	pub hover_window_ms: f64,
}

impl Default for RepulsionConfig {
	fn default() -> Self {
		Self {
			radius: 140.0,
			press_strength: 2_400.0,
			hover_strength: 900.0,
			hover_window_ms: 700.0,
		}
	}
}

/// Collision response against obstacles.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
	/// Fraction of the obstacle radius that counts as solid.
	pub hit_fraction: f64,
	/// Subtracted from the combined hit radius.
	pub inset: f64,
	/// Extra slack around the obstacle's bounds for the broad-phase test.
	pub bounds_margin: f64,
	pub bounce: f64,
	pub damping: f64,
	/// Tangential speed added on contact.
	pub kick: f64,
	/// Minimum time between two highlights of the same obstacle.
	pub highlight_interval_ms: f64,
}

impl Default for CollisionConfig {
	fn default() -> Self {
		Self {
			hit_fraction: 0.92,
			inset: 2.0,
			bounds_margin: 6.0,
			bounce: 0.55,
			damping: 0.86,
			kick: 24.0,
			highlight_interval_ms: 250.0,
		}
	}
}

/// Obstacle discovery in the host page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
	/// Images whose `src` ends with this are treated as obstacles.
	pub marker_suffix: String,
	pub refresh_interval_ms: f64,
}

impl Default for ObstacleConfig {
	fn default() -> Self {
		Self {
			marker_suffix: "sphere.png".to_string(),
			refresh_interval_ms: 500.0,
		}
	}
}

/// Complete field configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	pub density: DensityConfig,
	pub spawn: SpawnConfig,
	pub motion: MotionConfig,
	pub pointer: RepulsionConfig,
	pub collision: CollisionConfig,
	pub obstacles: ObstacleConfig,
}

impl FieldConfig {
	/// Reset settings the simulation cannot run with to their defaults.
	///
	/// Currently this is a negative or inverted frame step range, which would
	/// make every time clamp fail.
	pub fn sanitized(mut self) -> Self {
		let MotionConfig { min_dt, max_dt, .. } = self.motion;
		if !(min_dt >= 0.0 && min_dt <= max_dt) {
			warn!("glow-field: invalid frame step range [{min_dt}, {max_dt}], using defaults");
			let defaults = MotionConfig::default();
			self.motion.min_dt = defaults.min_dt;
			self.motion.max_dt = defaults.max_dt;
		}
		self
	}
}
