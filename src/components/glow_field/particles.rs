//! Particle store: the falling glow particles and their spawn policy.

use std::f64::consts::TAU;

use rand::Rng;
use rand::rngs::SmallRng;

use super::config::{DensityConfig, SpawnConfig};
use super::types::Viewport;

/// A single glowing dot.
///
/// `radius`, `opacity` and `glow` are fixed at spawn; a respawn replaces the
/// whole particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Spawn velocity, which `vx`/`vy` relax back toward after a push.
	pub base_vx: f64,
	pub base_vy: f64,
	pub radius: f64,
	pub opacity: f64,
	pub glow: f64,
	/// Amplitude (px/s) of the horizontal sway.
	pub drift: f64,
	pub phase: f64,
}

impl Particle {
	/// A particle at rest with no sway.
	#[cfg(test)]
	pub(crate) fn at_rest(x: f64, y: f64, radius: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			base_vx: 0.0,
			base_vy: 0.0,
			radius,
			opacity: 0.4,
			glow: 0.6,
			drift: 0.0,
			phase: 0.0,
		}
	}
}

/// Owns the particle collection and keeps its size proportional to the
/// viewport area.
pub struct ParticleStore {
	particles: Vec<Particle>,
	viewport: Viewport,
	spawn: SpawnConfig,
	density: DensityConfig,
	rng: SmallRng,
}

impl ParticleStore {
	pub fn new(spawn: SpawnConfig, density: DensityConfig, viewport: Viewport, rng: SmallRng) -> Self {
		Self {
			particles: Vec::with_capacity(density.max_count),
			viewport,
			spawn,
			density,
			rng,
		}
	}

	/// Particle count for the current viewport, bounded by the density limits.
	pub fn target_count(&self) -> usize {
		let raw = (self.viewport.area() / self.density.area_per_particle.max(1.0)).round() as usize;
		raw.clamp(self.density.min_count, self.density.max_count.max(self.density.min_count))
	}

	/// Create a particle. Without `origin_y` the particle starts anywhere from
	/// one viewport height above the top edge down to the bottom edge.
	pub fn spawn(&mut self, origin_y: Option<f64>) -> Particle {
		let s = &self.spawn;
		let rng = &mut self.rng;
		let (w, h) = (self.viewport.width.max(0.0), self.viewport.height.max(0.0));

		let radius = s.radius.sample(rng);
		let vx = s.vx.sample(rng);
		let vy = s.vy.sample(rng) + radius * s.fall_per_radius;
		let x = if w > 0.0 { rng.gen_range(0.0..w) } else { 0.0 };
		let y = match origin_y {
			Some(y) => y,
			None if h > 0.0 => rng.gen_range(-h..h),
			None => 0.0,
		};

		Particle {
			x,
			y,
			vx,
			vy,
			base_vx: vx,
			base_vy: vy,
			radius,
			opacity: s.opacity.sample(rng),
			glow: s.glow.sample(rng),
			drift: s.drift.sample(rng),
			phase: rng.gen_range(0.0..TAU),
		}
	}

	/// Fill the store up to the target in one batch. Used at simulation start.
	pub fn populate(&mut self) {
		let target = self.target_count();
		while self.particles.len() < target {
			let p = self.spawn(None);
			self.particles.push(p);
		}
	}

	/// Move toward `target`: grow by at most `spawn_cap` particles, or truncate.
	/// Returns how many particles were added.
	pub fn resize(&mut self, target: usize) -> usize {
		let len = self.particles.len();
		if len > target {
			self.particles.truncate(target);
			return 0;
		}
		let added = (target - len).min(self.density.spawn_cap);
		for _ in 0..added {
			let p = self.spawn(None);
			self.particles.push(p);
		}
		added
	}

	/// Replace the particle in `index` with a fresh one above the viewport.
	pub fn respawn(&mut self, index: usize) {
		if index >= self.particles.len() {
			return;
		}
		let y = self.spawn.respawn_y.sample(&mut self.rng);
		let p = self.spawn(Some(y));
		self.particles[index] = p;
	}

	pub fn set_viewport(&mut self, viewport: Viewport) {
		self.viewport = viewport;
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.particles
	}

	pub(crate) fn push(&mut self, particle: Particle) {
		self.particles.push(particle);
	}

	pub(crate) fn rng(&mut self) -> &mut SmallRng {
		&mut self.rng
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}
