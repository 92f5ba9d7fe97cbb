//! Particle-versus-obstacle collision response and highlight rate limiting.

use std::collections::HashMap;

use super::config::CollisionConfig;
use super::particles::Particle;
use super::types::{Obstacle, ObstacleId};

/// Distance from the obstacle center at which a particle is considered touching.
pub fn hit_radius(obstacle: &Obstacle, particle: &Particle, config: &CollisionConfig) -> f64 {
	(obstacle.radius * config.hit_fraction + particle.radius - config.inset).max(0.0)
}

/// Resolve a penetration of `p` into `obstacle`. Returns true on contact.
///
/// The particle is moved onto the hit circle along the contact normal, its
/// inward normal velocity is reflected with `bounce`, the whole velocity is
/// damped, and a small tangential kick keeps it from resting on the surface.
pub fn resolve(p: &mut Particle, obstacle: &Obstacle, config: &CollisionConfig) -> bool {
	if !obstacle
		.bounds
		.expand(config.bounds_margin + p.radius)
		.contains(p.x, p.y)
	{
		return false;
	}

	let hit = hit_radius(obstacle, p, config);
	let (dx, dy) = (p.x - obstacle.x, p.y - obstacle.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist >= hit {
		return false;
	}

	let (nx, ny) = if dist > 1e-6 {
		(dx / dist, dy / dist)
	} else {
		(0.0, -1.0)
	};
	p.x = obstacle.x + nx * hit;
	p.y = obstacle.y + ny * hit;

	let vn = p.vx * nx + p.vy * ny;
	if vn < 0.0 {
		p.vx -= (1.0 + config.bounce) * vn * nx;
		p.vy -= (1.0 + config.bounce) * vn * ny;
	}
	p.vx *= config.damping;
	p.vy *= config.damping;

	// Tangent (-ny, nx); push along whichever way the particle already slides.
	let (tx, ty) = (-ny, nx);
	let sign = if p.vx * tx + p.vy * ty >= 0.0 { 1.0 } else { -1.0 };
	p.vx += tx * config.kick * sign;
	p.vy += ty * config.kick * sign;
	true
}

/// Allows at most one highlight per obstacle within `interval_ms`.
#[derive(Clone, Debug, Default)]
pub struct HighlightLimiter {
	last: HashMap<ObstacleId, f64>,
	interval_ms: f64,
}

impl HighlightLimiter {
	pub fn new(interval_ms: f64) -> Self {
		Self {
			last: HashMap::new(),
			interval_ms,
		}
	}

	/// Returns true (and records `now_ms`) if `id` may be highlighted now.
	pub fn try_trigger(&mut self, id: ObstacleId, now_ms: f64) -> bool {
		match self.last.get(&id) {
			Some(&at) if now_ms - at < self.interval_ms => false,
			_ => {
				self.last.insert(id, now_ms);
				true
			}
		}
	}

	/// Drop entries for obstacles that no longer exist.
	pub fn retain_known(&mut self, obstacles: &[Obstacle]) {
		self.last.retain(|id, _| obstacles.iter().any(|o| o.id == *id));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn particle_at_center_is_pushed_to_hit_radius() {
		let config = CollisionConfig::default();
		let obstacle = Obstacle::circle(0, 400.0, 300.0, 40.0);
		let mut p = Particle::at_rest(400.0, 300.0, 10.0);

		assert!(resolve(&mut p, &obstacle, &config));
		let dist = ((p.x - 400.0).powi(2) + (p.y - 300.0).powi(2)).sqrt();
		assert!(approx(dist, 40.0 * 0.92 + 10.0 - 2.0), "dist = {dist}");
	}

	#[test]
	fn inward_velocity_is_reflected_and_damped() {
		let config = CollisionConfig::default();
		let obstacle = Obstacle::circle(0, 0.0, 0.0, 40.0);
		// Just above the obstacle, falling into it.
		let mut p = Particle::at_rest(0.0, -30.0, 10.0);
		p.vy = 100.0;

		assert!(resolve(&mut p, &obstacle, &config));
		// Normal points up (-y); reflected velocity must point up too.
		assert!(approx(p.vy, -100.0 * config.bounce * config.damping), "vy = {}", p.vy);
		assert!(approx(p.vx.abs(), config.kick));
	}

	#[test]
	fn particle_outside_is_untouched() {
		let config = CollisionConfig::default();
		let obstacle = Obstacle::circle(0, 0.0, 0.0, 40.0);
		let mut p = Particle::at_rest(200.0, 0.0, 10.0);
		let before = p.clone();

		assert!(!resolve(&mut p, &obstacle, &config));
		assert_eq!(p, before);
	}

	#[test]
	fn limiter_blocks_repeats_inside_interval() {
		let mut limiter = HighlightLimiter::new(250.0);
		assert!(limiter.try_trigger(1, 0.0));
		assert!(!limiter.try_trigger(1, 100.0));
		assert!(!limiter.try_trigger(1, 249.0));
		assert!(limiter.try_trigger(2, 249.0));
		assert!(limiter.try_trigger(1, 250.0));
	}

	#[test]
	fn limiter_forgets_removed_obstacles() {
		let mut limiter = HighlightLimiter::new(250.0);
		limiter.try_trigger(3, 0.0);
		limiter.retain_known(&[Obstacle::circle(1, 0.0, 0.0, 10.0)]);
		assert!(limiter.try_trigger(3, 1.0));
	}
}
