//! Simulation context for the glow field.
//!
//! [`FieldContext`] bundles everything the per-frame update needs: the
//! particle store, pointer state, the obstacle snapshot and the highlight
//! limiter. The component owns exactly one and drives it with
//! [`FieldContext::frame`]. Tests drive [`FieldContext::step`] directly with a
//! fixed time step.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::collision::{self, HighlightLimiter};
use super::config::FieldConfig;
use super::obstacles::{ObstacleCache, ObstacleProvider};
use super::particles::{Particle, ParticleStore};
use super::pointer::{self, PointerState};
use super::types::{ObstacleId, Viewport};
use crate::frame::FrameClock;

/// Explicit simulation state, owned by the component instance.
pub struct FieldContext {
	config: FieldConfig,
	store: ParticleStore,
	pointer: PointerState,
	obstacles: ObstacleCache,
	highlights: HighlightLimiter,
	clock: FrameClock,
}

impl FieldContext {
	/// Context seeded from the platform's entropy source.
	pub fn new(config: FieldConfig, viewport: Viewport) -> Self {
		Self::with_rng(config, viewport, SmallRng::from_entropy())
	}

	/// Deterministic context, for reproducible runs.
	pub fn with_seed(config: FieldConfig, viewport: Viewport, seed: u64) -> Self {
		Self::with_rng(config, viewport, SmallRng::seed_from_u64(seed))
	}

	fn with_rng(config: FieldConfig, viewport: Viewport, rng: SmallRng) -> Self {
		let config = config.sanitized();
		Self {
			store: ParticleStore::new(config.spawn.clone(), config.density.clone(), viewport, rng),
			pointer: PointerState::default(),
			obstacles: ObstacleCache::new(config.obstacles.refresh_interval_ms),
			highlights: HighlightLimiter::new(config.collision.highlight_interval_ms),
			clock: FrameClock::new(config.motion.min_dt, config.motion.max_dt),
			config,
		}
	}

	/// Spawn the initial batch of particles.
	pub fn init(&mut self) {
		self.store.populate();
	}

	/// The drawing surface changed size.
	pub fn resize(&mut self, viewport: Viewport) {
		self.store.set_viewport(viewport);
		let target = self.store.target_count();
		self.store.resize(target);
		self.obstacles.invalidate();
	}

	pub fn viewport(&self) -> Viewport {
		self.store.viewport()
	}

	pub fn particles(&self) -> &[Particle] {
		self.store.particles()
	}

	pub fn pointer(&self) -> &PointerState {
		&self.pointer
	}

	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	/// Pointer button went down. Returns the obstacle under the pointer, if any,
	/// so the caller can play the tap effect on it.
	pub fn pointer_down(&mut self, x: f64, y: f64, now_ms: f64) -> Option<ObstacleId> {
		self.pointer.press(x, y, now_ms);
		self.obstacles.nearest_containing(x, y).map(|o| o.id)
	}

	pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: f64) {
		self.pointer.move_to(x, y, now_ms);
	}

	pub fn pointer_up(&mut self, now_ms: f64) {
		self.pointer.release(now_ms);
	}

	/// The host page changed; re-query obstacles on the next frame.
	pub fn invalidate_obstacles(&mut self) {
		self.obstacles.invalidate();
	}

	/// Start a new time base, e.g. after the tab becomes visible again.
	pub fn reset_clock(&mut self) {
		self.clock.reset();
	}

	/// Run one animation frame at timestamp `now_ms`: move the particle count
	/// toward its target, refresh obstacles if the snapshot is stale, then step
	/// the simulation. Returns the obstacles that should flash.
	pub fn frame(&mut self, now_ms: f64, provider: &dyn ObstacleProvider) -> Vec<ObstacleId> {
		let dt = self.clock.advance(now_ms);
		let target = self.store.target_count();
		self.store.resize(target);
		if self.obstacles.refresh_if_stale(provider, now_ms) {
			self.highlights.retain_known(self.obstacles.snapshot());
		}
		self.step(dt, now_ms)
	}

	/// Advance every particle by `dt` seconds.
	///
	/// Per particle: sway and integrate, wrap horizontally, respawn after
	/// leaving the bottom, pointer repulsion, then obstacle collision.
	pub fn step(&mut self, dt: f64, now_ms: f64) -> Vec<ObstacleId> {
		let viewport = self.store.viewport();
		if viewport.is_empty() {
			return Vec::new();
		}
		let dt = dt.clamp(self.config.motion.min_dt, self.config.motion.max_dt);

		let motion = &self.config.motion;
		let strength = self.pointer.strength(now_ms, &self.config.pointer);
		let relax = 1.0 - (-motion.relax_rate * dt).exp();
		let mut hits = Vec::new();

		for i in 0..self.store.len() {
			let phase_step = dt * motion.phase_rate.sample(self.store.rng());
			let p = &mut self.store.particles_mut()[i];

			p.phase += phase_step;
			p.vx += (p.base_vx - p.vx) * relax;
			p.vy += (p.base_vy - p.vy) * relax;
			p.x += (p.vx + p.phase.sin() * p.drift) * dt;
			p.y += p.vy * dt;

			wrap_horizontal(p, viewport.width, motion.side_margin);

			if p.y - p.radius > viewport.height + motion.bottom_margin {
				self.store.respawn(i);
				continue;
			}

			pointer::repel(p, &self.pointer, strength, self.config.pointer.radius, dt);

			for obstacle in self.obstacles.snapshot() {
				if collision::resolve(p, obstacle, &self.config.collision)
					&& self.highlights.try_trigger(obstacle.id, now_ms)
				{
					hits.push(obstacle.id);
				}
			}

			wrap_horizontal(p, viewport.width, motion.side_margin);
		}

		hits
	}

	#[cfg(test)]
	pub(crate) fn obstacles_mut(&mut self) -> &mut ObstacleCache {
		&mut self.obstacles
	}

	#[cfg(test)]
	pub(crate) fn store_mut(&mut self) -> &mut ParticleStore {
		&mut self.store
	}
}

/// Teleport a particle that left the side margin to the opposite edge.
fn wrap_horizontal(p: &mut Particle, width: f64, margin: f64) {
	if p.x < -margin {
		p.x = width + margin;
	} else if p.x > width + margin {
		p.x = -margin;
	}
}

#[cfg(test)]
mod tests {
	use rand::Rng;

	use super::super::config::DensityConfig;
	use super::super::types::Obstacle;
	use super::*;

	struct Fixed(Vec<Obstacle>);

	impl ObstacleProvider for Fixed {
		fn discover(&self) -> Vec<Obstacle> {
			self.0.clone()
		}
	}

	const VIEW: Viewport = Viewport::new(800.0, 600.0);

	/// Starts empty; the per-frame target is a single particle.
	fn empty_context() -> FieldContext {
		let config = FieldConfig {
			density: DensityConfig {
				min_count: 1,
				max_count: 1,
				area_per_particle: f64::MAX,
				..DensityConfig::default()
			},
			..FieldConfig::default()
		};
		FieldContext::with_seed(config, VIEW, 42)
	}

	fn with_sphere(ctx: &mut FieldContext) -> Obstacle {
		let sphere = Obstacle::circle(0, 400.0, 300.0, 40.0);
		ctx.obstacles_mut().refresh(&Fixed(vec![sphere]), 0.0);
		sphere
	}

	#[test]
	fn particle_at_obstacle_center_is_pushed_out() {
		let mut ctx = empty_context();
		let sphere = with_sphere(&mut ctx);
		ctx.store_mut().push(Particle::at_rest(400.0, 300.0, 10.0));

		let hits = ctx.step(0.016, 1000.0);

		let p = &ctx.particles()[0];
		let hit = collision::hit_radius(&sphere, p, &ctx.config().collision);
		let (dx, dy) = (p.x - sphere.x, p.y - sphere.y);
		let dist = (dx * dx + dy * dy).sqrt();
		assert!((dist - hit).abs() < 1e-9, "dist {dist} vs hit {hit}");

		let (nx, ny) = (dx / dist, dy / dist);
		assert!(p.vx * nx + p.vy * ny >= 0.0, "normal velocity points outward");
		assert_eq!(hits, vec![0]);
	}

	#[test]
	fn sustained_contact_highlights_once_per_interval() {
		let mut ctx = empty_context();
		with_sphere(&mut ctx);
		ctx.store_mut().push(Particle::at_rest(400.0, 300.0, 10.0));

		let mut flashes = 0;
		for frame in 0..15 {
			// Hold the particle inside the sphere every frame.
			let p = &mut ctx.store_mut().particles_mut()[0];
			p.x = 400.0;
			p.y = 300.0;
			flashes += ctx.step(0.016, 1000.0 + frame as f64 * 16.0).len();
		}
		// 15 frames span 224 ms, inside the 250 ms window.
		assert_eq!(flashes, 1);

		let p = &mut ctx.store_mut().particles_mut()[0];
		p.x = 400.0;
		p.y = 300.0;
		assert_eq!(ctx.step(0.016, 1250.0).len(), 1);
	}

	#[test]
	fn particles_stay_inside_side_margins() {
		let mut ctx = FieldContext::with_seed(FieldConfig::default(), VIEW, 7);
		ctx.init();
		ctx.pointer_down(400.0, 300.0, 0.0);
		with_sphere(&mut ctx);
		let margin = ctx.config().motion.side_margin;

		for frame in 0..2_000 {
			ctx.step(0.033, frame as f64 * 33.0);
			for p in ctx.particles() {
				assert!(
					p.x >= -margin && p.x <= VIEW.width + margin,
					"frame {frame}: x = {}",
					p.x
				);
			}
		}
	}

	#[test]
	fn particles_below_the_viewport_respawn_above() {
		let mut ctx = empty_context();
		let mut rng = SmallRng::seed_from_u64(5);
		for _ in 0..20 {
			let x = rng.gen_range(-50.0..VIEW.width + 50.0);
			let mut p = Particle::at_rest(x, VIEW.height + 300.0, 10.0);
			p.vy = 50.0;
			p.base_vy = 50.0;
			ctx.store_mut().push(p);
		}

		ctx.step(0.016, 0.0);

		for p in ctx.particles() {
			assert!(p.y <= 0.0, "respawned at y = {}", p.y);
		}
	}

	#[test]
	fn pressed_pointer_pushes_nearby_particles() {
		let mut ctx = empty_context();
		ctx.store_mut().push(Particle::at_rest(300.0, 300.0, 10.0));
		ctx.pointer_down(250.0, 300.0, 0.0);

		ctx.step(0.016, 0.0);

		assert!(ctx.particles()[0].vx > 0.0);
	}

	#[test]
	fn pointer_down_reports_tapped_obstacle() {
		let mut ctx = empty_context();
		with_sphere(&mut ctx);
		assert_eq!(ctx.pointer_down(410.0, 290.0, 0.0), Some(0));
		assert_eq!(ctx.pointer_down(10.0, 10.0, 0.0), None);
		assert!(ctx.pointer().pressed);
	}

	#[test]
	fn resize_retargets_gradually() {
		let mut ctx = FieldContext::with_seed(FieldConfig::default(), Viewport::new(400.0, 300.0), 9);
		ctx.init();
		assert_eq!(ctx.particles().len(), 24);

		ctx.resize(Viewport::new(2000.0, 1200.0));
		assert_eq!(ctx.particles().len(), 64);
		let provider = Fixed(Vec::new());
		ctx.frame(0.0, &provider);
		ctx.frame(16.0, &provider);
		assert_eq!(ctx.particles().len(), 120);

		ctx.resize(Viewport::new(400.0, 300.0));
		assert_eq!(ctx.particles().len(), 24);
	}

	#[test]
	fn frame_refreshes_obstacles_and_clamps_time() {
		let mut ctx = empty_context();
		ctx.store_mut().push(Particle::at_rest(400.0, 300.0, 10.0));
		let provider = Fixed(vec![Obstacle::circle(0, 400.0, 300.0, 40.0)]);

		let hits = ctx.frame(0.0, &provider);
		assert_eq!(hits, vec![0]);

		// A long pause still moves particles by at most one clamped step.
		ctx.reset_clock();
		let before = ctx.particles()[0].y;
		ctx.frame(10_000.0, &provider);
		ctx.frame(20_000.0, &provider);
		let moved = (ctx.particles()[0].y - before).abs();
		assert!(moved < 10.0, "moved {moved}");
	}

	#[test]
	fn inverted_step_range_from_json_still_runs() {
		let config: FieldConfig = serde_json::from_str(r#"{ "motion": { "min_dt": 0.05 } }"#).unwrap();
		let mut ctx = FieldContext::with_seed(config, VIEW, 5);
		ctx.init();
		let provider = Fixed(Vec::new());
		for i in 0..5 {
			ctx.frame(i as f64 * 16.0, &provider);
		}
		ctx.step(0.016, 100.0);
		assert_eq!(ctx.config().motion.max_dt, 0.033);
		assert!(!ctx.particles().is_empty());
	}

	#[test]
	fn zero_viewport_is_a_no_op() {
		let mut ctx = FieldContext::with_seed(FieldConfig::default(), Viewport::default(), 1);
		assert!(ctx.step(0.016, 0.0).is_empty());
		assert!(ctx.particles().is_empty());
	}
}
