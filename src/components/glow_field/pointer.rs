//! Pointer tracking and the repulsion force it exerts on particles.

use super::config::RepulsionConfig;
use super::particles::Particle;

/// Last known pointer position and button state.
///
/// Timestamps are in milliseconds on the same clock as frame timestamps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
	/// True while a pointer button is held.
	pub pressed: bool,
	pub updated_at: Option<f64>,
}

impl PointerState {
	pub fn press(&mut self, x: f64, y: f64, now_ms: f64) {
		self.move_to(x, y, now_ms);
		self.pressed = true;
	}

	pub fn move_to(&mut self, x: f64, y: f64, now_ms: f64) {
		self.x = x;
		self.y = y;
		self.updated_at = Some(now_ms);
	}

	pub fn release(&mut self, now_ms: f64) {
		self.pressed = false;
		self.updated_at = Some(now_ms);
	}

	/// Repulsion strength right now.
	///
	/// Full press strength while a button is held; otherwise hover strength
	/// fading linearly to zero over the hover window.
	pub fn strength(&self, now_ms: f64, config: &RepulsionConfig) -> f64 {
		if self.pressed {
			return config.press_strength;
		}
		let Some(updated_at) = self.updated_at else {
			return 0.0;
		};
		let age = (now_ms - updated_at).max(0.0);
		if config.hover_window_ms <= 0.0 || age >= config.hover_window_ms {
			return 0.0;
		}
		config.hover_strength * (1.0 - age / config.hover_window_ms)
	}
}

/// Push `p` away from the pointer. Returns the impulse magnitude applied.
///
/// The impulse falls off linearly from `strength * dt` at the pointer to zero
/// at `radius`. A particle exactly under the pointer is pushed straight up.
pub fn repel(p: &mut Particle, pointer: &PointerState, strength: f64, radius: f64, dt: f64) -> f64 {
	if strength <= 0.0 || radius <= 0.0 {
		return 0.0;
	}
	let (dx, dy) = (p.x - pointer.x, p.y - pointer.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist >= radius {
		return 0.0;
	}

	let (nx, ny) = if dist > 1e-6 {
		(dx / dist, dy / dist)
	} else {
		(0.0, -1.0)
	};
	let impulse = strength * (1.0 - dist / radius) * dt;
	p.vx += nx * impulse;
	p.vy += ny * impulse;
	impulse
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pressed_at(x: f64, y: f64) -> PointerState {
		let mut pointer = PointerState::default();
		pointer.press(x, y, 0.0);
		pointer
	}

	#[test]
	fn no_pointer_means_no_strength() {
		let config = RepulsionConfig::default();
		assert_eq!(PointerState::default().strength(1000.0, &config), 0.0);
	}

	#[test]
	fn pressing_is_stronger_than_hovering() {
		let config = RepulsionConfig::default();
		let mut hover = PointerState::default();
		hover.move_to(10.0, 10.0, 0.0);
		let pressed = pressed_at(10.0, 10.0);

		assert!(pressed.strength(0.0, &config) > hover.strength(0.0, &config));
		assert_eq!(hover.strength(0.0, &config), config.hover_strength);
	}

	#[test]
	fn hover_strength_decays_over_window() {
		let config = RepulsionConfig::default();
		let mut pointer = pressed_at(0.0, 0.0);
		pointer.release(100.0);

		let half = pointer.strength(100.0 + config.hover_window_ms / 2.0, &config);
		assert!((half - config.hover_strength / 2.0).abs() < 1e-9);
		assert_eq!(pointer.strength(100.0 + config.hover_window_ms, &config), 0.0);
	}

	#[test]
	fn boundary_particle_gets_no_impulse() {
		let pointer = pressed_at(100.0, 100.0);
		let mut p = Particle::at_rest(240.0, 100.0, 10.0);
		let impulse = repel(&mut p, &pointer, 2400.0, 140.0, 0.016);
		assert_eq!(impulse, 0.0);
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
	}

	#[test]
	fn particle_under_pointer_gets_full_impulse() {
		let pointer = pressed_at(100.0, 100.0);
		let mut p = Particle::at_rest(100.0, 100.0, 10.0);
		let impulse = repel(&mut p, &pointer, 2400.0, 140.0, 0.016);

		let expected = 2400.0 * 0.016;
		assert!((impulse - expected).abs() < 1e-9);
		let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
		assert!((speed - expected).abs() < 1e-9);
		assert!(p.vy < 0.0, "pushed upward");
	}

	#[test]
	fn closer_particles_are_pushed_harder() {
		let pointer = pressed_at(0.0, 0.0);
		let mut near = Particle::at_rest(20.0, 0.0, 10.0);
		let mut far = Particle::at_rest(100.0, 0.0, 10.0);
		let near_impulse = repel(&mut near, &pointer, 2400.0, 140.0, 0.016);
		let far_impulse = repel(&mut far, &pointer, 2400.0, 140.0, 0.016);

		assert!(near_impulse > far_impulse);
		assert!(near.vx > 0.0 && far.vx > 0.0, "pushed away from the pointer");
	}
}
