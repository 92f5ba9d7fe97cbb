//! Butterfly flight simulation.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use rand::rngs::SmallRng;

use super::shapes::{COLORS, SHAPES};

/// Overlay tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
	pub count: usize,
	/// Butterflies bounce this far inside the viewport edges.
	pub padding: f64,
	pub min_speed: f64,
	pub max_speed: f64,
	pub min_size: f64,
	pub max_size: f64,
	/// Random acceleration (px/s²) applied on each axis every frame.
	pub wander: f64,
	pub max_dt: f64,
}

impl Default for OverlayConfig {
	fn default() -> Self {
		Self {
			count: 20,
			padding: 18.0,
			min_speed: 14.0,
			max_speed: 48.0,
			min_size: 18.0,
			max_size: 54.0,
			wander: 12.0,
			max_dt: 0.05,
		}
	}
}

#[derive(Clone, Debug)]
pub struct Butterfly {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Heading in degrees.
	pub rot: f64,
	pub rot_v: f64,
	pub flutter: f64,
	pub flutter_v: f64,
	pub scale: f64,
	pub wobble: f64,
	/// Element edge length in px.
	pub size: f64,
	pub colors: usize,
	pub shape: usize,
}

impl Butterfly {
	/// CSS transform for the current frame: position with a small wobble,
	/// heading, and a horizontal squash that fakes wing beats.
	pub fn transform(&self) -> String {
		let wing = 0.72 + self.flutter.sin() * 0.28;
		let tx = self.x + (self.flutter * 0.9).sin() * 6.0 * self.wobble;
		let ty = self.y + (self.flutter * 0.7).cos() * 4.0 * self.wobble;
		format!(
			"translate3d({tx:.2}px, {ty:.2}px, 0) rotate({:.2}deg) scale({:.3}) scaleX({wing:.3})",
			self.rot, self.scale
		)
	}
}

/// All butterflies plus the bounds they fly in.
pub struct Flock {
	pub butterflies: Vec<Butterfly>,
	width: f64,
	height: f64,
	config: OverlayConfig,
	rng: SmallRng,
}

impl Flock {
	pub fn new(config: OverlayConfig, width: f64, height: f64, mut rng: SmallRng) -> Self {
		let butterflies = (0..config.count)
			.map(|i| Self::spawn(&config, i, width, height, &mut rng))
			.collect();
		Self {
			butterflies,
			width,
			height,
			config,
			rng,
		}
	}

	fn spawn(config: &OverlayConfig, i: usize, width: f64, height: f64, rng: &mut SmallRng) -> Butterfly {
		let pad = config.padding;
		let dir = rng.gen_range(0.0..TAU);
		let speed = rng.gen_range(config.min_speed..=config.max_speed);
		let x = if width > 2.0 * pad {
			rng.gen_range(pad..width - pad)
		} else {
			width / 2.0
		};
		let y = if height > 2.0 * pad {
			rng.gen_range(pad..height - pad)
		} else {
			height / 2.0
		};

		Butterfly {
			x,
			y,
			vx: dir.cos() * speed,
			vy: dir.sin() * speed,
			rot: rng.gen_range(-25.0..25.0),
			rot_v: rng.gen_range(-18.0..18.0),
			flutter: rng.gen_range(0.0..TAU),
			flutter_v: rng.gen_range(5.5..10.5),
			scale: rng.gen_range(0.7..1.25),
			wobble: rng.gen_range(0.6..1.4),
			size: rng.gen_range(config.min_size..=config.max_size),
			colors: rng.gen_range(0..COLORS.len()),
			shape: i % SHAPES.len(),
		}
	}

	pub fn set_bounds(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn rng(&mut self) -> &mut SmallRng {
		&mut self.rng
	}

	/// Advance every butterfly by `dt` seconds (clamped to `max_dt`).
	pub fn step(&mut self, dt: f64) {
		let dt = dt.clamp(0.0, self.config.max_dt);
		let c = &self.config;
		let (min_x, max_x) = (c.padding, (self.width - c.padding).max(c.padding));
		let (min_y, max_y) = (c.padding, (self.height - c.padding).max(c.padding));

		for b in &mut self.butterflies {
			b.vx += self.rng.gen_range(-c.wander..=c.wander) * dt;
			b.vy += self.rng.gen_range(-c.wander..=c.wander) * dt;

			let speed = b.vx.hypot(b.vy);
			if speed > c.max_speed {
				b.vx = b.vx / speed * c.max_speed;
				b.vy = b.vy / speed * c.max_speed;
			} else if speed < c.min_speed {
				let d = self.rng.gen_range(0.0..TAU);
				b.vx += d.cos() * (c.min_speed - speed) * 0.35;
				b.vy += d.sin() * (c.min_speed - speed) * 0.35;
			}

			b.x += b.vx * dt;
			b.y += b.vy * dt;

			if b.x < min_x {
				b.x = min_x;
				b.vx = b.vx.abs();
			} else if b.x > max_x {
				b.x = max_x;
				b.vx = -b.vx.abs();
			}
			if b.y < min_y {
				b.y = min_y;
				b.vy = b.vy.abs();
			} else if b.y > max_y {
				b.y = max_y;
				b.vy = -b.vy.abs();
			}

			b.flutter += b.flutter_v * dt;
			let heading = (b.vy.atan2(b.vx) * 180.0 / PI).clamp(-55.0, 55.0);
			b.rot += (heading - b.rot) * dt * 3.2;
			b.rot += (b.flutter * 0.6).sin() * b.rot_v * dt * 0.12;
		}
	}
}
