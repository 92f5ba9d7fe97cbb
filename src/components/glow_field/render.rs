//! Drawing the particle field.
//!
//! Each particle is two shapes: a soft radial-gradient glow and a bright core
//! disc on top. Drawing goes through the [`Surface`] trait; [`CanvasSurface`]
//! is the 2D canvas implementation.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::particles::Particle;
use super::theme::{Color, Palette};
use super::types::Viewport;

/// Minimal drawing interface the renderer needs.
pub trait Surface {
	/// Erase the whole viewport.
	fn clear(&self, viewport: Viewport);
	/// Fill a circle with a radial gradient from its center outward.
	/// `stops` are `(offset, color)` pairs with offsets in `[0, 1]`.
	fn fill_glow(&self, x: f64, y: f64, radius: f64, stops: &[(f64, Color)]);
	/// Fill a solid circle.
	fn fill_disc(&self, x: f64, y: f64, radius: f64, color: Color);
}

/// Gradient stops for a particle's glow: bright center, softer middle band,
/// transparent rim.
pub fn glow_stops(p: &Particle, palette: &Palette) -> [(f64, Color); 3] {
	let glow = p.opacity * p.glow;
	[
		(0.0, palette.glow.with_alpha(glow.min(palette.glow_center_max))),
		(
			palette.glow_mid_offset,
			palette.glow.with_alpha((glow * 0.5).min(palette.glow_mid_max)),
		),
		(1.0, palette.glow.with_alpha(0.0)),
	]
}

pub fn core_color(p: &Particle, palette: &Palette) -> Color {
	palette
		.core
		.with_alpha((p.opacity + palette.core_boost).min(palette.core_max))
}

/// Clear the surface and draw every particle.
pub fn render(particles: &[Particle], viewport: Viewport, surface: &dyn Surface, palette: &Palette) {
	surface.clear(viewport);
	for p in particles {
		surface.fill_glow(p.x, p.y, p.radius * palette.glow_scale, &glow_stops(p, palette));
		surface.fill_disc(p.x, p.y, p.radius, core_color(p, palette));
	}
}

/// [`Surface`] backed by a canvas 2D context.
///
/// Coordinates are CSS pixels; the device-pixel-ratio transform is applied
/// by [`CanvasSurface::set_pixel_ratio`].
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}

	/// Scale drawing so one unit is one CSS pixel. Canvas resizes reset the
	/// transform, so call this after every resize.
	pub fn set_pixel_ratio(&self, dpr: f64) {
		let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
	}
}

impl Surface for CanvasSurface {
	fn clear(&self, viewport: Viewport) {
		self.ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
	}

	fn fill_glow(&self, x: f64, y: f64, radius: f64, stops: &[(f64, Color)]) {
		let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius) else {
			return;
		};
		for (offset, color) in stops {
			let _ = gradient.add_color_stop(*offset as f32, &color.to_css());
		}

		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
		self.ctx.fill();
	}

	fn fill_disc(&self, x: f64, y: f64, radius: f64, color: Color) {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
		self.ctx.fill();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;

	#[derive(Debug, PartialEq)]
	enum Op {
		Clear,
		Glow { radius: f64, stops: Vec<(f64, f64)> },
		Disc { radius: f64, alpha: f64 },
	}

	#[derive(Default)]
	struct Recorder(RefCell<Vec<Op>>);

	impl Surface for Recorder {
		fn clear(&self, _viewport: Viewport) {
			self.0.borrow_mut().push(Op::Clear);
		}

		fn fill_glow(&self, _x: f64, _y: f64, radius: f64, stops: &[(f64, Color)]) {
			let stops = stops.iter().map(|(o, c)| (*o, c.a)).collect();
			self.0.borrow_mut().push(Op::Glow { radius, stops });
		}

		fn fill_disc(&self, _x: f64, _y: f64, radius: f64, color: Color) {
			self.0.borrow_mut().push(Op::Disc {
				radius,
				alpha: color.a,
			});
		}
	}

	fn particle(opacity: f64, glow: f64) -> Particle {
		Particle {
			opacity,
			glow,
			..Particle::at_rest(10.0, 10.0, 10.0)
		}
	}

	#[test]
	fn draws_glow_then_core_per_particle() {
		let recorder = Recorder::default();
		let palette = Palette::light();
		render(
			&[particle(0.4, 0.5)],
			Viewport::new(100.0, 100.0),
			&recorder,
			&palette,
		);

		let ops = recorder.0.into_inner();
		assert_eq!(ops.len(), 3);
		assert_eq!(ops[0], Op::Clear);
		let Op::Glow { radius, stops } = &ops[1] else {
			panic!("expected glow, got {:?}", ops[1]);
		};
		assert!((radius - 22.0).abs() < 1e-9);
		assert_eq!(stops.len(), 3);
		assert!((stops[0].1 - 0.2).abs() < 1e-9);
		assert!((stops[1].1 - 0.1).abs() < 1e-9);
		assert_eq!(stops[2], (1.0, 0.0));
		let Op::Disc { radius, alpha } = &ops[2] else {
			panic!("expected disc, got {:?}", ops[2]);
		};
		assert_eq!(*radius, 10.0);
		assert!((alpha - 0.58).abs() < 1e-9);
	}

	#[test]
	fn alphas_are_capped() {
		let palette = Palette::dark();
		let p = particle(1.0, 1.0);

		let stops = glow_stops(&p, &palette);
		assert_eq!(stops[0].1.a, 0.75);
		assert_eq!(stops[1].1.a, 0.35);
		assert_eq!(core_color(&p, &palette).a, 0.85);
	}

	#[test]
	fn dark_glow_is_wider() {
		assert!(Palette::dark().glow_scale > Palette::light().glow_scale);
		assert!((2.2..=2.35).contains(&Palette::dark().glow_scale));
	}
}
