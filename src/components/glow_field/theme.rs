//! Visual theming for the glow field.
//!
//! Provides the light and dark palettes and the color type the renderer
//! draws with.

use web_sys::Window;

use crate::dom::media_matches;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Light/dark preference reported by the browser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
	Dark,
	Light,
}

impl ColorScheme {
	/// Sample `prefers-color-scheme`. Cheap enough to call every frame.
	pub fn detect(window: &Window) -> Self {
		if media_matches(window, "(prefers-color-scheme: dark)") {
			Self::Dark
		} else {
			Self::Light
		}
	}
}

/// Glow gradient and core disc styling for one color scheme.
#[derive(Clone, Debug)]
pub struct Palette {
	/// Tint of the outer glow.
	pub glow: Color,
	/// Glow radius as a multiple of the particle radius.
	pub glow_scale: f64,
	/// Alpha caps for the gradient's center and middle stop.
	pub glow_center_max: f64,
	pub glow_mid_max: f64,
	/// Offset of the middle gradient stop.
	pub glow_mid_offset: f64,
	/// Core disc color (alpha is computed per particle).
	pub core: Color,
	/// Added to particle opacity for the core alpha.
	pub core_boost: f64,
	pub core_max: f64,
}

impl Palette {
	/// Soft sky-blue glow for dark backgrounds.
	pub fn dark() -> Self {
		Self {
			glow: Color::rgb(120, 175, 255),
			glow_scale: 2.35,
			glow_center_max: 0.75,
			glow_mid_max: 0.35,
			glow_mid_offset: 0.35,
			core: Color::rgb(255, 255, 255),
			core_boost: 0.22,
			core_max: 0.85,
		}
	}

	/// Saturated blue glow that still reads on light backgrounds.
	pub fn light() -> Self {
		Self {
			glow: Color::rgb(0, 130, 255),
			glow_scale: 2.2,
			glow_center_max: 0.75,
			glow_mid_max: 0.35,
			glow_mid_offset: 0.35,
			core: Color::rgb(255, 255, 255),
			core_boost: 0.18,
			core_max: 0.78,
		}
	}

	pub fn for_scheme(scheme: ColorScheme) -> Self {
		match scheme {
			ColorScheme::Dark => Self::dark(),
			ColorScheme::Light => Self::light(),
		}
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::dark()
	}
}
