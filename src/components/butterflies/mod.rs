//! Decorative butterfly overlay drawn above the page.
//!
//! Independent of the glow field: butterflies wander in their own layer, never
//! intercept input, and can be switched off with
//! `setButterflyOverlayEnabled(false)` from JavaScript.

mod component;
pub mod flock;
pub mod shapes;

pub use component::{ButterflyOverlay, set_butterfly_overlay_enabled};
pub use flock::{Butterfly, Flock, OverlayConfig};
