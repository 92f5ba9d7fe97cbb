//! Animated glow particle background.
//!
//! Renders a field of softly glowing particles on a full-viewport canvas with:
//! - Continuous "rain" with sinusoidal sway and respawn above the viewport
//! - Particle density that follows the viewport area
//! - Bounces off decorative sphere images found in the host page
//! - Pointer repulsion, stronger while a button is held
//! - Glow tint that follows the OS light/dark preference
//!
//! The simulation ([`FieldContext`]) is plain Rust and knows nothing about the
//! DOM; obstacles reach it through [`ObstacleProvider`].
//!
//! # Example
//!
//! ```ignore
//! use glow_field::{FieldConfig, GlowFieldCanvas};
//!
//! view! { <GlowFieldCanvas /> }
//!
//! // Or with overrides:
//! let mut config = FieldConfig::default();
//! config.pointer.radius = 200.0;
//! view! { <GlowFieldCanvas config=config /> }
//! ```

pub mod collision;
mod component;
pub mod config;
pub mod obstacles;
pub mod particles;
pub mod pointer;
pub mod render;
mod state;
pub mod theme;
pub mod types;

pub use component::{GlowFieldCanvas, load_field_config};
pub use config::FieldConfig;
pub use obstacles::ObstacleProvider;
pub use state::FieldContext;
pub use types::{Obstacle, ObstacleId, Viewport};
