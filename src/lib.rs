//! glow-field: animated particle background for the daily check-in page.
//!
//! Provides a full-viewport canvas of drifting, glowing particles that bounce
//! off decorative sphere images and shy away from the pointer, plus an
//! optional butterfly overlay.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

// Needed for the `js` feature so rand can seed from the browser.
use getrandom as _;

pub mod components;
pub mod dom;
pub mod frame;

pub use components::butterflies::{ButterflyOverlay, set_butterfly_overlay_enabled};
pub use components::glow_field::{FieldConfig, FieldContext, GlowFieldCanvas, ObstacleProvider};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("glow-field: logging initialized");
}

/// Demo page: the glow field behind a check-in card decorated with spheres.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Daily Check-in" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<GlowFieldCanvas />
		<ButterflyOverlay />

		<main class="checkin" style="position: relative; z-index: 2;">
			<img class="sphere" src="/sphere.png" alt="" width="96" height="96" />
			<section class="card">
				<h1>"Daily Check-in"</h1>
				<p class="subtitle">"Tap a sphere to give it a spin."</p>
			</section>
			<img class="sphere sphere-small" src="/sphere.png" alt="" width="64" height="64" />
		</main>
	}
}
