//! Leptos component for the butterfly overlay.
//!
//! Butterflies are plain `<div>`s holding inline SVG, moved each frame by
//! writing a CSS transform. The overlay can be switched off per browser
//! (local storage), per page (`data-butterfly-overlay="off"` on `<html>` or
//! `window.__BUTTERFLY_OVERLAY_DISABLED__ = true`), and respects
//! `prefers-reduced-motion`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use leptos::prelude::*;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

use super::flock::{Flock, OverlayConfig};
use super::shapes::butterfly_svg;
use crate::dom::{Listener, media_matches, viewport_size};
use crate::frame::{FrameClock, FrameLoop};

const ENABLED_KEY: &str = "butterfly_overlay_enabled";

/// Persist the overlay preference and reload so it takes effect.
#[wasm_bindgen(js_name = setButterflyOverlayEnabled)]
pub fn set_butterfly_overlay_enabled(enabled: bool) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Ok(Some(storage)) = window.local_storage() {
		let _ = storage.set_item(ENABLED_KEY, if enabled { "1" } else { "0" });
	}
	let _ = window.location().reload();
}

/// Stored preference; defaults to enabled when unset or storage is blocked.
fn stored_enabled(window: &Window) -> bool {
	window
		.local_storage()
		.ok()
		.flatten()
		.and_then(|s| s.get_item(ENABLED_KEY).ok().flatten())
		.is_none_or(|v| v == "1")
}

fn disabled_by_page(window: &Window) -> bool {
	let global_flag = Reflect::get(window, &JsValue::from_str("__BUTTERFLY_OVERLAY_DISABLED__"))
		.map(|v| v == JsValue::TRUE)
		.unwrap_or(false);
	let attr_flag = window
		.document()
		.and_then(|d| d.document_element())
		.and_then(|el| el.get_attribute("data-butterfly-overlay"))
		.is_some_and(|v| v == "off");
	global_flag || attr_flag
}

fn overlay_allowed(window: &Window) -> bool {
	stored_enabled(window)
		&& !disabled_by_page(window)
		&& !media_matches(window, "(prefers-reduced-motion: reduce)")
}

struct OverlayRuntime {
	frames: FrameLoop,
	_listeners: Vec<Listener>,
}

impl OverlayRuntime {
	fn mount(container: HtmlElement, config: OverlayConfig) -> Option<Self> {
		let window = web_sys::window()?;
		let document = window.document()?;
		let (width, height) = viewport_size(&window);
		let mut flock = Flock::new(config, width, height, SmallRng::from_entropy());

		let mut elements = Vec::with_capacity(flock.butterflies.len());
		for i in 0..flock.butterflies.len() {
			let uid: u32 = flock.rng().r#gen();
			let b = &flock.butterflies[i];
			let el: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
			el.set_class_name("bf");
			el.set_inner_html(&butterfly_svg(b.colors, b.shape, uid));
			let style = el.style();
			let _ = style.set_property("position", "absolute");
			let _ = style.set_property("left", "0");
			let _ = style.set_property("top", "0");
			let _ = style.set_property("width", &format!("{}px", b.size));
			let _ = style.set_property("height", &format!("{}px", b.size));
			let _ = style.set_property("will-change", "transform");
			let _ = style.set_property("transform", &b.transform());
			let _ = container.append_child(&el);
			elements.push(el);
		}
		info!("butterflies: launched {}", elements.len());

		let flock = Rc::new(RefCell::new(flock));
		let clock = Rc::new(RefCell::new(FrameClock::new(0.0, 0.05)));

		let frames = {
			let (flock, clock) = (flock.clone(), clock.clone());
			FrameLoop::new(move |now| {
				let dt = clock.borrow_mut().advance(now);
				let mut flock = flock.borrow_mut();
				flock.step(dt);
				for (b, el) in flock.butterflies.iter().zip(&elements) {
					let _ = el.style().set_property("transform", &b.transform());
				}
			})
		};

		let mut listeners = Vec::new();

		let (flock_resize, window_resize) = (flock.clone(), window.clone());
		listeners.extend(Listener::attach(&window, "resize", move |_| {
			let (w, h) = viewport_size(&window_resize);
			flock_resize.borrow_mut().set_bounds(w, h);
		}));

		let (frames_vis, document_vis) = (frames.clone(), document.clone());
		listeners.extend(Listener::attach(&document, "visibilitychange", move |_| {
			if document_vis.hidden() {
				frames_vis.cancel();
			} else {
				clock.borrow_mut().reset();
				frames_vis.start();
			}
		}));

		frames.start();
		Some(Self {
			frames,
			_listeners: listeners,
		})
	}
}

impl Drop for OverlayRuntime {
	fn drop(&mut self) {
		self.frames.cancel();
		debug!("butterflies: disposed");
	}
}

/// Decorative butterflies drifting over the page.
///
/// Renders a fixed, click-through container and fills it once mounted. Nothing
/// is shown when the overlay is disabled or the user prefers reduced motion.
#[component]
pub fn ButterflyOverlay() -> impl IntoView {
	let container = NodeRef::<leptos::html::Div>::new();
	let runtime = StoredValue::new_local(None::<OverlayRuntime>);

	Effect::new(move |_| {
		let Some(el) = container.get() else {
			return;
		};
		if runtime.with_value(Option::is_some) {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if !overlay_allowed(&window) {
			info!("butterflies: disabled");
			return;
		}
		match OverlayRuntime::mount(el.into(), OverlayConfig::default()) {
			Some(rt) => runtime.set_value(Some(rt)),
			None => warn!("butterflies: failed to build overlay"),
		}
	});

	on_cleanup(move || {
		runtime.try_update_value(|rt| rt.take());
	});

	view! {
		<div
			node_ref=container
			id="butterfly-overlay"
			aria-hidden="true"
			style="position: fixed; inset: 0; overflow: hidden; pointer-events: none; z-index: 1;"
		/>
	}
}
