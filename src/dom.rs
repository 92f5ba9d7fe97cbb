//! Small browser helpers shared by the background components.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, Window};

/// An event listener that detaches itself when dropped.
pub struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	/// Attach `callback` to `event` on `target`. Returns `None` if the browser
	/// rejected the registration.
	pub fn attach(
		target: &EventTarget,
		event: &'static str,
		callback: impl FnMut(Event) + 'static,
	) -> Option<Self> {
		let callback: Closure<dyn FnMut(Event)> = Closure::new(callback);
		target
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.ok()?;
		Some(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// Evaluate a media query, treating an unsupported query as "no match".
pub fn media_matches(window: &Window, query: &str) -> bool {
	window
		.match_media(query)
		.ok()
		.flatten()
		.map(|mql| mql.matches())
		.unwrap_or(false)
}

/// CSS-pixel size of the window's layout viewport.
pub fn viewport_size(window: &Window) -> (f64, f64) {
	let width = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	let height = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	(width, height)
}

/// Play a Web Animations effect on `element`.
///
/// `frames` is a list of keyframes, each a list of `(property, value)` pairs.
/// Browsers without `Element.animate` are skipped silently, and a throwing
/// call is ignored.
pub fn play_effect(element: &Element, frames: &[&[(&str, &str)]], duration_ms: f64, extra: &[(&str, &str)]) {
	let Ok(animate) = Reflect::get(element, &JsValue::from_str("animate")) else {
		return;
	};
	let Some(animate) = animate.dyn_ref::<Function>() else {
		return;
	};

	let keyframes = Array::new();
	for frame in frames {
		let obj = Object::new();
		for (prop, value) in frame.iter() {
			let _ = Reflect::set(&obj, &JsValue::from_str(prop), &JsValue::from_str(value));
		}
		keyframes.push(&obj);
	}

	let options = Object::new();
	let _ = Reflect::set(
		&options,
		&JsValue::from_str("duration"),
		&JsValue::from_f64(duration_ms),
	);
	for (key, value) in extra {
		let _ = Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_str(value));
	}

	let _ = animate.call2(element, &keyframes, &options);
}
