//! Leptos component wrapping the glow field canvas.
//!
//! The component creates a full-viewport canvas behind the page and wires up
//! window listeners for resize, visibility and pointer input, plus a mutation
//! observer that notices when decorative spheres come and go. An animation
//! loop runs via `requestAnimationFrame`, stepping the simulation and
//! rendering each frame. Everything is torn down when the component unmounts.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, MouseEvent, MutationObserver,
	MutationObserverInit, Window,
};

use super::config::FieldConfig;
use super::obstacles::{DomObstacleProvider, ObstacleProvider};
use super::render::{self, CanvasSurface};
use super::state::FieldContext;
use super::theme::{ColorScheme, Palette};
use super::types::Viewport;
use crate::dom::{Listener, viewport_size};
use crate::frame::FrameLoop;

/// Load a config override from a script element with id="glow-field-config".
/// Falls back to defaults when absent or malformed.
pub fn load_field_config() -> FieldConfig {
	let Some(text) = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id("glow-field-config"))
		.and_then(|el| el.text_content())
	else {
		return FieldConfig::default();
	};

	match serde_json::from_str::<FieldConfig>(&text) {
		Ok(config) => {
			info!("glow-field: loaded config override");
			config
		}
		Err(e) => {
			warn!("glow-field: failed to parse config: {}", e);
			FieldConfig::default()
		}
	}
}

/// Canvas size in CSS pixels plus the clamped device pixel ratio.
struct SurfaceMetrics {
	viewport: Viewport,
	dpr: f64,
}

impl SurfaceMetrics {
	fn measure(window: &Window) -> Self {
		let (width, height) = viewport_size(window);
		Self {
			viewport: Viewport::new(width, height),
			dpr: window.device_pixel_ratio().clamp(1.0, 2.0),
		}
	}

	fn apply(&self, canvas: &HtmlCanvasElement, surface: &CanvasSurface) {
		let Viewport { width, height } = self.viewport;
		canvas.set_width((width * self.dpr).floor() as u32);
		canvas.set_height((height * self.dpr).floor() as u32);
		let style = web_sys::HtmlElement::style(canvas);
		let _ = style.set_property("width", &format!("{width}px"));
		let _ = style.set_property("height", &format!("{height}px"));
		surface.set_pixel_ratio(self.dpr);
	}
}

/// Live resources of a mounted field. Dropping it stops the animation and
/// detaches every listener and observer.
struct FieldRuntime {
	frames: FrameLoop,
	observer: Option<(MutationObserver, Closure<dyn FnMut(Array, MutationObserver)>)>,
	_listeners: Vec<Listener>,
}

impl FieldRuntime {
	/// Set up simulation, renderer and observers on `canvas`.
	/// Returns `None` when the page has no window or no 2D context.
	fn mount(canvas: HtmlCanvasElement, config: FieldConfig) -> Option<Self> {
		let window: Window = web_sys::window()?;
		let document: Document = window.document()?;
		let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

		let surface = Rc::new(CanvasSurface::new(ctx));
		let metrics = SurfaceMetrics::measure(&window);
		metrics.apply(&canvas, &surface);

		let provider = Rc::new(DomObstacleProvider::new(
			document.clone(),
			&config.obstacles.marker_suffix,
		));
		let mut field = FieldContext::new(config, metrics.viewport);
		field.init();
		info!(
			"glow-field: mounted {}x{} with {} particles",
			metrics.viewport.width,
			metrics.viewport.height,
			field.particles().len()
		);
		let field = Rc::new(RefCell::new(field));

		let frames = {
			let (field, provider, surface, window) =
				(field.clone(), provider.clone(), surface.clone(), window.clone());
			FrameLoop::new(move |now| {
				let palette = Palette::for_scheme(ColorScheme::detect(&window));
				let mut field = field.borrow_mut();
				for id in field.frame(now, provider.as_ref()) {
					provider.highlight(id);
				}
				render::render(field.particles(), field.viewport(), surface.as_ref(), &palette);
			})
		};

		let mut listeners = Vec::new();

		let (field_resize, canvas_resize, surface_resize, window_resize) =
			(field.clone(), canvas.clone(), surface.clone(), window.clone());
		listeners.extend(Listener::attach(&window, "resize", move |_| {
			let metrics = SurfaceMetrics::measure(&window_resize);
			metrics.apply(&canvas_resize, &surface_resize);
			field_resize.borrow_mut().resize(metrics.viewport);
		}));

		let (field_vis, frames_vis, document_vis) = (field.clone(), frames.clone(), document.clone());
		listeners.extend(Listener::attach(&document, "visibilitychange", move |_| {
			if document_vis.hidden() {
				debug!("glow-field: paused");
				frames_vis.cancel();
			} else {
				debug!("glow-field: resumed");
				field_vis.borrow_mut().reset_clock();
				frames_vis.start();
			}
		}));

		let (field_down, provider_down) = (field.clone(), provider.clone());
		listeners.extend(Listener::attach(&window, "pointerdown", move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let tapped = field_down.borrow_mut().pointer_down(
				ev.client_x() as f64,
				ev.client_y() as f64,
				ev.time_stamp(),
			);
			if let Some(id) = tapped {
				provider_down.spin(id);
			}
		}));

		let field_move = field.clone();
		listeners.extend(Listener::attach(&window, "pointermove", move |ev: Event| {
			if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
				field_move.borrow_mut().pointer_move(
					ev.client_x() as f64,
					ev.client_y() as f64,
					ev.time_stamp(),
				);
			}
		}));

		for event in ["pointerup", "pointercancel"] {
			let field_up = field.clone();
			listeners.extend(Listener::attach(&window, event, move |ev: Event| {
				field_up.borrow_mut().pointer_up(ev.time_stamp());
			}));
		}

		let observer = observe_mutations(&document, field.clone());

		frames.start();
		Some(Self {
			frames,
			observer,
			_listeners: listeners,
		})
	}
}

impl Drop for FieldRuntime {
	fn drop(&mut self) {
		self.frames.cancel();
		if let Some((observer, _)) = self.observer.take() {
			observer.disconnect();
		}
		debug!("glow-field: disposed");
	}
}

/// Invalidate the obstacle snapshot whenever the page structure or a
/// marker-relevant attribute changes.
fn observe_mutations(
	document: &Document,
	field: Rc<RefCell<FieldContext>>,
) -> Option<(MutationObserver, Closure<dyn FnMut(Array, MutationObserver)>)> {
	let body = document.body()?;
	let callback: Closure<dyn FnMut(Array, MutationObserver)> =
		Closure::new(move |_records: Array, _observer: MutationObserver| {
			field.borrow_mut().invalidate_obstacles();
		});
	let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;

	let options = MutationObserverInit::new();
	options.set_child_list(true);
	options.set_subtree(true);
	options.set_attributes(true);
	let filter = Array::of2(&JsValue::from_str("src"), &JsValue::from_str("class"));
	options.set_attribute_filter(&filter);
	observer.observe_with_options(&body, &options).ok()?;

	Some((observer, callback))
}

/// Renders the animated glow particle background.
///
/// The canvas is fixed behind the page and ignores pointer events; input is
/// read from window listeners instead. Pass `config` to override the defaults;
/// otherwise a JSON override is read from `<script id="glow-field-config">`.
/// If the browser provides no 2D context the canvas stays empty.
#[component]
pub fn GlowFieldCanvas(#[prop(optional)] config: Option<FieldConfig>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime = StoredValue::new_local(None::<FieldRuntime>);
	let config = config.unwrap_or_else(load_field_config);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if runtime.with_value(Option::is_some) {
			return;
		}
		match FieldRuntime::mount(canvas.into(), config.clone()) {
			Some(rt) => runtime.set_value(Some(rt)),
			None => warn!("glow-field: 2d context unavailable, background disabled"),
		}
	});

	on_cleanup(move || {
		runtime.try_update_value(|rt| rt.take());
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="glow-field-canvas"
			aria-hidden="true"
			style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: 0;"
		/>
	}
}
