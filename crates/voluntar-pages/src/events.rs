//! Custom DOM events shared by the navigation controller and the
//! validation engine.
//!
//! Payloads serialize to the `detail` object of the browser `CustomEvent`.

use serde::{Deserialize, Serialize};

/// Dispatched on `window` after a route rendered successfully.
pub const ROUTE_CHANGED: &str = "spa:route-changed";
/// Dispatched on `window` after every content swap, including 404 and error views.
pub const COMPONENTS_READY: &str = "spa:components-ready";
/// Dispatched on a form that passed validation on submit.
pub const VALID_SUBMIT: &str = "form:valid-submit";

/// Detail of [`ROUTE_CHANGED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteChanged {
	/// Canonical route key.
	pub route: String,
}

/// Which view a swap installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapKind {
	/// Markup returned by a route handler.
	Route,
	/// Built-in not-found view.
	NotFound,
	/// Built-in error view.
	Error,
}

/// Detail of [`COMPONENTS_READY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReady {
	/// Canonical key of the path that was loaded.
	pub route: String,
	/// View that was installed.
	pub kind: SwapKind,
}

/// Signal announced by the navigation controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
	/// See [`ROUTE_CHANGED`].
	RouteChanged(RouteChanged),
	/// See [`COMPONENTS_READY`].
	ComponentsReady(ContentReady),
}

impl PageSignal {
	/// DOM event name.
	pub fn name(&self) -> &'static str {
		match self {
			Self::RouteChanged(_) => ROUTE_CHANGED,
			Self::ComponentsReady(_) => COMPONENTS_READY,
		}
	}

	/// JSON text of the event detail.
	pub fn detail_json(&self) -> Result<String, serde_json::Error> {
		match self {
			Self::RouteChanged(detail) => serde_json::to_string(detail),
			Self::ComponentsReady(detail) => serde_json::to_string(detail),
		}
	}
}

/// Detail of [`VALID_SUBMIT`]: `[name, value]` pairs in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormSubmission {
	/// Submitted field values.
	pub fields: Vec<(String, String)>,
}

impl FormSubmission {
	/// Returns the first value submitted under `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}
}

/// Builds a `CustomEvent` carrying `detail_json` and dispatches it on `target`.
#[cfg(target_arch = "wasm32")]
pub(crate) fn dispatch_custom(
	target: &web_sys::EventTarget,
	name: &str,
	detail_json: &str,
) -> Result<(), wasm_bindgen::JsValue> {
	let detail = js_sys::JSON::parse(detail_json)?;
	let init = web_sys::CustomEventInit::new();
	init.set_bubbles(true);
	init.set_detail(&detail);
	let event = web_sys::CustomEvent::new_with_event_init_dict(name, &init)?;
	target.dispatch_event(&event)?;
	Ok(())
}
