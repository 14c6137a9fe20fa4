//! History API integration.

use super::error::RouterError;
use serde::{Deserialize, Serialize};

/// State stored with each history entry created by the controller.
///
/// Entries without this marker were not created by the controller and are
/// left to the browser on popstate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
	/// Canonical route key.
	pub route: String,
}

impl HistoryState {
	/// Creates a state for the given route key.
	pub fn new(route: impl Into<String>) -> Self {
		Self {
			route: route.into(),
		}
	}

	/// Converts the state to a JavaScript object.
	#[cfg(target_arch = "wasm32")]
	pub fn to_js(&self) -> Result<wasm_bindgen::JsValue, RouterError> {
		let json = serde_json::to_string(self)
			.map_err(|e| RouterError::NavigationFailed(e.to_string()))?;
		js_sys::JSON::parse(&json)
			.map_err(|e| RouterError::NavigationFailed(format!("{:?}", e)))
	}

	/// Reads a state from a popstate event payload.
	#[cfg(target_arch = "wasm32")]
	pub fn from_js(value: &wasm_bindgen::JsValue) -> Option<Self> {
		if value.is_null() || value.is_undefined() {
			return None;
		}
		let json: String = js_sys::JSON::stringify(value).ok()?.into();
		serde_json::from_str(&json).ok()
	}
}

/// How a route load touches the session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryUpdate {
	/// Push a new entry (link clicks and programmatic navigation).
	Push,
	/// Replace the current entry (initial load).
	Replace,
	/// Leave history alone (back/forward).
	None,
}

/// Session history the controller writes to.
pub trait HistoryBackend {
	/// Appends an entry.
	fn push(&self, state: &HistoryState, url: &str) -> Result<(), RouterError>;
	/// Overwrites the current entry.
	fn replace(&self, state: &HistoryState, url: &str) -> Result<(), RouterError>;
	/// Path, query and fragment of the current location.
	fn location(&self) -> String;
}

/// [`HistoryBackend`] over `window.history`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

#[cfg(target_arch = "wasm32")]
impl BrowserHistory {
	fn history() -> Result<web_sys::History, RouterError> {
		web_sys::window()
			.ok_or_else(|| RouterError::Dom("no window".to_string()))?
			.history()
			.map_err(|e| RouterError::Dom(format!("{:?}", e)))
	}
}

#[cfg(target_arch = "wasm32")]
impl HistoryBackend for BrowserHistory {
	fn push(&self, state: &HistoryState, url: &str) -> Result<(), RouterError> {
		Self::history()?
			.push_state_with_url(&state.to_js()?, "", Some(url))
			.map_err(|e| RouterError::NavigationFailed(format!("{:?}", e)))
	}

	fn replace(&self, state: &HistoryState, url: &str) -> Result<(), RouterError> {
		Self::history()?
			.replace_state_with_url(&state.to_js()?, "", Some(url))
			.map_err(|e| RouterError::NavigationFailed(format!("{:?}", e)))
	}

	fn location(&self) -> String {
		let Some(location) = web_sys::window().map(|w| w.location()) else {
			return "/".to_string();
		};
		let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
		let search = location.search().unwrap_or_default();
		let hash = location.hash().unwrap_or_default();
		format!("{}{}{}", pathname, search, hash)
	}
}
