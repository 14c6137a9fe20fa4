//! Router error types.

use thiserror::Error;

/// Error type for navigation controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// No handler is registered for the path and no home route exists.
	#[error("Route not found: {0}")]
	NotFound(String),
	/// The History API rejected a state change.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),
	/// A required DOM node or API is missing.
	#[error("DOM error: {0}")]
	Dom(String),
}

/// Failure returned by a route handler.
///
/// The message is shown, escaped, in the built-in error view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
	message: String,
}

impl HandlerError {
	/// Creates a handler error with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	/// Returns the failure message.
	pub fn message(&self) -> &str {
		&self.message
	}
}

impl From<String> for HandlerError {
	fn from(message: String) -> Self {
		Self::new(message)
	}
}

impl From<&str> for HandlerError {
	fn from(message: &str) -> Self {
		Self::new(message)
	}
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for HandlerError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &"message".into())
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{:?}", value));
		Self::new(message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(RouterError::NotFound("/x".into()), "Route not found: /x")]
	#[case(RouterError::NavigationFailed("denied".into()), "Navigation failed: denied")]
	#[case(RouterError::Dom("no window".into()), "DOM error: no window")]
	fn test_router_error_display(#[case] error: RouterError, #[case] expected: &str) {
		assert_eq!(error.to_string(), expected);
	}

	#[rstest]
	fn test_handler_error_conversions() {
		let from_str: HandlerError = "timeout".into();
		let from_string: HandlerError = String::from("timeout").into();
		assert_eq!(from_str, from_string);
		assert_eq!(from_str.message(), "timeout");
		assert_eq!(from_str.to_string(), "timeout");
	}
}
