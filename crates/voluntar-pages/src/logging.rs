//! Logging abstraction layer for voluntar-pages
//!
//! The same macros work in the browser and in native test builds.
//!
//! ## Macro Overview
//!
//! | Macro | WASM | Non-WASM |
//! |-------|------|----------|
//! | `debug_log!` | `console.debug` (`debug-hooks` + `debug_assertions`) | `tracing::debug!` |
//! | `info_log!` | `console.info` (`debug_assertions`) | `tracing::info!` |
//! | `warn_log!` | `console.warn` (`debug_assertions`) | `tracing::warn!` |
//! | `error_log!` | `console.error` (always) | `tracing::error!` |
//!
//! Native events are emitted under the `voluntar_pages` target, so a test or
//! host tool can install any `tracing` subscriber and filter on it.
//!
//! ## Example
//!
//! ```ignore
//! use voluntar_pages::{info_log, warn_log};
//!
//! info_log!("Registered {} forms", count);
//! warn_log!("Dropping pattern '{}': {}", source, err);
//! ```

#[doc(hidden)]
pub mod __private {
	#[cfg(not(target_arch = "wasm32"))]
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}

/// Logs a debug message
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message
#[macro_export]
#[cfg(all(target_arch = "wasm32", not(all(debug_assertions, feature = "debug-hooks"))))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs a debug message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::debug!(target: "voluntar_pages", $($arg)*);
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::info!(target: "voluntar_pages", $($arg)*);
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(all(not(debug_assertions), target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::warn!(target: "voluntar_pages", $($arg)*);
	}};
}

/// Logs an error message (release builds included)
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::error!(target: "voluntar_pages", $($arg)*);
	}};
}
