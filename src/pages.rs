//! Client runtime: SPA navigation and declarative form validation
//!
//! This module provides access to voluntar-pages.
//!
//! ## Architecture
//!
//! - **Router**: History API navigation with content swaps into `#spa-content`
//! - **Forms**: attribute-driven validation, input masks and CEP lookup
//! - **Events**: `spa:route-changed`, `spa:components-ready` and
//!   `form:valid-submit` custom DOM events
//!
//! ## Example
//!
//! ```rust,ignore
//! use voluntar::pages::form::ValidationEngine;
//! use voluntar::pages::testing::{ManualScheduler, MemoryForms};
//! use std::rc::Rc;
//!
//! let dom = Rc::new(MemoryForms::new());
//! let engine = ValidationEngine::builder(dom, Rc::new(ManualScheduler::new())).build();
//! engine.scan();
//! ```

// Re-export all voluntar-pages functionality
pub use voluntar_pages::*;
