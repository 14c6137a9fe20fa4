//! # VôLuntar
//!
//! Browser runtime for the VôLuntar volunteering site.
//!
//! The site is a set of static HTML pages. This crate, compiled to
//! WebAssembly, turns it into a single-page application and validates its
//! sign-up and contact forms from declarative attributes.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - navigation controller, validation engine and
//!   browser bindings
//! - `debug-hooks` - verbose `debug_log!` output in the browser console
//!   (debug builds only)
//!
//! Without `pages` only the DOM-free [`validators`] are compiled.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use voluntar::pages::launcher::ClientApp;
//! use voluntar::pages::router::markup;
//! use wasm_bindgen::prelude::*;
//!
//! #[wasm_bindgen(start)]
//! pub fn start() -> Result<(), JsValue> {
//!     ClientApp::new()
//!         .route("/", markup(|| include_str!("../site/index.html").to_string()))
//!         .route("/voluntariado", markup(|| include_str!("../site/voluntariado.html").to_string()))
//!         .launch()?
//!         .keep_alive();
//!     Ok(())
//! }
//! ```
//!
//! Field rules can also be used on their own:
//!
//! ```rust
//! use voluntar::validators::{cpf, format_cpf};
//!
//! assert!(cpf("529.982.247-25").is_ok());
//! assert_eq!(format_cpf("52998224725"), "529.982.247-25");
//! ```

#[cfg(feature = "pages")]
pub mod pages;
pub mod validators;

#[cfg(feature = "pages")]
pub use voluntar_pages::{
	FormSubmission, NavigationController, NavigationOutcome, PageSignal, PagesSettings,
	SubmitOutcome, ValidationEngine,
};
pub use voluntar_validators::{MaskKind, ValidationError, ValidationResult};
