//! VôLuntar Pages - client runtime for the VôLuntar site
//!
//! Turns the static site into a single-page application and validates its
//! forms declaratively, in the browser via WebAssembly.
//!
//! ## Architecture
//!
//! - [`router`]: link interception, history integration and content swaps
//! - [`form`](mod@form): attribute-driven validation, masks and address lookup
//! - [`events`]: the custom DOM events both halves communicate through
//! - [`settings`]: runtime configuration
//! - [`platform`]: timers, clock and task spawning for WASM and native
//! - [`testing`]: in-memory doubles of the browser seams
//! - `launcher`: browser entry point (WASM only)
//!
//! The two halves only meet through [`events::COMPONENTS_READY`]: every
//! content swap announces it, and the launcher rescans forms in response.
//!
//! ## Example
//!
//! ```ignore
//! use voluntar_pages::launcher::ClientApp;
//! use voluntar_pages::router::markup;
//!
//! ClientApp::new()
//!     .route("/", markup(|| include_str!("pages/index.html").to_string()))
//!     .launch()?
//!     .keep_alive();
//! ```

#![warn(missing_docs)]

pub mod logging;

pub mod events;
pub mod platform;
pub mod settings;

pub mod form;
pub mod router;

#[cfg(target_arch = "wasm32")]
pub mod launcher;

pub mod testing;

pub use events::{FormSubmission, PageSignal};
pub use form::{SubmitOutcome, ValidationEngine};
#[cfg(target_arch = "wasm32")]
pub use launcher::{AppHandle, ClientApp};
pub use router::{NavigationController, NavigationOutcome};
pub use settings::PagesSettings;
