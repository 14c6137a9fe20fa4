//! Client-side navigation
//!
//! Intercepts in-site link clicks and swaps route markup into a content
//! container without a full page load.
//!
//! ## Features
//!
//! - **Canonical routes**: `/projetos`, `/projetos/` and `/projetos.html`
//!   share one handler
//! - **History API**: one entry per navigation, back/forward re-renders
//! - **Fallbacks**: unknown paths render the home route, else a 404 view
//! - **Last navigation wins**: renders overtaken by a newer navigation are
//!   discarded
//!
//! ## Example
//!
//! ```ignore
//! use voluntar_pages::router::{BrowserHistory, BrowserSurface, NavigationController, markup};
//! use std::rc::Rc;
//!
//! let nav = NavigationController::new(
//!     Rc::new(BrowserHistory),
//!     Rc::new(BrowserSurface::new(&settings.router)?),
//!     &settings.router,
//! );
//! nav.register("/", markup(|| include_str!("home.html").to_string()));
//! nav.register("/projetos", || async { fetch_projects().await });
//! ```

#[cfg(target_arch = "wasm32")]
pub mod browser;
mod core;
pub mod error;
pub mod handler;
pub mod history;
pub mod links;
pub mod path;
pub mod surface;
pub mod views;

pub use self::core::{NavigationController, NavigationOutcome};
pub use error::{HandlerError, RouterError};
pub use handler::{HandlerFuture, Markup, RouteHandler, markup};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{HistoryBackend, HistoryState, HistoryUpdate};
pub use links::{IgnoreReason, LinkClick, LinkDecision, classify_link};
pub use path::{HOME_ROUTE, active_hrefs, canonical_key, display_path, history_url};
#[cfg(target_arch = "wasm32")]
pub use surface::BrowserSurface;
pub use surface::ContentSurface;
pub use views::{error_view, escape_html, not_found_view};
