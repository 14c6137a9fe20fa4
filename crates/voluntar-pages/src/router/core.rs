//! Core navigation controller.
//!
//! This module provides [`NavigationController`], which owns the route
//! table, the current route, session history writes and the content swap
//! lifecycle.

use super::error::RouterError;
use super::handler::RouteHandler;
use super::history::{HistoryBackend, HistoryState, HistoryUpdate};
use super::path::{HOME_ROUTE, active_hrefs, canonical_key, history_url};
use super::surface::ContentSurface;
use super::views::{error_view, not_found_view};
use crate::events::{ContentReady, PageSignal, RouteChanged, SwapKind};
use crate::platform;
use crate::settings::RouterSettings;
use crate::{debug_log, error_log, info_log, warn_log};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Result of a route load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// Handler markup was installed. `route` is the requested key, which
	/// differs from the handler's key when the home route stood in.
	Rendered {
		/// Canonical key of the requested path.
		route: String,
	},
	/// The built-in not-found view was installed.
	NotFound {
		/// Canonical key of the requested path.
		route: String,
	},
	/// The handler failed and the built-in error view was installed.
	Failed {
		/// Canonical key of the requested path.
		route: String,
		/// Handler failure message.
		message: String,
	},
	/// A later navigation started before this one could swap content.
	Superseded,
}

struct ControllerInner {
	routes: RefCell<HashMap<String, Rc<dyn RouteHandler>>>,
	current_route: RefCell<Option<String>>,
	generation: Cell<u64>,
	history: Rc<dyn HistoryBackend>,
	surface: Rc<dyn ContentSurface>,
	transition_delay: Duration,
}

/// Client-side navigation controller.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct NavigationController {
	inner: Rc<ControllerInner>,
}

impl std::fmt::Debug for NavigationController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationController")
			.field("routes_count", &self.route_count())
			.field("current_route", &self.current_route())
			.field("generation", &self.generation())
			.finish()
	}
}

impl NavigationController {
	/// Creates a controller writing to `history` and swapping `surface`.
	pub fn new(
		history: Rc<dyn HistoryBackend>,
		surface: Rc<dyn ContentSurface>,
		settings: &RouterSettings,
	) -> Self {
		Self {
			inner: Rc::new(ControllerInner {
				routes: RefCell::new(HashMap::new()),
				current_route: RefCell::new(None),
				generation: Cell::new(0),
				history,
				surface,
				transition_delay: settings.transition_delay(),
			}),
		}
	}

	/// Registers `handler` under the canonical key of `path`, replacing any
	/// previous handler for that key.
	pub fn register<H>(&self, path: &str, handler: H)
	where
		H: RouteHandler + 'static,
	{
		let key = canonical_key(path);
		debug_log!("Registering route {}", key);
		self.inner
			.routes
			.borrow_mut()
			.insert(key, Rc::new(handler));
	}

	/// Returns the number of registered routes.
	pub fn route_count(&self) -> usize {
		self.inner.routes.borrow().len()
	}

	/// Checks if a handler is registered for `path`.
	pub fn has_route(&self, path: &str) -> bool {
		self.inner
			.routes
			.borrow()
			.contains_key(&canonical_key(path))
	}

	/// Canonical key of the last loaded route.
	pub fn current_route(&self) -> Option<String> {
		self.inner.current_route.borrow().clone()
	}

	/// Number of route loads started so far.
	pub fn generation(&self) -> u64 {
		self.inner.generation.get()
	}

	/// Navigates to `path`, pushing one history entry, then scrolls to the top.
	///
	/// The route is re-rendered even when it is already current.
	pub async fn navigate(&self, path: &str) -> NavigationOutcome {
		let outcome = self.load_route(path, HistoryUpdate::Push).await;
		if outcome != NavigationOutcome::Superseded {
			self.inner.surface.scroll_to_top();
		}
		outcome
	}

	/// Handles a popstate event. Entries without a route marker are ignored.
	pub async fn on_popstate(&self, state: Option<HistoryState>) -> Option<NavigationOutcome> {
		let state = state?;
		Some(self.load_route(&state.route, HistoryUpdate::None).await)
	}

	/// Loads the current location, replacing its history entry so that
	/// returning to it later goes through [`Self::on_popstate`].
	pub async fn start(&self) -> NavigationOutcome {
		let location = self.inner.history.location();
		info_log!("Starting navigation at {}", location);
		self.load_route(&location, HistoryUpdate::Replace).await
	}

	/// Finds the handler for `key`, falling back to the home route.
	fn resolve(&self, key: &str) -> Result<Rc<dyn RouteHandler>, RouterError> {
		let routes = self.inner.routes.borrow();
		if let Some(handler) = routes.get(key) {
			return Ok(Rc::clone(handler));
		}
		routes
			.get(HOME_ROUTE)
			.map(|handler| {
				debug_log!("No route for {}, rendering {}", key, HOME_ROUTE);
				Rc::clone(handler)
			})
			.ok_or_else(|| RouterError::NotFound(key.to_string()))
	}

	fn begin(&self) -> u64 {
		let token = self.inner.generation.get() + 1;
		self.inner.generation.set(token);
		token
	}

	fn is_latest(&self, token: u64) -> bool {
		self.inner.generation.get() == token
	}

	/// Loads `path` and swaps its content in.
	///
	/// Handler failures and missing routes are rendered, never returned.
	pub async fn load_route(&self, path: &str, update: HistoryUpdate) -> NavigationOutcome {
		let key = canonical_key(path);
		let token = self.begin();

		let state = HistoryState::new(key.clone());
		let written = match update {
			HistoryUpdate::Push => self.inner.history.push(&state, &history_url(path)),
			HistoryUpdate::Replace => self.inner.history.replace(&state, &history_url(path)),
			HistoryUpdate::None => Ok(()),
		};
		if let Err(e) = written {
			warn_log!("History update for {} failed: {}", key, e);
		}

		let handler = match self.resolve(&key) {
			Ok(handler) => handler,
			Err(e) => {
				warn_log!("{}", e);
				return self
					.commit(token, key.clone(), not_found_view(), SwapKind::NotFound)
					.await
					.unwrap_or(NavigationOutcome::NotFound { route: key });
			}
		};

		let rendered = handler.render().await;
		if !self.is_latest(token) {
			debug_log!("Discarding superseded render of {}", key);
			return NavigationOutcome::Superseded;
		}

		match rendered {
			Ok(markup) => self
				.commit(token, key.clone(), markup, SwapKind::Route)
				.await
				.unwrap_or(NavigationOutcome::Rendered { route: key }),
			Err(e) => {
				error_log!("Failed to load route {}: {}", key, e);
				let message = e.message().to_string();
				self.commit(token, key.clone(), error_view(&message), SwapKind::Error)
					.await
					.unwrap_or(NavigationOutcome::Failed {
						route: key,
						message,
					})
			}
		}
	}

	/// Runs the fade transition and swaps `markup` in.
	///
	/// Returns `Some(Superseded)` when a newer load started during the
	/// transition, `None` once the swap happened.
	async fn commit(
		&self,
		token: u64,
		key: String,
		markup: String,
		kind: SwapKind,
	) -> Option<NavigationOutcome> {
		let surface = &self.inner.surface;
		surface.begin_transition();
		if !self.inner.transition_delay.is_zero() {
			platform::sleep(self.inner.transition_delay).await;
			if !self.is_latest(token) {
				debug_log!("Discarding superseded swap of {}", key);
				return Some(NavigationOutcome::Superseded);
			}
		}

		surface.swap(&markup);
		*self.inner.current_route.borrow_mut() = Some(key.clone());

		if kind == SwapKind::Route {
			surface.mark_active(&active_hrefs(&key));
			surface.announce(&PageSignal::RouteChanged(RouteChanged {
				route: key.clone(),
			}));
		}
		surface.announce(&PageSignal::ComponentsReady(ContentReady { route: key, kind }));
		None
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::router::handler::markup;
	use crate::router::error::HandlerError;
	use crate::testing::{MemoryHistory, MemorySurface};
	use rstest::rstest;

	fn controller() -> (NavigationController, Rc<MemoryHistory>, Rc<MemorySurface>) {
		let history = Rc::new(MemoryHistory::new("/"));
		let surface = Rc::new(MemorySurface::new());
		let settings = RouterSettings {
			transition_delay_ms: 0,
			..RouterSettings::default()
		};
		let nav = NavigationController::new(history.clone(), surface.clone(), &settings);
		(nav, history, surface)
	}

	fn home() -> String {
		"<h1>Início</h1>".to_string()
	}

	fn projects() -> String {
		"<h1>Projetos</h1>".to_string()
	}

	#[rstest]
	fn test_register_canonicalizes() {
		let (nav, _, _) = controller();
		nav.register("/", markup(home));
		nav.register("/projetos.html", markup(projects));

		assert_eq!(nav.route_count(), 2);
		assert!(nav.has_route("/index"));
		assert!(nav.has_route("/projetos/"));
		assert!(nav.current_route().is_none());
	}

	#[rstest]
	fn test_register_last_wins() {
		let (nav, _, _) = controller();
		nav.register("/sobre", markup(home));
		nav.register("/sobre.html", markup(projects));
		assert_eq!(nav.route_count(), 1);
	}

	#[tokio::test]
	async fn test_navigate_renders_and_pushes() {
		let (nav, history, surface) = controller();
		nav.register("/projetos", markup(projects));

		let outcome = nav.navigate("/projetos.html").await;

		assert_eq!(
			outcome,
			NavigationOutcome::Rendered {
				route: "/projetos".to_string()
			}
		);
		assert_eq!(nav.current_route().as_deref(), Some("/projetos"));
		assert_eq!(history.len(), 2);
		assert_eq!(history.location(), "/projetos");
		assert_eq!(surface.content(), projects());
		assert_eq!(surface.scroll_count(), 1);
		assert_eq!(surface.active_hrefs(), vec!["/projetos", "/projetos.html"]);
	}

	#[tokio::test]
	async fn test_missing_route_without_home_renders_not_found() {
		let (nav, _, surface) = controller();

		let outcome = nav.navigate("/nada").await;

		assert_eq!(
			outcome,
			NavigationOutcome::NotFound {
				route: "/nada".to_string()
			}
		);
		assert!(surface.content().contains("Página não encontrada"));
		assert_eq!(surface.signal_names(), vec!["spa:components-ready"]);
	}

	#[tokio::test]
	async fn test_handler_failure_renders_error_view() {
		let (nav, _, surface) = controller();
		nav.register("/doar", || async {
			Err::<String, _>(HandlerError::new("<falha>"))
		});

		let outcome = nav.navigate("/doar").await;

		assert_eq!(
			outcome,
			NavigationOutcome::Failed {
				route: "/doar".to_string(),
				message: "<falha>".to_string()
			}
		);
		assert!(surface.content().contains("&lt;falha&gt;"));
		assert_eq!(nav.current_route().as_deref(), Some("/doar"));
		assert_eq!(surface.signal_names(), vec!["spa:components-ready"]);
	}

	#[tokio::test]
	async fn test_popstate_without_marker_is_ignored() {
		let (nav, history, surface) = controller();
		nav.register("/", markup(home));

		assert!(nav.on_popstate(None).await.is_none());
		let outcome = nav.on_popstate(Some(HistoryState::new("/index"))).await;

		assert!(matches!(outcome, Some(NavigationOutcome::Rendered { .. })));
		assert_eq!(history.len(), 1);
		assert_eq!(surface.scroll_count(), 0);
	}

	#[tokio::test]
	async fn test_start_replaces_initial_entry() {
		let history = Rc::new(MemoryHistory::new("/sobre.html"));
		let surface = Rc::new(MemorySurface::new());
		let nav = NavigationController::new(
			history.clone(),
			surface.clone(),
			&RouterSettings {
				transition_delay_ms: 0,
				..RouterSettings::default()
			},
		);
		nav.register("/sobre", markup(projects));

		nav.start().await;

		assert_eq!(history.len(), 1);
		assert_eq!(history.current_state(), Some(HistoryState::new("/sobre")));
		assert_eq!(history.location(), "/sobre");
	}

	#[tokio::test(start_paused = true)]
	async fn test_transition_delay_fades_before_swap() {
		let history = Rc::new(MemoryHistory::new("/"));
		let surface = Rc::new(MemorySurface::new());
		let nav = NavigationController::new(history, surface.clone(), &RouterSettings::default());
		nav.register("/", markup(home));

		let started = tokio::time::Instant::now();
		nav.navigate("/").await;

		assert!(started.elapsed() >= Duration::from_millis(200));
		assert_eq!(surface.transitions(), 1);
		assert!(surface.is_visible());
	}
}
