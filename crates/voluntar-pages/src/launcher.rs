//! Browser entry point.
//!
//! [`ClientApp`] collects routes and custom rules, then [`ClientApp::launch`]
//! wires the navigation controller and the validation engine to the live
//! document.
//!
//! ```ignore
//! use voluntar_pages::launcher::ClientApp;
//! use voluntar_pages::router::markup;
//! use wasm_bindgen::prelude::*;
//!
//! #[wasm_bindgen(start)]
//! pub fn start() -> Result<(), JsValue> {
//!     ClientApp::new()
//!         .route("/", markup(|| include_str!("pages/index.html").to_string()))
//!         .route("/projetos", markup(|| include_str!("pages/projetos.html").to_string()))
//!         .launch()?
//!         .keep_alive();
//!     Ok(())
//! }
//! ```

use crate::events::COMPONENTS_READY;
use crate::form::browser::{BrowserForms, FormListeners};
use crate::form::{FieldRule, FormDom, RuleRegistry, ValidationEngine, ViaCepClient};
use crate::platform::{EventListener, TimeoutScheduler, spawn_local};
use crate::router::browser::{RouterListeners, install};
use crate::router::{BrowserHistory, BrowserSurface, NavigationController, RouteHandler};
use crate::settings::PagesSettings;
use crate::{error_log, info_log, warn_log};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;

/// Id of the inline JSON element read by [`ClientApp::new`].
pub const SETTINGS_ELEMENT_ID: &str = "pages-settings";

type RouteInstaller = Box<dyn FnOnce(&NavigationController)>;

/// Builder for the page runtime.
pub struct ClientApp {
	settings: PagesSettings,
	routes: Vec<RouteInstaller>,
	registry: RuleRegistry,
}

impl Default for ClientApp {
	fn default() -> Self {
		Self::new()
	}
}

impl ClientApp {
	/// Starts from the settings in `#pages-settings`, or the defaults.
	pub fn new() -> Self {
		Self::with_settings(PagesSettings::from_document(SETTINGS_ELEMENT_ID))
	}

	/// Starts from explicit settings.
	pub fn with_settings(settings: PagesSettings) -> Self {
		Self {
			settings,
			routes: Vec::new(),
			registry: RuleRegistry::with_builtins(),
		}
	}

	/// Registers a route handler.
	pub fn route<H>(mut self, path: &str, handler: H) -> Self
	where
		H: RouteHandler + 'static,
	{
		let path = path.to_string();
		self.routes
			.push(Box::new(move |nav| nav.register(&path, handler)));
		self
	}

	/// Registers a custom field rule, declared on fields as `data-rule-<name>`.
	pub fn rule<R>(mut self, name: &str, rule: R) -> Self
	where
		R: FieldRule + 'static,
	{
		self.registry.register(name, rule);
		self
	}

	/// Installs everything and loads the current location.
	///
	/// A missing content container disables navigation only.
	pub fn launch(self) -> Result<AppHandle, JsValue> {
		let settings = self.settings;

		let navigation = match BrowserSurface::new(&settings.router) {
			Ok(surface) => {
				let nav = NavigationController::new(
					Rc::new(BrowserHistory),
					Rc::new(surface),
					&settings.router,
				);
				for install_route in self.routes {
					install_route(&nav);
				}
				Some(nav)
			}
			Err(e) => {
				warn_log!("SPA navigation disabled: {}", e);
				None
			}
		};

		let dom = Rc::new(BrowserForms::new()?);
		let mut builder = ValidationEngine::builder(
			Rc::clone(&dom) as Rc<dyn FormDom>,
			Rc::new(TimeoutScheduler),
		)
		.settings(settings.forms.clone())
		.registry(self.registry);
		if settings.lookup.enabled {
			builder = builder.lookup(Rc::new(ViaCepClient::new(&settings.lookup)));
		}
		let engine = builder.build();

		let bindings = Rc::new(RefCell::new(Vec::new()));
		rescan(&engine, &dom, &bindings);

		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let ready = {
			let engine = engine.clone();
			let dom = Rc::clone(&dom);
			let bindings = Rc::clone(&bindings);
			EventListener::new(&window, COMPONENTS_READY, move |_| {
				rescan(&engine, &dom, &bindings);
			})?
		};

		let router = match &navigation {
			Some(nav) => {
				let listeners = install(nav).map_err(|e| JsValue::from_str(&e.to_string()))?;
				let nav = nav.clone();
				spawn_local(async move {
					nav.start().await;
				});
				Some(listeners)
			}
			None => None,
		};

		info_log!(
			"Client app launched (navigation {})",
			if navigation.is_some() { "on" } else { "off" }
		);

		Ok(AppHandle {
			navigation,
			engine,
			_router: router,
			_ready: ready,
			_forms: bindings,
		})
	}
}

/// Registers new forms, binds their listeners and unbinds pruned ones.
fn rescan(
	engine: &ValidationEngine,
	dom: &Rc<BrowserForms>,
	bindings: &Rc<RefCell<Vec<FormListeners>>>,
) {
	let added = engine.scan();
	let mut bindings = bindings.borrow_mut();
	bindings.retain(|b| engine.is_registered(b.form()));
	for form in added {
		match FormListeners::bind(engine, dom, form) {
			Ok(listeners) => bindings.push(listeners),
			Err(e) => error_log!("Failed to bind form {:?}: {:?}", form, e),
		}
	}
}

/// Running page runtime. Dropping it removes every listener.
pub struct AppHandle {
	navigation: Option<NavigationController>,
	engine: ValidationEngine,
	_router: Option<RouterListeners>,
	_ready: EventListener,
	_forms: Rc<RefCell<Vec<FormListeners>>>,
}

impl AppHandle {
	/// The navigation controller, unless the content container was missing.
	pub fn navigation(&self) -> Option<&NavigationController> {
		self.navigation.as_ref()
	}

	/// The validation engine.
	pub fn engine(&self) -> &ValidationEngine {
		&self.engine
	}

	/// Keeps the runtime installed for the lifetime of the page.
	pub fn keep_alive(self) {
		std::mem::forget(self);
	}
}
