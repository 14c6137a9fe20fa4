//! Document click and popstate listeners driving the controller.

use super::core::NavigationController;
use super::error::RouterError;
use super::history::HistoryState;
use super::links::{LinkClick, LinkDecision, classify_link};
use crate::debug_log;
use crate::platform::{EventListener, spawn_local};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlAnchorElement, MouseEvent, PopStateEvent};

/// Listeners installed by [`install`]. Dropping them detaches the router.
pub struct RouterListeners {
	_click: EventListener,
	_popstate: EventListener,
}

fn clicked_anchor(event: &Event) -> Option<HtmlAnchorElement> {
	event
		.target()?
		.dyn_into::<Element>()
		.ok()?
		.closest("a[href]")
		.ok()??
		.dyn_into::<HtmlAnchorElement>()
		.ok()
}

fn on_click(nav: &NavigationController, event: Event) {
	if event.default_prevented() {
		return;
	}
	let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
		return;
	};
	let Some(anchor) = clicked_anchor(&event) else {
		return;
	};

	let href = anchor.get_attribute("href");
	let target = anchor.get_attribute("target");
	let click = LinkClick {
		href: href.as_deref(),
		target: target.as_deref(),
		download: anchor.has_attribute("download"),
		button: mouse.button(),
		modified: mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key() || mouse.alt_key(),
	};

	match classify_link(&click) {
		LinkDecision::Intercept => {
			event.prevent_default();
			let path = format!("{}{}{}", anchor.pathname(), anchor.search(), anchor.hash());
			let nav = nav.clone();
			spawn_local(async move {
				nav.navigate(&path).await;
			});
		}
		LinkDecision::Ignore(reason) => {
			debug_log!("Leaving link to the browser: {:?}", reason);
		}
	}
}

fn on_popstate(nav: &NavigationController, event: Event) {
	let state = event
		.dyn_ref::<PopStateEvent>()
		.and_then(|e| HistoryState::from_js(&e.state()));
	let nav = nav.clone();
	spawn_local(async move {
		nav.on_popstate(state).await;
	});
}

/// Installs the delegated click listener on the document and the popstate
/// listener on the window.
pub fn install(nav: &NavigationController) -> Result<RouterListeners, RouterError> {
	let window = web_sys::window().ok_or_else(|| RouterError::Dom("no window".into()))?;
	let document = window
		.document()
		.ok_or_else(|| RouterError::Dom("no document".into()))?;

	let click_nav = nav.clone();
	let click = EventListener::new(&document, "click", move |event| {
		on_click(&click_nav, event);
	})
	.map_err(|e| RouterError::Dom(format!("{:?}", e)))?;

	let pop_nav = nav.clone();
	let popstate = EventListener::new(&window, "popstate", move |event| {
		on_popstate(&pop_nav, event);
	})
	.map_err(|e| RouterError::Dom(format!("{:?}", e)))?;

	Ok(RouterListeners {
		_click: click,
		_popstate: popstate,
	})
}
