//! The page region that route content is swapped into.

use crate::events::PageSignal;

/// Content container and its surroundings, as seen by the controller.
pub trait ContentSurface {
	/// Starts the fade-out before a swap.
	fn begin_transition(&self);
	/// Replaces the container content and fades it back in.
	fn swap(&self, markup: &str);
	/// Marks the navigation links whose `href` is one of `hrefs` as active
	/// and clears the marker everywhere else.
	fn mark_active(&self, hrefs: &[String]);
	/// Smoothly scrolls the page to the top.
	fn scroll_to_top(&self);
	/// Dispatches a controller signal.
	fn announce(&self, signal: &PageSignal);
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserSurface;

#[cfg(target_arch = "wasm32")]
mod browser {
	use super::ContentSurface;
	use crate::events::{PageSignal, dispatch_custom};
	use crate::router::error::RouterError;
	use crate::settings::RouterSettings;
	use crate::{error_log, warn_log};
	use wasm_bindgen::JsCast;
	use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

	/// [`ContentSurface`] over the live document.
	pub struct BrowserSurface {
		window: Window,
		document: Document,
		container: HtmlElement,
		nav_selector: String,
		active_class: String,
	}

	impl BrowserSurface {
		/// Binds to the container named in `settings`.
		///
		/// Fails with [`RouterError::Dom`] when the container is absent.
		pub fn new(settings: &RouterSettings) -> Result<Self, RouterError> {
			let window = web_sys::window().ok_or_else(|| RouterError::Dom("no window".into()))?;
			let document = window
				.document()
				.ok_or_else(|| RouterError::Dom("no document".into()))?;
			let container = document
				.get_element_by_id(&settings.container_id)
				.ok_or_else(|| {
					RouterError::Dom(format!("#{} not found", settings.container_id))
				})?
				.dyn_into::<HtmlElement>()
				.map_err(|_| {
					RouterError::Dom(format!("#{} is not an HTML element", settings.container_id))
				})?;
			let nav_selector = settings
				.nav_link_classes
				.iter()
				.map(|class| format!(".{}", class))
				.collect::<Vec<_>>()
				.join(", ");

			Ok(Self {
				window,
				document,
				container,
				nav_selector,
				active_class: settings.active_class.clone(),
			})
		}

		fn set_opacity(&self, value: &str) {
			if let Err(e) = self.container.style().set_property("opacity", value) {
				warn_log!("Failed to set opacity: {:?}", e);
			}
		}

		fn nav_links(&self) -> Vec<Element> {
			if self.nav_selector.is_empty() {
				return Vec::new();
			}
			let Ok(list) = self.document.query_selector_all(&self.nav_selector) else {
				return Vec::new();
			};
			(0..list.length())
				.filter_map(|i| list.item(i))
				.filter_map(|node| node.dyn_into::<Element>().ok())
				.collect()
		}
	}

	impl ContentSurface for BrowserSurface {
		fn begin_transition(&self) {
			self.set_opacity("0");
		}

		fn swap(&self, markup: &str) {
			self.container.set_inner_html(markup);
			self.set_opacity("1");
		}

		fn mark_active(&self, hrefs: &[String]) {
			for link in self.nav_links() {
				let class_list = link.class_list();
				let is_current = link
					.get_attribute("href")
					.is_some_and(|href| hrefs.iter().any(|h| *h == href));
				let result = if is_current {
					class_list.add_1(&self.active_class)
				} else {
					class_list.remove_1(&self.active_class)
				};
				if let Err(e) = result {
					warn_log!("Failed to update nav link class: {:?}", e);
				}
			}
		}

		fn scroll_to_top(&self) {
			let options = ScrollToOptions::new();
			options.set_top(0.0);
			options.set_behavior(ScrollBehavior::Smooth);
			self.window.scroll_to_with_scroll_to_options(&options);
		}

		fn announce(&self, signal: &PageSignal) {
			let result = signal
				.detail_json()
				.map_err(|e| format!("{}", e))
				.and_then(|json| {
					dispatch_custom(&self.window, signal.name(), &json)
						.map_err(|e| format!("{:?}", e))
				});
			if let Err(e) = result {
				error_log!("Failed to dispatch {}: {}", signal.name(), e);
			}
		}
	}
}
