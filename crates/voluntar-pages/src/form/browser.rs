//! [`FormDom`] over the live document, and the per-form listeners that feed
//! DOM events into a [`ValidationEngine`].

use super::dom::{AlertKind, FieldDescriptor, FieldFeedback, FieldKey, FormDom, FormKey};
use super::engine::ValidationEngine;
use crate::events::{FormSubmission, VALID_SUBMIT, dispatch_custom};
use crate::platform::EventListener;
use crate::router::views::escape_html;
use crate::{debug_log, error_log, warn_log};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
	Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
	HtmlTextAreaElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

const FIELD_SELECTOR: &str = "input, select, textarea";
const SKIPPED_INPUT_TYPES: [&str; 4] = ["submit", "button", "reset", "image"];
const VALID_CLASS: &str = "is-valid";
const INVALID_CLASS: &str = "is-invalid";
const SAVED_PLACEHOLDER_ATTR: &str = "data-saved-placeholder";

#[derive(Default)]
struct Registry {
	next_key: u32,
	forms: Vec<(FormKey, HtmlFormElement)>,
	fields: Vec<(FieldKey, FormKey, Element)>,
}

impl Registry {
	fn next(&mut self) -> u32 {
		self.next_key += 1;
		self.next_key
	}

	fn form_key(&mut self, element: &HtmlFormElement) -> FormKey {
		if let Some((key, _)) = self.forms.iter().find(|(_, el)| el == element) {
			return *key;
		}
		let key = FormKey(self.next());
		self.forms.push((key, element.clone()));
		key
	}

	fn field_key(&mut self, form: FormKey, element: &Element) -> FieldKey {
		if let Some((key, _, _)) = self
			.fields
			.iter()
			.find(|(_, owner, el)| *owner == form && el == element)
		{
			return *key;
		}
		let key = FieldKey(self.next());
		self.fields.push((key, form, element.clone()));
		key
	}

	fn form(&self, key: FormKey) -> Option<HtmlFormElement> {
		self.forms
			.iter()
			.find(|(k, _)| *k == key)
			.map(|(_, el)| el.clone())
	}

	fn field(&self, key: FieldKey) -> Option<Element> {
		self.fields
			.iter()
			.find(|(k, _, _)| *k == key)
			.map(|(_, _, el)| el.clone())
	}
}

fn is_field(element: &Element) -> bool {
	match element.dyn_ref::<HtmlInputElement>() {
		Some(input) => {
			let kind = input.type_().to_ascii_lowercase();
			!SKIPPED_INPUT_TYPES.contains(&kind.as_str())
		}
		None => true,
	}
}

fn read_value(element: &Element) -> String {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		let kind = input.type_().to_ascii_lowercase();
		if (kind == "checkbox" || kind == "radio") && !input.checked() {
			return String::new();
		}
		input.value()
	} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
		select.value()
	} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
		area.value()
	} else {
		String::new()
	}
}

fn write_value(element: &Element, value: &str) {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		input.set_value(value);
	} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
		select.set_value(value);
	} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
		area.set_value(value);
	}
}

fn attributes(element: &Element) -> Vec<(String, String)> {
	element
		.get_attribute_names()
		.iter()
		.filter_map(|name| name.as_string())
		.map(|name| {
			let value = element.get_attribute(&name).unwrap_or_default();
			(name, value)
		})
		.collect()
}

fn elements(root: &Element, selector: &str) -> Vec<Element> {
	let Ok(list) = root.query_selector_all(selector) else {
		return Vec::new();
	};
	(0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect()
}

fn error_markup(errors: &[String]) -> String {
	errors
		.iter()
		.map(|e| format!(r#"<span class="error-message">⚠ {}</span>"#, escape_html(e)))
		.collect()
}

fn remove_first(root: &Element, selector: &str) {
	if let Ok(Some(old)) = root.query_selector(selector) {
		old.remove();
	}
}

/// The live document.
pub struct BrowserForms {
	document: Document,
	registry: RefCell<Registry>,
}

impl BrowserForms {
	/// Binds to the current document.
	pub fn new() -> Result<Self, JsValue> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| JsValue::from_str("no document"))?;
		Ok(Self {
			document,
			registry: RefCell::new(Registry::default()),
		})
	}

	fn form(&self, key: FormKey) -> Option<HtmlFormElement> {
		self.registry.borrow().form(key)
	}

	fn field(&self, key: FieldKey) -> Option<Element> {
		self.registry.borrow().field(key)
	}

	/// Key of a field element already listed by [`FormDom::fields`].
	fn known_field(&self, form: FormKey, element: &Element) -> Option<FieldKey> {
		self.registry
			.borrow()
			.fields
			.iter()
			.find(|(_, owner, el)| *owner == form && el == element)
			.map(|(key, _, _)| *key)
	}

	fn render(&self, element: &Element, feedback: FieldFeedback<'_>) -> Result<(), JsValue> {
		let classes = element.class_list();
		classes.remove_2(VALID_CLASS, INVALID_CLASS)?;

		let group = element.closest(".form-group")?;
		if let Some(group) = &group {
			remove_first(group, ".field-error");
		}

		match feedback {
			FieldFeedback::Neutral => {}
			FieldFeedback::Valid => classes.add_1(VALID_CLASS)?,
			FieldFeedback::Invalid(errors) => {
				classes.add_1(INVALID_CLASS)?;
				if let Some(group) = group {
					let list = self.document.create_element("div")?;
					list.set_class_name("field-error");
					list.set_inner_html(&error_markup(errors));
					group.append_child(&list)?;
				}
			}
		}
		Ok(())
	}

	fn alert(
		&self,
		form: &HtmlFormElement,
		kind: AlertKind,
		message: &str,
	) -> Result<(), JsValue> {
		remove_first(form, ".form-alert");
		let alert = self.document.create_element("div")?;
		alert.set_class_name(&format!("form-alert alert alert-{}", kind.as_str()));
		alert.set_inner_html(&format!(
			concat!(
				r#"<div class="alert-body">{}</div>"#,
				r#"<button type="button" class="alert-close" aria-label="Fechar">×</button>"#,
			),
			escape_html(message)
		));
		form.prepend_with_node_1(&alert)
	}
}

impl FormDom for BrowserForms {
	fn forms(&self, marker: &str) -> Vec<FormKey> {
		let Some(root) = self.document.document_element() else {
			return Vec::new();
		};
		let found: Vec<HtmlFormElement> = elements(&root, &format!("form[{}]", marker))
			.into_iter()
			.filter_map(|el| el.dyn_into::<HtmlFormElement>().ok())
			.collect();
		let mut registry = self.registry.borrow_mut();
		found.iter().map(|form| registry.form_key(form)).collect()
	}

	fn is_attached(&self, form: FormKey) -> bool {
		self.form(form).is_some_and(|el| el.is_connected())
	}

	fn release(&self, form: FormKey) {
		let mut registry = self.registry.borrow_mut();
		registry.forms.retain(|(key, _)| *key != form);
		registry.fields.retain(|(_, owner, _)| *owner != form);
	}

	fn fields(&self, form: FormKey) -> Vec<FieldDescriptor> {
		let Some(element) = self.form(form) else {
			return Vec::new();
		};
		let found: Vec<Element> = elements(&element, FIELD_SELECTOR)
			.into_iter()
			.filter(is_field)
			.collect();
		let mut registry = self.registry.borrow_mut();
		found
			.iter()
			.map(|el| FieldDescriptor::new(registry.field_key(form, el), attributes(el)))
			.collect()
	}

	fn value(&self, _form: FormKey, field: FieldKey) -> String {
		self.field(field).map(|el| read_value(&el)).unwrap_or_default()
	}

	fn set_value(&self, _form: FormKey, field: FieldKey, value: &str) {
		if let Some(el) = self.field(field) {
			write_value(&el, value);
		}
	}

	fn value_by_id(&self, form: FormKey, id: &str) -> Option<String> {
		let element = self.form(form)?;
		elements(&element, FIELD_SELECTOR)
			.into_iter()
			.find(|el| el.id() == id)
			.map(|el| read_value(&el))
	}

	fn values_by_name(&self, form: FormKey, name: &str) -> Vec<String> {
		let Some(element) = self.form(form) else {
			return Vec::new();
		};
		elements(&element, FIELD_SELECTOR)
			.into_iter()
			.filter(|el| el.get_attribute("name").as_deref() == Some(name))
			.map(|el| read_value(&el))
			.collect()
	}

	fn set_busy(&self, _form: FormKey, field: FieldKey, placeholder: Option<&str>) {
		let Some(input) = self
			.field(field)
			.and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		let result = match placeholder {
			Some(text) => {
				let saved = if input.has_attribute(SAVED_PLACEHOLDER_ATTR) {
					Ok(())
				} else {
					input.set_attribute(SAVED_PLACEHOLDER_ATTR, &input.placeholder())
				};
				input.set_placeholder(text);
				input.set_disabled(true);
				saved
			}
			None => {
				if let Some(saved) = input.get_attribute(SAVED_PLACEHOLDER_ATTR) {
					input.set_placeholder(&saved);
				}
				input.set_disabled(false);
				input.remove_attribute(SAVED_PLACEHOLDER_ATTR)
			}
		};
		if let Err(e) = result {
			warn_log!("Failed to update busy state: {:?}", e);
		}
	}

	fn render_feedback(&self, _form: FormKey, field: FieldKey, feedback: FieldFeedback<'_>) {
		let Some(element) = self.field(field) else {
			return;
		};
		if let Err(e) = self.render(&element, feedback) {
			warn_log!("Failed to render field feedback: {:?}", e);
		}
	}

	fn show_alert(&self, form: FormKey, kind: AlertKind, message: &str) {
		let Some(element) = self.form(form) else {
			return;
		};
		if let Err(e) = self.alert(&element, kind, message) {
			warn_log!("Failed to show form alert: {:?}", e);
		}
	}

	fn dismiss_alert(&self, form: FormKey) {
		if let Some(element) = self.form(form) {
			remove_first(&element, ".form-alert");
		}
	}

	fn focus(&self, _form: FormKey, field: FieldKey) {
		let Some(element) = self.field(field) else {
			return;
		};
		let options = ScrollIntoViewOptions::new();
		options.set_behavior(ScrollBehavior::Smooth);
		options.set_block(ScrollLogicalPosition::Center);
		element.scroll_into_view_with_scroll_into_view_options(&options);
		if let Some(html) = element.dyn_ref::<HtmlElement>() {
			if let Err(e) = html.focus() {
				warn_log!("Failed to focus field: {:?}", e);
			}
		}
	}

	fn emit_valid_submit(&self, form: FormKey, submission: &FormSubmission) {
		let Some(element) = self.form(form) else {
			return;
		};
		let result = serde_json::to_string(submission)
			.map_err(|e| format!("{}", e))
			.and_then(|json| {
				dispatch_custom(&element, VALID_SUBMIT, &json).map_err(|e| format!("{:?}", e))
			});
		if let Err(e) = result {
			error_log!("Failed to dispatch {}: {}", VALID_SUBMIT, e);
		}
	}

	fn reset(&self, form: FormKey) {
		if let Some(element) = self.form(form) {
			element.reset();
		}
	}
}

/// DOM listeners of one registered form. Dropping them unbinds the form.
pub struct FormListeners {
	form: FormKey,
	_listeners: Vec<EventListener>,
}

impl FormListeners {
	/// Binds submit, reset, focusout, input and alert-close clicks of `form`
	/// to `engine`.
	pub fn bind(
		engine: &ValidationEngine,
		dom: &Rc<BrowserForms>,
		form: FormKey,
	) -> Result<Self, JsValue> {
		let element = dom
			.form(form)
			.ok_or_else(|| JsValue::from_str("form is not registered"))?;

		let field_of = {
			let dom = Rc::clone(dom);
			move |event: &Event| -> Option<FieldKey> {
				let target = event.target()?.dyn_into::<Element>().ok()?;
				dom.known_field(form, &target)
			}
		};

		let submit = {
			let engine = engine.clone();
			EventListener::new(&element, "submit", move |event| {
				event.prevent_default();
				let outcome = engine.on_submit(form);
				debug_log!("Submit of {:?}: {:?}", form, outcome);
			})?
		};

		let reset = {
			let engine = engine.clone();
			EventListener::new(&element, "reset", move |_| engine.reset_form(form))?
		};

		let blur = {
			let engine = engine.clone();
			let field_of = field_of.clone();
			EventListener::new(&element, "focusout", move |event| {
				if let Some(field) = field_of(&event) {
					engine.on_blur(form, field);
				}
			})?
		};

		let input = {
			let engine = engine.clone();
			EventListener::new(&element, "input", move |event| {
				if let Some(field) = field_of(&event) {
					engine.on_input(form, field);
				}
			})?
		};

		let close = EventListener::new(&element, "click", |event| {
			let button = event
				.target()
				.and_then(|t| t.dyn_into::<Element>().ok())
				.and_then(|el| el.closest(".alert-close").ok().flatten());
			if let Some(alert) = button.and_then(|b| b.closest(".form-alert").ok().flatten()) {
				alert.remove();
			}
		})?;

		Ok(Self {
			form,
			_listeners: vec![submit, reset, blur, input, close],
		})
	}

	/// Form these listeners are bound to.
	pub fn form(&self) -> FormKey {
		self.form
	}
}
