//! Browser tests for the DOM-backed form bindings.
//!
//! Run with `wasm-pack test --headless --chrome crates/voluntar-pages`.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;
use voluntar_pages::form::{BrowserForms, FormDom, SubmitOutcome, ValidationEngine};
use voluntar_pages::platform::TimeoutScheduler;
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(id: &str, html: &str) -> Element {
	let document = web_sys::window().unwrap().document().unwrap();
	let host = document.create_element("div").unwrap();
	host.set_id(id);
	host.set_inner_html(html);
	document.body().unwrap().append_child(&host).unwrap();
	host
}

#[wasm_bindgen_test]
fn test_invalid_field_gets_error_markup() {
	let host = mount(
		"browser-forms-invalid",
		r#"<form data-validate>
			<div class="form-group"><input id="cpf" name="cpf" data-validate-cpf="true"></div>
			<button type="submit">Enviar</button>
		</form>"#,
	);
	let dom = Rc::new(BrowserForms::new().unwrap());
	let engine = ValidationEngine::builder(dom.clone(), Rc::new(TimeoutScheduler)).build();
	let form = engine.scan()[0];

	let fields = dom.fields(form);
	assert_eq!(fields.len(), 1);
	let cpf = fields[0].key;
	dom.set_value(form, cpf, "111.111.111-11");

	assert_eq!(engine.validate_field(form, cpf), Some(false));
	let input = host.query_selector("#cpf").unwrap().unwrap();
	assert!(input.class_list().contains("is-invalid"));
	let message = host.query_selector(".field-error .error-message").unwrap().unwrap();
	assert!(message.text_content().unwrap().contains("CPF inválido"));

	host.remove();
}

#[wasm_bindgen_test]
fn test_blocked_submit_shows_error_alert() {
	let host = mount(
		"browser-forms-alert",
		r#"<form data-validate>
			<div class="form-group"><input id="nome" name="nome" required></div>
		</form>"#,
	);
	let dom = Rc::new(BrowserForms::new().unwrap());
	let engine = ValidationEngine::builder(dom.clone(), Rc::new(TimeoutScheduler)).build();
	let form = engine.scan()[0];

	let outcome = engine.on_submit(form);

	assert!(matches!(outcome, SubmitOutcome::Blocked { .. }));
	assert!(host.query_selector(".form-alert.alert-error").unwrap().is_some());

	host.remove();
}
