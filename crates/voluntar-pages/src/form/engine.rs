//! Declarative form validation engine.
//!
//! ## Lifecycle of a field
//!
//! ```text
//!            blur                 input (debounced)
//! Untouched ──────▶ Valid/Invalid ◀───────────────┐
//!     ▲                    │                      │
//!     └──── form reset ────┴──────────────────────┘
//! ```
//!
//! Blur evaluates at once. Input on a touched field restarts the field's
//! debounce timer. Submission evaluates every field and either blocks with
//! an alert or emits [`VALID_SUBMIT`](crate::events::VALID_SUBMIT) and resets
//! the form after a delay.
//!
//! No `RefCell` borrow is held while calling a [`FormDom`] method that can
//! dispatch DOM events (`focus`, `emit_valid_submit`, `reset`), since their
//! listeners re-enter the engine.

use super::dom::{
	AlertKind, FieldDescriptor, FieldFeedback, FieldKey, FormDom, FormKey, SiblingValues,
};
use super::lookup::{Address, AddressLookup, LookupError};
use super::rules::{RuleContext, RuleRegistry};
use super::schema::{FieldSchema, LookupTargets};
use super::state::{FieldRecord, FieldSnapshot, FormRecord, TimerSlot};
use crate::events::FormSubmission;
use crate::platform::{self, Scheduler};
use crate::settings::FormSettings;
use crate::{debug_log, info_log, warn_log};
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use voluntar_validators::postal::normalize_cep;

/// Result of [`ValidationEngine::on_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// At least one field is invalid; the first one in document order got focus.
	Blocked {
		/// First invalid field.
		first_invalid: FieldKey,
	},
	/// Every field is valid; the valid-submit event was emitted.
	Accepted(FormSubmission),
	/// The form is not registered.
	Unregistered,
}

struct FormSiblings<'a> {
	dom: &'a dyn FormDom,
	form: FormKey,
}

impl SiblingValues for FormSiblings<'_> {
	fn sibling_value(&self, id: &str) -> Option<String> {
		self.dom.value_by_id(self.form, id)
	}

	fn group_values(&self, name: &str) -> Vec<String> {
		self.dom.values_by_name(self.form, name)
	}
}

struct EngineInner {
	dom: Rc<dyn FormDom>,
	scheduler: Rc<dyn Scheduler>,
	registry: RuleRegistry,
	settings: FormSettings,
	lookup: Option<Rc<dyn AddressLookup>>,
	clock: Box<dyn Fn() -> NaiveDate>,
	forms: RefCell<BTreeMap<FormKey, FormRecord>>,
	next_ticket: Cell<u64>,
	evaluations: Cell<u64>,
}

/// Builder for [`ValidationEngine`].
pub struct ValidationEngineBuilder {
	dom: Rc<dyn FormDom>,
	scheduler: Rc<dyn Scheduler>,
	registry: RuleRegistry,
	settings: FormSettings,
	lookup: Option<Rc<dyn AddressLookup>>,
	clock: Box<dyn Fn() -> NaiveDate>,
}

impl ValidationEngineBuilder {
	/// Replaces the default settings.
	pub fn settings(mut self, settings: FormSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Replaces the built-in rule registry.
	pub fn registry(mut self, registry: RuleRegistry) -> Self {
		self.registry = registry;
		self
	}

	/// Enables address lookup for fields declaring `data-lookup="cep"`.
	pub fn lookup(mut self, lookup: Rc<dyn AddressLookup>) -> Self {
		self.lookup = Some(lookup);
		self
	}

	/// Replaces the clock that supplies today's date to date rules.
	pub fn clock<F>(mut self, clock: F) -> Self
	where
		F: Fn() -> NaiveDate + 'static,
	{
		self.clock = Box::new(clock);
		self
	}

	/// Builds the engine. No form is registered until [`ValidationEngine::scan`].
	pub fn build(self) -> ValidationEngine {
		ValidationEngine {
			inner: Rc::new(EngineInner {
				dom: self.dom,
				scheduler: self.scheduler,
				registry: self.registry,
				settings: self.settings,
				lookup: self.lookup,
				clock: self.clock,
				forms: RefCell::new(BTreeMap::new()),
				next_ticket: Cell::new(0),
				evaluations: Cell::new(0),
			}),
		}
	}
}

/// Per-page form validation engine.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct ValidationEngine {
	inner: Rc<EngineInner>,
}

impl std::fmt::Debug for ValidationEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ValidationEngine")
			.field("forms", &self.registered_forms())
			.field("registry", &self.inner.registry)
			.finish()
	}
}

impl ValidationEngine {
	/// Starts building an engine over `dom` using `scheduler` for timers.
	pub fn builder(dom: Rc<dyn FormDom>, scheduler: Rc<dyn Scheduler>) -> ValidationEngineBuilder {
		ValidationEngineBuilder {
			dom,
			scheduler,
			registry: RuleRegistry::with_builtins(),
			settings: FormSettings::default(),
			lookup: None,
			clock: Box::new(platform::today),
		}
	}

	fn from_weak(weak: &Weak<EngineInner>) -> Option<Self> {
		weak.upgrade().map(|inner| Self { inner })
	}

	fn ticket(&self) -> u64 {
		let ticket = self.inner.next_ticket.get() + 1;
		self.inner.next_ticket.set(ticket);
		ticket
	}

	/// Registers forms carrying the opt-in marker that are not registered yet,
	/// and forgets forms that left the document. Returns the new forms.
	pub fn scan(&self) -> Vec<FormKey> {
		let dom = &self.inner.dom;
		let present = dom.forms(&self.inner.settings.marker_attribute);
		let mut forms = self.inner.forms.borrow_mut();

		let before = forms.len();
		let stale: Vec<FormKey> = forms
			.keys()
			.copied()
			.filter(|key| !dom.is_attached(*key))
			.collect();
		for key in &stale {
			forms.remove(key);
			dom.release(*key);
		}

		let mut added = Vec::new();
		for key in present {
			if forms.contains_key(&key) {
				continue;
			}
			let fields: Vec<FieldRecord> = dom
				.fields(key)
				.into_iter()
				.map(|descriptor| {
					let schema = FieldSchema::compile(&descriptor, &self.inner.registry);
					FieldRecord::new(descriptor, schema)
				})
				.collect();
			debug_log!("Registering form {:?} with {} fields", key, fields.len());
			forms.insert(key, FormRecord::new(key, fields));
			added.push(key);
		}

		if !added.is_empty() || !stale.is_empty() {
			info_log!(
				"Form scan: {} registered, {} pruned, {} total (was {})",
				added.len(),
				stale.len(),
				forms.len(),
				before
			);
		}
		added
	}

	/// Registered forms, in key order.
	pub fn registered_forms(&self) -> Vec<FormKey> {
		self.inner.forms.borrow().keys().copied().collect()
	}

	/// Whether `form` is registered.
	pub fn is_registered(&self, form: FormKey) -> bool {
		self.inner.forms.borrow().contains_key(&form)
	}

	/// Snapshot of a field's state.
	pub fn field_state(&self, form: FormKey, field: FieldKey) -> Option<FieldSnapshot> {
		self.inner
			.forms
			.borrow()
			.get(&form)?
			.field(field)
			.map(FieldRecord::snapshot)
	}

	/// Result of the last submission check of `form`.
	pub fn last_valid(&self, form: FormKey) -> Option<bool> {
		self.inner.forms.borrow().get(&form).map(|f| f.last_valid)
	}

	/// Number of field evaluations performed so far.
	pub fn evaluation_count(&self) -> u64 {
		self.inner.evaluations.get()
	}

	/// Evaluates the rules of one field against `value`.
	fn evaluate(
		&self,
		form: FormKey,
		descriptor: &FieldDescriptor,
		schema: &FieldSchema,
		value: &str,
	) -> Vec<String> {
		self.inner.evaluations.set(self.inner.evaluations.get() + 1);
		let siblings = FormSiblings {
			dom: self.inner.dom.as_ref(),
			form,
		};
		let ctx = RuleContext {
			field: descriptor,
			siblings: &siblings,
			today: (self.inner.clock)(),
		};
		let value = value.trim();
		schema
			.rules
			.iter()
			.filter_map(|(name, param)| {
				self.inner
					.registry
					.evaluate(name, value, param, &ctx)
					.err()
			})
			.collect()
	}

	/// Evaluates a field record and renders its feedback. Returns validity.
	fn check(&self, form: FormKey, field: &mut FieldRecord) -> bool {
		let value = self.inner.dom.value(form, field.key());
		field.errors = self.evaluate(form, &field.descriptor, &field.schema, &value);
		self.inner
			.dom
			.render_feedback(form, field.key(), field.feedback(&value));
		field.errors.is_empty()
	}

	/// Evaluates one field now, marking it touched. Returns validity.
	pub fn validate_field(&self, form: FormKey, field: FieldKey) -> Option<bool> {
		let mut forms = self.inner.forms.borrow_mut();
		let record = forms.get_mut(&form)?.field_mut(field)?;
		record.touched = true;
		record.debounce.cancel();
		Some(self.check(form, record))
	}

	/// Handles a field losing focus: immediate evaluation, then an address
	/// lookup when the field asks for one and holds a complete CEP.
	pub fn on_blur(&self, form: FormKey, field: FieldKey) {
		let lookup_wanted = {
			let mut forms = self.inner.forms.borrow_mut();
			let Some(record) = forms.get_mut(&form).and_then(|f| f.field_mut(field)) else {
				return;
			};
			record.touched = true;
			record.debounce.cancel();
			self.check(form, record);
			record.schema.lookup.is_some()
		};

		if lookup_wanted && self.inner.lookup.is_some() {
			let engine = self.clone();
			platform::spawn_local(async move {
				engine.lookup_address(form, field).await;
			});
		}
	}

	/// Handles typing in a field: applies its mask and, once touched,
	/// restarts its debounce timer.
	pub fn on_input(&self, form: FormKey, field: FieldKey) {
		let mut forms = self.inner.forms.borrow_mut();
		let Some(record) = forms.get_mut(&form).and_then(|f| f.field_mut(field)) else {
			return;
		};

		if let Some(mask) = record.schema.mask {
			let raw = self.inner.dom.value(form, field);
			let masked = mask.apply(&raw);
			if masked != raw {
				self.inner.dom.set_value(form, field, &masked);
			}
		}

		if !record.touched {
			return;
		}

		let ticket = self.ticket();
		let weak = Rc::downgrade(&self.inner);
		let handle = self.inner.scheduler.schedule(
			self.inner.settings.debounce(),
			Box::new(move || {
				if let Some(engine) = Self::from_weak(&weak) {
					engine.debounce_elapsed(form, field, ticket);
				}
			}),
		);
		record.debounce.arm(ticket, handle);
	}

	fn debounce_elapsed(&self, form: FormKey, field: FieldKey, ticket: u64) {
		let mut forms = self.inner.forms.borrow_mut();
		let Some(record) = forms.get_mut(&form).and_then(|f| f.field_mut(field)) else {
			return;
		};
		if record.debounce.fire(ticket) {
			self.check(form, record);
		}
	}

	fn arm_timer<S, F>(&self, slot: S, form: FormKey, delay: Duration, on_fire: F)
	where
		S: FnOnce(&mut FormRecord) -> &mut TimerSlot,
		F: Fn(&Self, FormKey, u64) + 'static,
	{
		let ticket = self.ticket();
		let weak = Rc::downgrade(&self.inner);
		let handle = self.inner.scheduler.schedule(
			delay,
			Box::new(move || {
				if let Some(engine) = Self::from_weak(&weak) {
					on_fire(&engine, form, ticket);
				}
			}),
		);
		if let Some(record) = self.inner.forms.borrow_mut().get_mut(&form) {
			slot(record).arm(ticket, handle);
		}
	}

	fn show_alert(&self, form: FormKey, kind: AlertKind, message: &str) {
		self.inner.dom.show_alert(form, kind, message);
		self.arm_timer(
			|record| &mut record.alert,
			form,
			self.inner.settings.alert_timeout(),
			|engine, form, ticket| engine.alert_elapsed(form, ticket),
		);
	}

	fn alert_elapsed(&self, form: FormKey, ticket: u64) {
		let fired = self
			.inner
			.forms
			.borrow_mut()
			.get_mut(&form)
			.is_some_and(|record| record.alert.fire(ticket));
		if fired {
			self.inner.dom.dismiss_alert(form);
		}
	}

	/// Handles a submit attempt. The caller always prevents the native submission.
	pub fn on_submit(&self, form: FormKey) -> SubmitOutcome {
		let checked = {
			let mut forms = self.inner.forms.borrow_mut();
			let Some(record) = forms.get_mut(&form) else {
				return SubmitOutcome::Unregistered;
			};

			let mut first_invalid = None;
			for field in record.fields.iter_mut() {
				field.touched = true;
				field.debounce.cancel();
				if !self.check(form, field) && first_invalid.is_none() {
					first_invalid = Some(field.key());
				}
			}
			record.last_valid = first_invalid.is_none();

			match first_invalid {
				Some(key) => Err(key),
				None => Ok(self.collect(record)),
			}
		};

		match checked {
			Err(first_invalid) => {
				debug_log!("Submission of {:?} blocked at {:?}", form, first_invalid);
				self.show_alert(form, AlertKind::Error, &self.inner.settings.invalid_message);
				self.inner.dom.focus(form, first_invalid);
				SubmitOutcome::Blocked { first_invalid }
			}
			Ok(submission) => {
				info_log!("Form {:?} passed validation", form);
				self.show_alert(form, AlertKind::Success, &self.inner.settings.success_message);
				self.arm_timer(
					|record| &mut record.reset,
					form,
					self.inner.settings.reset_delay(),
					|engine, form, ticket| engine.reset_elapsed(form, ticket),
				);
				self.inner.dom.emit_valid_submit(form, &submission);
				SubmitOutcome::Accepted(submission)
			}
		}
	}

	fn collect(&self, record: &FormRecord) -> FormSubmission {
		FormSubmission {
			fields: record
				.fields
				.iter()
				.filter_map(|field| {
					let name = field.descriptor.name.clone()?;
					let value = self.inner.dom.value(record.key, field.key());
					if field.descriptor.is_checkable() && value.is_empty() {
						return None;
					}
					Some((name, value))
				})
				.collect(),
		}
	}

	fn reset_elapsed(&self, form: FormKey, ticket: u64) {
		let fired = {
			let mut forms = self.inner.forms.borrow_mut();
			let Some(record) = forms.get_mut(&form) else {
				return;
			};
			let fired = record.reset.fire(ticket);
			if fired {
				self.clear_fields(record);
			}
			fired
		};
		if fired {
			debug_log!("Resetting form {:?} after submission", form);
			self.inner.dom.reset(form);
		}
	}

	fn clear_fields(&self, record: &mut FormRecord) {
		record.last_valid = false;
		for field in record.fields.iter_mut() {
			field.clear();
			self.inner
				.dom
				.render_feedback(record.key, field.key(), FieldFeedback::Neutral);
		}
	}

	/// Returns every field of `form` to the untouched state. Called when the
	/// form is reset, by the user or after a successful submission.
	pub fn reset_form(&self, form: FormKey) {
		let mut forms = self.inner.forms.borrow_mut();
		if let Some(record) = forms.get_mut(&form) {
			record.reset.disarm();
			self.clear_fields(record);
		}
	}

	/// Looks up the address of the CEP typed in `field` and fills the target
	/// fields. Returns `None` when the field has no complete CEP or lookup is
	/// not configured.
	///
	/// A result is discarded when the CEP changed while the request was in flight.
	pub async fn lookup_address(
		&self,
		form: FormKey,
		field: FieldKey,
	) -> Option<Result<Address, LookupError>> {
		let client = self.inner.lookup.clone()?;
		let targets = {
			let forms = self.inner.forms.borrow();
			forms.get(&form)?.field(field)?.schema.lookup.clone()?
		};
		let cep = normalize_cep(&self.inner.dom.value(form, field))?;

		let dom = &self.inner.dom;
		dom.set_busy(form, field, Some(&self.inner.settings.lookup_placeholder));
		let result = client.lookup(&cep).await;
		dom.set_busy(form, field, None);

		if normalize_cep(&dom.value(form, field)).as_deref() != Some(cep.as_str()) {
			debug_log!("Discarding lookup of {}: field changed", cep);
			return Some(result);
		}

		match &result {
			Ok(address) => {
				if let Some(next) = self.fill_address(form, &targets, address) {
					dom.focus(form, next);
				}
			}
			Err(e) => {
				warn_log!("Address lookup for {} failed: {:?}", cep, e);
				let mut forms = self.inner.forms.borrow_mut();
				if let Some(record) = forms.get_mut(&form).and_then(|f| f.field_mut(field)) {
					record.touched = true;
					record.errors = vec![e.to_string()];
					dom.render_feedback(form, field, FieldFeedback::Invalid(&record.errors));
				}
			}
		}
		Some(result)
	}

	/// Fills the address fields. Returns the field to focus next, if the form has it.
	fn fill_address(
		&self,
		form: FormKey,
		targets: &LookupTargets,
		address: &Address,
	) -> Option<FieldKey> {
		let mut forms = self.inner.forms.borrow_mut();
		let record = forms.get_mut(&form)?;
		for (id, value) in [
			(&targets.street, &address.street),
			(&targets.district, &address.district),
			(&targets.city, &address.city),
			(&targets.state, &address.state),
		] {
			if value.is_empty() {
				continue;
			}
			let Some(target) = record.field_by_id_mut(id) else {
				debug_log!("No field #{} to fill", id);
				continue;
			};
			self.inner.dom.set_value(form, target.key(), value);
			target.touched = true;
			target.debounce.cancel();
			target.errors.clear();
			self.inner
				.dom
				.render_feedback(form, target.key(), FieldFeedback::Valid);
		}
		record.field_by_id_mut(&targets.focus).map(|next| next.key())
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::form::state::FieldStatus;
	use crate::testing::{Feedback, ManualScheduler, MemoryForms, StaticLookup};
	use futures::FutureExt;
	use futures::future::LocalBoxFuture;
	use rstest::rstest;
	use tokio::sync::oneshot;
	use tokio::task::LocalSet;

	struct Fixture {
		dom: Rc<MemoryForms>,
		clock: ManualScheduler,
		engine: ValidationEngine,
		form: FormKey,
	}

	fn signup() -> Fixture {
		let dom = Rc::new(MemoryForms::new());
		let form = dom.add_form(&[("data-validate", "")]);
		dom.add_field(
			form,
			&[("id", "nome"), ("name", "nome"), ("required", ""), ("minlength", "3")],
		);
		dom.add_field(
			form,
			&[("id", "email"), ("name", "email"), ("data-validate-email", "true")],
		);
		dom.add_field(
			form,
			&[("id", "cpf"), ("name", "cpf"), ("data-validate-cpf", "true"), ("data-mask", "cpf")],
		);
		let clock = ManualScheduler::new();
		let engine = ValidationEngine::builder(dom.clone(), Rc::new(clock.clone()))
			.clock(|| NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
			.build();
		engine.scan();
		Fixture {
			dom,
			clock,
			engine,
			form,
		}
	}

	fn field(fx: &Fixture, id: &str) -> FieldKey {
		fx.dom.field_by_id(fx.form, id).unwrap()
	}

	#[rstest]
	fn test_scan_registers_once() {
		let fx = signup();
		assert_eq!(fx.engine.registered_forms(), vec![fx.form]);
		assert!(fx.engine.scan().is_empty());
	}

	#[rstest]
	fn test_unmarked_forms_are_ignored() {
		let fx = signup();
		let other = fx.dom.add_form(&[]);
		fx.engine.scan();
		assert!(!fx.engine.is_registered(other));
	}

	#[rstest]
	fn test_blur_evaluates_immediately() {
		let fx = signup();
		let nome = field(&fx, "nome");

		fx.engine.on_blur(fx.form, nome);

		let state = fx.engine.field_state(fx.form, nome).unwrap();
		assert_eq!(state.status, FieldStatus::Invalid);
		assert_eq!(state.errors, vec!["Este campo é obrigatório"]);
		assert_eq!(
			fx.dom.feedback(nome),
			Some(Feedback::Invalid(vec!["Este campo é obrigatório".to_string()]))
		);
	}

	#[rstest]
	fn test_input_before_blur_does_not_validate() {
		let fx = signup();
		let nome = field(&fx, "nome");

		fx.dom.type_value(nome, "A");
		fx.engine.on_input(fx.form, nome);
		fx.clock.advance(Duration::from_millis(1000));

		assert_eq!(fx.engine.evaluation_count(), 0);
		assert_eq!(
			fx.engine.field_state(fx.form, nome).unwrap().status,
			FieldStatus::Untouched
		);
	}

	#[rstest]
	fn test_debounce_restarts_on_each_input() {
		let fx = signup();
		let nome = field(&fx, "nome");
		fx.engine.on_blur(fx.form, nome);
		let after_blur = fx.engine.evaluation_count();

		for value in ["A", "An", "Ana"] {
			fx.dom.type_value(nome, value);
			fx.engine.on_input(fx.form, nome);
			fx.clock.advance(Duration::from_millis(299));
		}
		assert_eq!(fx.engine.evaluation_count(), after_blur);
		assert!(fx.engine.field_state(fx.form, nome).unwrap().pending);

		fx.clock.advance(Duration::from_millis(1));
		assert_eq!(fx.engine.evaluation_count(), after_blur + 1);
		let state = fx.engine.field_state(fx.form, nome).unwrap();
		assert_eq!(state.status, FieldStatus::Valid);
		assert!(!state.pending);
	}

	#[rstest]
	fn test_mask_applies_on_input() {
		let fx = signup();
		let cpf = field(&fx, "cpf");
		fx.dom.type_value(cpf, "52998224725");
		fx.engine.on_input(fx.form, cpf);
		assert_eq!(fx.dom.value(fx.form, cpf), "529.982.247-25");
	}

	#[rstest]
	fn test_submit_blocked_focuses_first_invalid() {
		let fx = signup();
		let email = field(&fx, "email");
		fx.dom.type_value(email, "a@@b.com");

		let outcome = fx.engine.on_submit(fx.form);

		assert_eq!(
			outcome,
			SubmitOutcome::Blocked {
				first_invalid: field(&fx, "nome")
			}
		);
		assert_eq!(fx.dom.focused(), Some(field(&fx, "nome")));
		assert_eq!(fx.dom.alert(fx.form).map(|(kind, _)| kind), Some(AlertKind::Error));
		assert!(fx.dom.emitted(fx.form).is_empty());
		assert_eq!(
			fx.engine.field_state(fx.form, email).unwrap().status,
			FieldStatus::Invalid
		);
		assert_eq!(fx.engine.last_valid(fx.form), Some(false));
	}

	#[rstest]
	fn test_submit_cancels_pending_debounce() {
		let fx = signup();
		let nome = field(&fx, "nome");
		fx.engine.on_blur(fx.form, nome);
		fx.dom.type_value(nome, "Ana");
		fx.engine.on_input(fx.form, nome);

		fx.engine.on_submit(fx.form);
		let after_submit = fx.engine.evaluation_count();
		fx.clock.advance(Duration::from_millis(300));

		assert_eq!(fx.engine.evaluation_count(), after_submit);
	}

	#[rstest]
	fn test_valid_submit_emits_then_resets() {
		let fx = signup();
		fx.dom.type_value(field(&fx, "nome"), "Ana");
		fx.dom.type_value(field(&fx, "email"), "ana@exemplo.org");

		let outcome = fx.engine.on_submit(fx.form);

		let SubmitOutcome::Accepted(submission) = outcome else {
			panic!("expected acceptance, got {:?}", outcome);
		};
		assert_eq!(submission.get("nome"), Some("Ana"));
		assert_eq!(submission.get("cpf"), Some(""));
		assert_eq!(fx.dom.emitted(fx.form), vec![submission]);
		assert_eq!(fx.dom.alert(fx.form).map(|(kind, _)| kind), Some(AlertKind::Success));

		fx.clock.advance(Duration::from_millis(1999));
		assert_eq!(fx.dom.reset_count(fx.form), 0);
		fx.clock.advance(Duration::from_millis(1));
		assert_eq!(fx.dom.reset_count(fx.form), 1);
		assert_eq!(fx.dom.value(fx.form, field(&fx, "nome")), "");
		assert_eq!(
			fx.engine.field_state(fx.form, field(&fx, "nome")).unwrap().status,
			FieldStatus::Untouched
		);
	}

	#[rstest]
	fn test_alert_auto_dismisses() {
		let fx = signup();
		fx.engine.on_submit(fx.form);
		assert!(fx.dom.alert(fx.form).is_some());

		fx.clock.advance(Duration::from_millis(5000));
		assert!(fx.dom.alert(fx.form).is_none());
	}

	#[rstest]
	fn test_user_reset_clears_state() {
		let fx = signup();
		let nome = field(&fx, "nome");
		fx.engine.on_blur(fx.form, nome);

		fx.engine.reset_form(fx.form);

		let state = fx.engine.field_state(fx.form, nome).unwrap();
		assert_eq!(state.status, FieldStatus::Untouched);
		assert!(state.errors.is_empty());
		assert_eq!(fx.dom.feedback(nome), Some(Feedback::Neutral));
	}

	#[rstest]
	fn test_detached_forms_are_pruned() {
		let fx = signup();
		fx.dom.detach(fx.form);
		fx.engine.scan();
		assert!(fx.engine.registered_forms().is_empty());
		assert!(fx.dom.released(fx.form));
		assert!(fx.engine.field_state(fx.form, field(&fx, "nome")).is_none());
	}

	fn address_form<L>(lookup: L) -> (Fixture, FieldKey)
	where
		L: AddressLookup + 'static,
	{
		let dom = Rc::new(MemoryForms::new());
		let form = dom.add_form(&[("data-validate", "")]);
		let cep = dom.add_field(
			form,
			&[
				("id", "cep"),
				("name", "cep"),
				("data-validate-cep", "true"),
				("data-lookup", "cep"),
			],
		);
		for id in ["endereco", "bairro", "cidade", "estado", "numero"] {
			dom.add_field(form, &[("id", id), ("name", id)]);
		}
		let clock = ManualScheduler::new();
		let engine = ValidationEngine::builder(dom.clone(), Rc::new(clock.clone()))
			.lookup(Rc::new(lookup))
			.build();
		engine.scan();
		(
			Fixture {
				dom,
				clock,
				engine,
				form,
			},
			cep,
		)
	}

	fn paulista() -> Address {
		Address {
			street: "Avenida Paulista".to_string(),
			district: "Bela Vista".to_string(),
			city: "São Paulo".to_string(),
			state: "SP".to_string(),
		}
	}

	/// Answers once the paired sender fires.
	struct GatedLookup {
		gate: RefCell<Option<oneshot::Receiver<()>>>,
	}

	impl AddressLookup for GatedLookup {
		fn lookup(&self, _cep: &str) -> LocalBoxFuture<'_, Result<Address, LookupError>> {
			let gate = self.gate.borrow_mut().take();
			async move {
				if let Some(gate) = gate {
					let _ = gate.await;
				}
				Ok(paulista())
			}
			.boxed_local()
		}
	}

	#[tokio::test]
	async fn test_lookup_fills_address() {
		let lookup = StaticLookup::new().with("01310100", Ok(paulista()));
		let (fx, cep) = address_form(lookup);
		fx.dom.type_value(cep, "01310-100");

		let result = fx.engine.lookup_address(fx.form, cep).await;

		assert!(matches!(result, Some(Ok(_))));
		let cidade = field(&fx, "cidade");
		assert_eq!(fx.dom.value(fx.form, cidade), "São Paulo");
		assert_eq!(fx.dom.feedback(cidade), Some(Feedback::Valid));
		assert_eq!(
			fx.engine.field_state(fx.form, cidade).unwrap().status,
			FieldStatus::Valid
		);
	}

	#[tokio::test]
	async fn test_lookup_failure_marks_cep_field() {
		let (fx, cep) = address_form(StaticLookup::new());
		fx.dom.type_value(cep, "99999999");

		let result = fx.engine.lookup_address(fx.form, cep).await;

		assert_eq!(result, Some(Err(LookupError::NotFound)));
		assert_eq!(
			fx.engine.field_state(fx.form, cep).unwrap().errors,
			vec!["CEP não encontrado"]
		);
	}

	#[tokio::test]
	async fn test_incomplete_cep_skips_lookup() {
		let lookup = StaticLookup::new();
		let calls = lookup.calls();
		let (fx, cep) = address_form(lookup);
		fx.dom.type_value(cep, "0131");

		assert!(fx.engine.lookup_address(fx.form, cep).await.is_none());
		assert_eq!(calls.get(), 0);
	}

	#[tokio::test]
	async fn test_blur_on_complete_cep_fills_address() {
		let (fx, cep) = address_form(StaticLookup::new().with("01310100", Ok(paulista())));
		let local = LocalSet::new();

		local
			.run_until(async {
				fx.dom.type_value(cep, "01310-100");
				fx.engine.on_blur(fx.form, cep);
			})
			.await;
		local.await;

		assert_eq!(fx.dom.value(fx.form, field(&fx, "endereco")), "Avenida Paulista");
		assert_eq!(fx.dom.feedback(field(&fx, "estado")), Some(Feedback::Valid));
		assert_eq!(fx.dom.focused(), Some(field(&fx, "numero")));
		assert!(fx.dom.busy(cep).is_none());
	}

	#[tokio::test]
	async fn test_cep_field_is_busy_while_lookup_runs() {
		let (release, gate) = oneshot::channel();
		let (fx, cep) = address_form(GatedLookup {
			gate: RefCell::new(Some(gate)),
		});
		let local = LocalSet::new();

		local
			.run_until(async {
				fx.dom.type_value(cep, "01310-100");
				fx.engine.on_blur(fx.form, cep);
				tokio::task::yield_now().await;
				assert_eq!(fx.dom.busy(cep).as_deref(), Some("Buscando..."));
				let _ = release.send(());
			})
			.await;
		local.await;

		assert!(fx.dom.busy(cep).is_none());
		assert_eq!(fx.dom.value(fx.form, field(&fx, "cidade")), "São Paulo");
	}

	#[tokio::test]
	async fn test_lookup_discarded_when_cep_changes_midway() {
		let (release, gate) = oneshot::channel();
		let (fx, cep) = address_form(GatedLookup {
			gate: RefCell::new(Some(gate)),
		});
		let local = LocalSet::new();

		local
			.run_until(async {
				fx.dom.type_value(cep, "01310-100");
				fx.engine.on_blur(fx.form, cep);
				tokio::task::yield_now().await;
				fx.dom.type_value(cep, "20040-020");
				let _ = release.send(());
			})
			.await;
		local.await;

		assert_eq!(fx.dom.value(fx.form, field(&fx, "endereco")), "");
		assert_eq!(fx.dom.feedback(field(&fx, "cidade")), None);
		assert!(fx.dom.focused().is_none());
		assert!(fx.dom.busy(cep).is_none());
	}

	#[rstest]
	fn test_blur_without_lookup_client_spawns_nothing() {
		let dom = Rc::new(MemoryForms::new());
		let form = dom.add_form(&[("data-validate", "")]);
		let cep = dom.add_field(form, &[("id", "cep"), ("data-lookup", "cep")]);
		let engine = ValidationEngine::builder(dom.clone(), Rc::new(ManualScheduler::new())).build();
		engine.scan();
		dom.type_value(cep, "01310-100");

		engine.on_blur(form, cep);

		assert_eq!(engine.field_state(form, cep).unwrap().status, FieldStatus::Valid);
	}

	#[rstest]
	fn test_post_submit_reset_fires_once() {
		let fx = signup();
		fx.dom.type_value(field(&fx, "nome"), "Ana Souza");
		assert!(matches!(fx.engine.on_submit(fx.form), SubmitOutcome::Accepted(_)));

		fx.clock.advance(Duration::from_millis(2000));
		fx.clock.advance(Duration::from_millis(2000));

		assert_eq!(fx.dom.reset_count(fx.form), 1);
		assert_eq!(
			fx.engine.field_state(fx.form, field(&fx, "nome")).unwrap().status,
			FieldStatus::Untouched
		);
	}
}
