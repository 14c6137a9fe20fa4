//! In-memory doubles for the browser seams.
//!
//! These implement [`HistoryBackend`], [`ContentSurface`], [`FormDom`],
//! [`Scheduler`] and [`AddressLookup`] without a document, so the
//! navigation controller and the validation engine can be driven from
//! `#[tokio::test]` on the host.
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use voluntar_pages::form::ValidationEngine;
//! use voluntar_pages::testing::{ManualScheduler, MemoryForms};
//!
//! let dom = Rc::new(MemoryForms::new());
//! let form = dom.add_form(&[("data-validate", "")]);
//! let name = dom.add_field(form, &[("name", "nome"), ("required", "")]);
//!
//! let clock = ManualScheduler::new();
//! let engine = ValidationEngine::builder(dom.clone(), Rc::new(clock.clone())).build();
//! engine.scan();
//!
//! engine.on_blur(form, name);
//! dom.type_value(name, "Ana");
//! engine.on_input(form, name);
//! clock.advance(Duration::from_millis(300));
//! assert_eq!(engine.field_state(form, name).unwrap().errors, Vec::<String>::new());
//! ```

use crate::events::{FormSubmission, PageSignal};
use crate::form::dom::{AlertKind, FieldDescriptor, FieldFeedback, FieldKey, FormDom, FormKey};
use crate::form::lookup::{Address, AddressLookup, LookupError};
use crate::platform::{Scheduler, TimerHandle};
use crate::router::error::RouterError;
use crate::router::history::{HistoryBackend, HistoryState};
use crate::router::surface::ContentSurface;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};
use std::time::Duration;

// ----------------------------------------------------------------------------
// History
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Entry {
	state: Option<HistoryState>,
	url: String,
}

#[derive(Debug, Default)]
struct HistoryStack {
	entries: Vec<Entry>,
	index: usize,
}

/// Session history kept in memory.
///
/// Starts with one entry without state, like a freshly loaded page.
#[derive(Debug, Default)]
pub struct MemoryHistory {
	stack: RefCell<HistoryStack>,
}

impl MemoryHistory {
	/// Creates a history whose only entry is `url`.
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			stack: RefCell::new(HistoryStack {
				entries: vec![Entry {
					state: None,
					url: url.into(),
				}],
				index: 0,
			}),
		}
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.stack.borrow().entries.len()
	}

	/// Whether the history has no entries. Never true after [`Self::new`].
	pub fn is_empty(&self) -> bool {
		self.stack.borrow().entries.is_empty()
	}

	/// State of the current entry.
	pub fn current_state(&self) -> Option<HistoryState> {
		let stack = self.stack.borrow();
		stack.entries.get(stack.index).and_then(|e| e.state.clone())
	}

	/// URLs of all entries, oldest first.
	pub fn urls(&self) -> Vec<String> {
		self.stack
			.borrow()
			.entries
			.iter()
			.map(|e| e.url.clone())
			.collect()
	}

	/// Moves one entry back and returns the popstate payload, or `None` at
	/// the first entry.
	pub fn back(&self) -> Option<Option<HistoryState>> {
		let mut stack = self.stack.borrow_mut();
		if stack.index == 0 {
			return None;
		}
		stack.index -= 1;
		Some(stack.entries[stack.index].state.clone())
	}

	/// Moves one entry forward and returns the popstate payload, or `None`
	/// at the last entry.
	pub fn forward(&self) -> Option<Option<HistoryState>> {
		let mut stack = self.stack.borrow_mut();
		if stack.index + 1 >= stack.entries.len() {
			return None;
		}
		stack.index += 1;
		Some(stack.entries[stack.index].state.clone())
	}
}

impl HistoryBackend for MemoryHistory {
	fn push(&self, state: &HistoryState, url: &str) -> Result<(), RouterError> {
		let mut stack = self.stack.borrow_mut();
		let keep = stack.index + 1;
		stack.entries.truncate(keep);
		stack.entries.push(Entry {
			state: Some(state.clone()),
			url: url.to_string(),
		});
		stack.index = keep;
		Ok(())
	}

	fn replace(&self, state: &HistoryState, url: &str) -> Result<(), RouterError> {
		let mut stack = self.stack.borrow_mut();
		let index = stack.index;
		match stack.entries.get_mut(index) {
			Some(entry) => {
				*entry = Entry {
					state: Some(state.clone()),
					url: url.to_string(),
				};
				Ok(())
			}
			None => Err(RouterError::NavigationFailed("empty history".to_string())),
		}
	}

	fn location(&self) -> String {
		let stack = self.stack.borrow();
		stack
			.entries
			.get(stack.index)
			.map(|e| e.url.clone())
			.unwrap_or_default()
	}
}

// ----------------------------------------------------------------------------
// Content surface
// ----------------------------------------------------------------------------

type SignalHook = Box<dyn Fn(&PageSignal)>;

/// Content container kept in memory. Records every call.
#[derive(Default)]
pub struct MemorySurface {
	content: RefCell<String>,
	visible: Cell<bool>,
	transitions: Cell<usize>,
	swaps: Cell<usize>,
	scrolls: Cell<usize>,
	active: RefCell<Vec<String>>,
	signals: RefCell<Vec<PageSignal>>,
	hooks: RefCell<Vec<SignalHook>>,
}

impl std::fmt::Debug for MemorySurface {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemorySurface")
			.field("content", &self.content)
			.field("visible", &self.visible)
			.field("signals", &self.signals)
			.finish_non_exhaustive()
	}
}

impl MemorySurface {
	/// Creates an empty, visible surface.
	pub fn new() -> Self {
		Self {
			visible: Cell::new(true),
			..Self::default()
		}
	}

	/// Current container markup.
	pub fn content(&self) -> String {
		self.content.borrow().clone()
	}

	/// Whether the container is faded in.
	pub fn is_visible(&self) -> bool {
		self.visible.get()
	}

	/// Number of fade-outs started.
	pub fn transitions(&self) -> usize {
		self.transitions.get()
	}

	/// Number of content swaps.
	pub fn swaps(&self) -> usize {
		self.swaps.get()
	}

	/// Number of scroll-to-top requests.
	pub fn scroll_count(&self) -> usize {
		self.scrolls.get()
	}

	/// Hrefs last marked active.
	pub fn active_hrefs(&self) -> Vec<String> {
		self.active.borrow().clone()
	}

	/// Every announced signal, in order.
	pub fn signals(&self) -> Vec<PageSignal> {
		self.signals.borrow().clone()
	}

	/// Event names of every announced signal, in order.
	pub fn signal_names(&self) -> Vec<&'static str> {
		self.signals.borrow().iter().map(PageSignal::name).collect()
	}

	/// Calls `hook` for every signal announced from now on, after it is recorded.
	pub fn on_announce<F>(&self, hook: F)
	where
		F: Fn(&PageSignal) + 'static,
	{
		self.hooks.borrow_mut().push(Box::new(hook));
	}
}

impl ContentSurface for MemorySurface {
	fn begin_transition(&self) {
		self.transitions.set(self.transitions.get() + 1);
		self.visible.set(false);
	}

	fn swap(&self, markup: &str) {
		*self.content.borrow_mut() = markup.to_string();
		self.swaps.set(self.swaps.get() + 1);
		self.visible.set(true);
	}

	fn mark_active(&self, hrefs: &[String]) {
		*self.active.borrow_mut() = hrefs.to_vec();
	}

	fn scroll_to_top(&self) {
		self.scrolls.set(self.scrolls.get() + 1);
	}

	fn announce(&self, signal: &PageSignal) {
		self.signals.borrow_mut().push(signal.clone());
		for hook in self.hooks.borrow().iter() {
			hook(signal);
		}
	}
}

// ----------------------------------------------------------------------------
// Forms
// ----------------------------------------------------------------------------

/// Owned copy of the visual state rendered for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
	/// No marker.
	Neutral,
	/// Valid marker.
	Valid,
	/// Invalid marker with its messages.
	Invalid(Vec<String>),
}

impl From<FieldFeedback<'_>> for Feedback {
	fn from(feedback: FieldFeedback<'_>) -> Self {
		match feedback {
			FieldFeedback::Neutral => Self::Neutral,
			FieldFeedback::Valid => Self::Valid,
			FieldFeedback::Invalid(errors) => Self::Invalid(errors.to_vec()),
		}
	}
}

#[derive(Debug, Default)]
struct FormEntry {
	attributes: Vec<(String, String)>,
	fields: Vec<FieldKey>,
	attached: bool,
	released: bool,
	alert: Option<(AlertKind, String)>,
	emitted: Vec<FormSubmission>,
	resets: usize,
}

#[derive(Debug)]
struct FieldEntry {
	form: FormKey,
	attributes: Vec<(String, String)>,
	initial: String,
	value: String,
	checked: bool,
	feedback: Option<Feedback>,
	busy: Option<String>,
}

impl FieldEntry {
	fn attr(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}

	fn id(&self) -> Option<&str> {
		self.attr("id")
	}

	fn is_checkable(&self) -> bool {
		self.attr("type")
			.is_some_and(|t| t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio"))
	}

	fn current_value(&self) -> String {
		if self.is_checkable() && !self.checked {
			String::new()
		} else {
			self.value.clone()
		}
	}
}

#[derive(Debug, Default)]
struct FormsState {
	next_key: u32,
	forms: BTreeMap<FormKey, FormEntry>,
	fields: BTreeMap<FieldKey, FieldEntry>,
	focused: Option<FieldKey>,
}

impl FormsState {
	fn next(&mut self) -> u32 {
		self.next_key += 1;
		self.next_key
	}
}

fn owned(attributes: &[(&str, &str)]) -> Vec<(String, String)> {
	attributes
		.iter()
		.map(|(n, v)| (n.to_string(), v.to_string()))
		.collect()
}

/// Forms and fields kept in memory.
///
/// Field values start at the `value` attribute (or empty) and go back to it
/// on [`FormDom::reset`]. Checkboxes and radios (`type` attribute) start
/// checked when they carry `checked` and read as empty while unchecked.
#[derive(Debug, Default)]
pub struct MemoryForms {
	state: RefCell<FormsState>,
}

impl MemoryForms {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a form with `attributes`.
	pub fn add_form(&self, attributes: &[(&str, &str)]) -> FormKey {
		let mut state = self.state.borrow_mut();
		let key = FormKey(state.next());
		state.forms.insert(
			key,
			FormEntry {
				attributes: owned(attributes),
				attached: true,
				..FormEntry::default()
			},
		);
		key
	}

	/// Appends a field with `attributes` to `form`.
	///
	/// # Panics
	///
	/// Panics when `form` was never added.
	pub fn add_field(&self, form: FormKey, attributes: &[(&str, &str)]) -> FieldKey {
		let mut state = self.state.borrow_mut();
		let key = FieldKey(state.next());
		let initial = attributes
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case("value"))
			.map(|(_, v)| v.to_string())
			.unwrap_or_default();
		state
			.forms
			.get_mut(&form)
			.expect("add_field on an unknown form")
			.fields
			.push(key);
		let entry = FieldEntry {
			form,
			attributes: owned(attributes),
			value: initial.clone(),
			initial,
			checked: false,
			feedback: None,
			busy: None,
		};
		let checked = entry.attr("checked").is_some();
		state.fields.insert(key, FieldEntry { checked, ..entry });
		key
	}

	/// Field of `form` whose `id` is `id`.
	pub fn field_by_id(&self, form: FormKey, id: &str) -> Option<FieldKey> {
		let state = self.state.borrow();
		state.forms.get(&form)?.fields.iter().copied().find(|key| {
			state
				.fields
				.get(key)
				.is_some_and(|f| f.id() == Some(id))
		})
	}

	/// Sets the value of a field as typing would, without notifying anyone.
	pub fn type_value(&self, field: FieldKey, value: &str) {
		if let Some(entry) = self.state.borrow_mut().fields.get_mut(&field) {
			entry.value = value.to_string();
		}
	}

	/// Checks or unchecks a checkbox or radio, without notifying anyone.
	pub fn set_checked(&self, field: FieldKey, checked: bool) {
		if let Some(entry) = self.state.borrow_mut().fields.get_mut(&field) {
			entry.checked = checked;
		}
	}

	/// Placeholder shown while the field is busy, `None` when it is not.
	pub fn busy(&self, field: FieldKey) -> Option<String> {
		self.state
			.borrow()
			.fields
			.get(&field)
			.and_then(|f| f.busy.clone())
	}

	/// Feedback last rendered for a field.
	pub fn feedback(&self, field: FieldKey) -> Option<Feedback> {
		self.state
			.borrow()
			.fields
			.get(&field)
			.and_then(|f| f.feedback.clone())
	}

	/// Field that last received focus.
	pub fn focused(&self) -> Option<FieldKey> {
		self.state.borrow().focused
	}

	/// Alert currently shown on `form`.
	pub fn alert(&self, form: FormKey) -> Option<(AlertKind, String)> {
		self.state
			.borrow()
			.forms
			.get(&form)
			.and_then(|f| f.alert.clone())
	}

	/// Valid-submit events dispatched on `form`, in order.
	pub fn emitted(&self, form: FormKey) -> Vec<FormSubmission> {
		self.state
			.borrow()
			.forms
			.get(&form)
			.map(|f| f.emitted.clone())
			.unwrap_or_default()
	}

	/// Number of times `form` was reset.
	pub fn reset_count(&self, form: FormKey) -> usize {
		self.state
			.borrow()
			.forms
			.get(&form)
			.map_or(0, |f| f.resets)
	}

	/// Removes `form` from the document. Its data stays readable.
	pub fn detach(&self, form: FormKey) {
		if let Some(entry) = self.state.borrow_mut().forms.get_mut(&form) {
			entry.attached = false;
		}
	}

	/// Whether the engine released `form`.
	pub fn released(&self, form: FormKey) -> bool {
		self.state
			.borrow()
			.forms
			.get(&form)
			.is_some_and(|f| f.released)
	}
}

impl FormDom for MemoryForms {
	fn forms(&self, marker: &str) -> Vec<FormKey> {
		self.state
			.borrow()
			.forms
			.iter()
			.filter(|(_, f)| {
				f.attached && f.attributes.iter().any(|(n, _)| n.eq_ignore_ascii_case(marker))
			})
			.map(|(key, _)| *key)
			.collect()
	}

	fn is_attached(&self, form: FormKey) -> bool {
		self.state
			.borrow()
			.forms
			.get(&form)
			.is_some_and(|f| f.attached)
	}

	fn release(&self, form: FormKey) {
		if let Some(entry) = self.state.borrow_mut().forms.get_mut(&form) {
			entry.released = true;
		}
	}

	fn fields(&self, form: FormKey) -> Vec<FieldDescriptor> {
		let state = self.state.borrow();
		let Some(entry) = state.forms.get(&form) else {
			return Vec::new();
		};
		entry
			.fields
			.iter()
			.filter_map(|key| {
				let field = state.fields.get(key)?;
				Some(FieldDescriptor::new(*key, field.attributes.clone()))
			})
			.collect()
	}

	fn value(&self, _form: FormKey, field: FieldKey) -> String {
		self.state
			.borrow()
			.fields
			.get(&field)
			.map(FieldEntry::current_value)
			.unwrap_or_default()
	}

	fn set_value(&self, _form: FormKey, field: FieldKey, value: &str) {
		self.type_value(field, value);
	}

	fn value_by_id(&self, form: FormKey, id: &str) -> Option<String> {
		let key = self.field_by_id(form, id)?;
		Some(self.value(form, key))
	}

	fn values_by_name(&self, form: FormKey, name: &str) -> Vec<String> {
		let state = self.state.borrow();
		let Some(entry) = state.forms.get(&form) else {
			return Vec::new();
		};
		entry
			.fields
			.iter()
			.filter_map(|key| state.fields.get(key))
			.filter(|field| field.attr("name") == Some(name))
			.map(FieldEntry::current_value)
			.collect()
	}

	fn set_busy(&self, _form: FormKey, field: FieldKey, placeholder: Option<&str>) {
		if let Some(entry) = self.state.borrow_mut().fields.get_mut(&field) {
			entry.busy = placeholder.map(str::to_string);
		}
	}

	fn render_feedback(&self, _form: FormKey, field: FieldKey, feedback: FieldFeedback<'_>) {
		if let Some(entry) = self.state.borrow_mut().fields.get_mut(&field) {
			entry.feedback = Some(feedback.into());
		}
	}

	fn show_alert(&self, form: FormKey, kind: AlertKind, message: &str) {
		if let Some(entry) = self.state.borrow_mut().forms.get_mut(&form) {
			entry.alert = Some((kind, message.to_string()));
		}
	}

	fn dismiss_alert(&self, form: FormKey) {
		if let Some(entry) = self.state.borrow_mut().forms.get_mut(&form) {
			entry.alert = None;
		}
	}

	fn focus(&self, _form: FormKey, field: FieldKey) {
		self.state.borrow_mut().focused = Some(field);
	}

	fn emit_valid_submit(&self, form: FormKey, submission: &FormSubmission) {
		if let Some(entry) = self.state.borrow_mut().forms.get_mut(&form) {
			entry.emitted.push(submission.clone());
		}
	}

	fn reset(&self, form: FormKey) {
		let mut state = self.state.borrow_mut();
		let FormsState { forms, fields, .. } = &mut *state;
		let Some(entry) = forms.get_mut(&form) else {
			return;
		};
		entry.resets += 1;
		for key in &entry.fields {
			match fields.get_mut(key) {
				Some(field) if field.form == form => {
					field.value = field.initial.clone();
					field.checked = field.attr("checked").is_some();
				}
				_ => {}
			}
		}
	}
}

// ----------------------------------------------------------------------------
// Scheduler
// ----------------------------------------------------------------------------

struct PendingTask {
	id: u64,
	due: Duration,
	task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct SchedulerState {
	now: Duration,
	next_id: u64,
	tasks: Vec<PendingTask>,
}

struct CancelOnDrop {
	state: Weak<RefCell<SchedulerState>>,
	id: u64,
}

impl Drop for CancelOnDrop {
	fn drop(&mut self) {
		let Some(state) = self.state.upgrade() else {
			return;
		};
		if let Ok(mut state) = state.try_borrow_mut() {
			state.tasks.retain(|t| t.id != self.id);
		}
	}
}

/// [`Scheduler`] driven by hand: time only moves in [`Self::advance`].
///
/// Cloning is cheap; clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
	state: Rc<RefCell<SchedulerState>>,
}

impl std::fmt::Debug for ManualScheduler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("ManualScheduler")
			.field("now", &state.now)
			.field("pending", &state.tasks.len())
			.finish()
	}
}

impl ManualScheduler {
	/// Creates a clock at zero with nothing scheduled.
	pub fn new() -> Self {
		Self::default()
	}

	/// Time elapsed since creation.
	pub fn now(&self) -> Duration {
		self.state.borrow().now
	}

	/// Number of tasks scheduled and not yet run or cancelled.
	pub fn pending(&self) -> usize {
		self.state.borrow().tasks.len()
	}

	/// Moves time forward by `by`, running every task that falls due, in due
	/// order. Tasks scheduled while advancing run too if they fall due in
	/// the window.
	pub fn advance(&self, by: Duration) {
		let target = self.state.borrow().now + by;
		loop {
			let next = {
				let mut state = self.state.borrow_mut();
				let due = state
					.tasks
					.iter()
					.enumerate()
					.filter(|(_, t)| t.due <= target)
					.min_by_key(|(_, t)| (t.due, t.id))
					.map(|(index, _)| index);
				due.map(|index| {
					let task = state.tasks.remove(index);
					state.now = task.due;
					task
				})
			};
			match next {
				Some(pending) => (pending.task)(),
				None => break,
			}
		}
		self.state.borrow_mut().now = target;
	}
}

impl Scheduler for ManualScheduler {
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
		let mut state = self.state.borrow_mut();
		state.next_id += 1;
		let id = state.next_id;
		let due = state.now + delay;
		state.tasks.push(PendingTask { id, due, task });
		TimerHandle::new(CancelOnDrop {
			state: Rc::downgrade(&self.state),
			id,
		})
	}
}

// ----------------------------------------------------------------------------
// Address lookup
// ----------------------------------------------------------------------------

/// [`AddressLookup`] with canned answers. Unknown codes are not found.
#[derive(Debug, Default)]
pub struct StaticLookup {
	answers: HashMap<String, Result<Address, LookupError>>,
	calls: Rc<Cell<usize>>,
}

impl StaticLookup {
	/// Creates a lookup that knows no code.
	pub fn new() -> Self {
		Self::default()
	}

	/// Answers `cep` (bare digits) with `answer`.
	pub fn with(mut self, cep: &str, answer: Result<Address, LookupError>) -> Self {
		self.answers.insert(cep.to_string(), answer);
		self
	}

	/// Shared counter of lookups performed.
	pub fn calls(&self) -> Rc<Cell<usize>> {
		Rc::clone(&self.calls)
	}
}

impl AddressLookup for StaticLookup {
	fn lookup(&self, cep: &str) -> LocalBoxFuture<'_, Result<Address, LookupError>> {
		self.calls.set(self.calls.get() + 1);
		let answer = self
			.answers
			.get(cep)
			.cloned()
			.unwrap_or(Err(LookupError::NotFound));
		async move { answer }.boxed_local()
	}
}
