//! Per-form and per-field validation state.

use super::dom::{FieldDescriptor, FieldFeedback, FieldKey, FormKey};
use super::schema::FieldSchema;
use crate::platform::TimerHandle;

/// Where a field is in its validation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
	/// Not yet blurred, or reset since.
	Untouched,
	/// Last evaluation found no violation.
	Valid,
	/// Last evaluation found at least one violation.
	Invalid,
}

/// Read-only copy of a field's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
	/// Handle of the field.
	pub key: FieldKey,
	/// `name` attribute.
	pub name: Option<String>,
	/// Lifecycle state.
	pub status: FieldStatus,
	/// Messages from the last evaluation.
	pub errors: Vec<String>,
	/// Whether a debounced evaluation is pending.
	pub pending: bool,
}

/// A one-shot timer slot. The ticket identifies the armed timer, so a
/// callback from a replaced or disarmed timer is recognised and ignored.
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
	handle: Option<TimerHandle>,
	armed: Option<u64>,
}

impl TimerSlot {
	/// Replaces any pending timer.
	pub(crate) fn arm(&mut self, ticket: u64, handle: TimerHandle) {
		self.armed = Some(ticket);
		self.handle = Some(handle);
	}

	/// Consumes `ticket` if it is the armed one.
	pub(crate) fn fire(&mut self, ticket: u64) -> bool {
		if self.armed == Some(ticket) {
			self.armed = None;
			true
		} else {
			false
		}
	}

	/// Ignores the pending timer without dropping its handle. Safe to call
	/// from inside the timer's own callback.
	pub(crate) fn disarm(&mut self) {
		self.armed = None;
	}

	/// Disarms and drops the pending timer.
	pub(crate) fn cancel(&mut self) {
		self.armed = None;
		self.handle = None;
	}

	pub(crate) fn is_armed(&self) -> bool {
		self.armed.is_some()
	}
}

pub(crate) struct FieldRecord {
	pub(crate) descriptor: FieldDescriptor,
	pub(crate) schema: FieldSchema,
	pub(crate) errors: Vec<String>,
	pub(crate) touched: bool,
	pub(crate) debounce: TimerSlot,
}

impl FieldRecord {
	pub(crate) fn new(descriptor: FieldDescriptor, schema: FieldSchema) -> Self {
		Self {
			descriptor,
			schema,
			errors: Vec::new(),
			touched: false,
			debounce: TimerSlot::default(),
		}
	}

	pub(crate) fn key(&self) -> FieldKey {
		self.descriptor.key
	}

	pub(crate) fn status(&self) -> FieldStatus {
		if !self.touched {
			FieldStatus::Untouched
		} else if self.errors.is_empty() {
			FieldStatus::Valid
		} else {
			FieldStatus::Invalid
		}
	}

	/// Visual state for the current errors. Empty valid fields stay neutral.
	pub(crate) fn feedback(&self, value: &str) -> FieldFeedback<'_> {
		if !self.errors.is_empty() {
			FieldFeedback::Invalid(&self.errors)
		} else if value.trim().is_empty() {
			FieldFeedback::Neutral
		} else {
			FieldFeedback::Valid
		}
	}

	/// Returns the field to [`FieldStatus::Untouched`].
	pub(crate) fn clear(&mut self) {
		self.touched = false;
		self.errors.clear();
		self.debounce.disarm();
	}

	pub(crate) fn snapshot(&self) -> FieldSnapshot {
		FieldSnapshot {
			key: self.key(),
			name: self.descriptor.name.clone(),
			status: self.status(),
			errors: self.errors.clone(),
			pending: self.debounce.is_armed(),
		}
	}
}

pub(crate) struct FormRecord {
	pub(crate) key: FormKey,
	pub(crate) fields: Vec<FieldRecord>,
	pub(crate) last_valid: bool,
	pub(crate) reset: TimerSlot,
	pub(crate) alert: TimerSlot,
}

impl FormRecord {
	pub(crate) fn new(key: FormKey, fields: Vec<FieldRecord>) -> Self {
		Self {
			key,
			fields,
			last_valid: false,
			reset: TimerSlot::default(),
			alert: TimerSlot::default(),
		}
	}

	pub(crate) fn field(&self, key: FieldKey) -> Option<&FieldRecord> {
		self.fields.iter().find(|f| f.key() == key)
	}

	pub(crate) fn field_mut(&mut self, key: FieldKey) -> Option<&mut FieldRecord> {
		self.fields.iter_mut().find(|f| f.key() == key)
	}

	pub(crate) fn field_by_id_mut(&mut self, id: &str) -> Option<&mut FieldRecord> {
		self.fields
			.iter_mut()
			.find(|f| f.descriptor.id.as_deref() == Some(id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::form::schema::FieldSchema;
	use rstest::rstest;

	fn record() -> FieldRecord {
		FieldRecord::new(
			FieldDescriptor::new(FieldKey(3), [("name", "nome")]),
			FieldSchema::default(),
		)
	}

	#[rstest]
	fn test_status_transitions() {
		let mut field = record();
		assert_eq!(field.status(), FieldStatus::Untouched);

		field.touched = true;
		assert_eq!(field.status(), FieldStatus::Valid);

		field.errors.push("Este campo é obrigatório".to_string());
		assert_eq!(field.status(), FieldStatus::Invalid);

		field.clear();
		assert_eq!(field.status(), FieldStatus::Untouched);
		assert!(field.errors.is_empty());
	}

	#[rstest]
	fn test_feedback() {
		let mut field = record();
		assert_eq!(field.feedback(""), FieldFeedback::Neutral);
		assert_eq!(field.feedback("Ana"), FieldFeedback::Valid);
		field.errors.push("x".to_string());
		assert!(matches!(field.feedback("Ana"), FieldFeedback::Invalid(e) if e.len() == 1));
	}

	#[rstest]
	fn test_timer_slot_tickets() {
		let mut slot = TimerSlot::default();
		slot.arm(1, TimerHandle::new(()));
		slot.arm(2, TimerHandle::new(()));

		assert!(!slot.fire(1));
		assert!(slot.fire(2));
		assert!(!slot.fire(2));

		slot.arm(3, TimerHandle::new(()));
		slot.disarm();
		assert!(!slot.fire(3));
	}
}
