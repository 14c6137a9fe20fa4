//! The document as seen by the validation engine.
//!
//! [`FormDom`] is implemented over the live document in the browser and by
//! [`MemoryForms`](crate::testing::MemoryForms) in tests.

use crate::events::FormSubmission;

/// Stable handle of a form element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormKey(pub u32);

/// Stable handle of a field element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(pub u32);

/// A field and its declared attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	/// Handle of the element.
	pub key: FieldKey,
	/// `id` attribute.
	pub id: Option<String>,
	/// `name` attribute.
	pub name: Option<String>,
	/// All attributes, names lowercased, in source order.
	pub attributes: Vec<(String, String)>,
}

impl FieldDescriptor {
	/// Creates a descriptor, reading `id` and `name` from `attributes`.
	pub fn new<N, V>(key: FieldKey, attributes: impl IntoIterator<Item = (N, V)>) -> Self
	where
		N: Into<String>,
		V: Into<String>,
	{
		let attributes: Vec<(String, String)> = attributes
			.into_iter()
			.map(|(n, v)| (n.into().to_ascii_lowercase(), v.into()))
			.collect();
		let find = |wanted: &str| {
			attributes
				.iter()
				.find(|(n, _)| n == wanted)
				.map(|(_, v)| v.clone())
		};
		Self {
			key,
			id: find("id"),
			name: find("name"),
			attributes,
		}
	}

	/// Value of attribute `name`.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}

	/// Whether attribute `name` is present.
	pub fn has_attr(&self, name: &str) -> bool {
		self.attr(name).is_some()
	}

	/// Whether the field is a checkbox or a radio button.
	pub fn is_checkable(&self) -> bool {
		self.attr("type").is_some_and(|kind| {
			kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio")
		})
	}

	/// Whether a boolean data attribute is switched on: present and not `"false"`.
	pub fn flag(&self, name: &str) -> bool {
		self.attr(name)
			.is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"))
	}
}

/// Visual state of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFeedback<'a> {
	/// No marker.
	Neutral,
	/// Valid marker.
	Valid,
	/// Invalid marker with the messages to list under the field.
	Invalid(&'a [String]),
}

/// Severity of a form-level alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
	/// Submission accepted.
	Success,
	/// Submission blocked.
	Error,
}

impl AlertKind {
	/// CSS modifier suffix (`alert-success`, `alert-error`).
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Error => "error",
		}
	}
}

/// Read access to sibling fields of the same form.
pub trait SiblingValues {
	/// Value of the field with element id `id`, if the form has one.
	fn sibling_value(&self, id: &str) -> Option<String>;

	/// Values of every field named `name`. Unchecked boxes read as empty.
	fn group_values(&self, _name: &str) -> Vec<String> {
		Vec::new()
	}
}

impl SiblingValues for std::collections::HashMap<String, String> {
	fn sibling_value(&self, id: &str) -> Option<String> {
		self.get(id).cloned()
	}
}

/// Document operations the validation engine needs.
pub trait FormDom {
	/// Forms carrying `marker`, in document order.
	fn forms(&self, marker: &str) -> Vec<FormKey>;
	/// Whether the form is still attached to the document.
	fn is_attached(&self, form: FormKey) -> bool;
	/// Forgets a form the engine pruned.
	fn release(&self, form: FormKey);
	/// `input`, `select` and `textarea` elements of the form, in document order.
	fn fields(&self, form: FormKey) -> Vec<FieldDescriptor>;
	/// Current value of a field. Unchecked checkboxes and radios read as empty.
	fn value(&self, form: FormKey, field: FieldKey) -> String;
	/// Overwrites the value of a field.
	fn set_value(&self, form: FormKey, field: FieldKey, value: &str);
	/// Value of the field with element id `id` inside the form.
	fn value_by_id(&self, form: FormKey, id: &str) -> Option<String>;
	/// Values of the fields named `name` inside the form, in document order.
	fn values_by_name(&self, form: FormKey, name: &str) -> Vec<String>;
	/// Disables a field and shows `placeholder` while work on it is pending.
	/// `None` restores the field.
	fn set_busy(&self, form: FormKey, field: FieldKey, placeholder: Option<&str>);
	/// Updates the validity marker and message list of a field.
	fn render_feedback(&self, form: FormKey, field: FieldKey, feedback: FieldFeedback<'_>);
	/// Shows a form-level alert, replacing any previous one.
	fn show_alert(&self, form: FormKey, kind: AlertKind, message: &str);
	/// Removes the form-level alert, if any.
	fn dismiss_alert(&self, form: FormKey);
	/// Scrolls a field into view and focuses it.
	fn focus(&self, form: FormKey, field: FieldKey);
	/// Dispatches the valid-submit event on the form.
	fn emit_valid_submit(&self, form: FormKey, submission: &FormSubmission);
	/// Restores the form's initial values.
	fn reset(&self, form: FormKey);
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn descriptor() -> FieldDescriptor {
		FieldDescriptor::new(
			FieldKey(1),
			[
				("ID", "email"),
				("name", "email"),
				("required", ""),
				("data-validate-email", "true"),
				("data-validate-cpf", "false"),
			],
		)
	}

	#[rstest]
	fn test_descriptor_reads_id_and_name() {
		let field = descriptor();
		assert_eq!(field.id.as_deref(), Some("email"));
		assert_eq!(field.name.as_deref(), Some("email"));
	}

	#[rstest]
	#[case("required", true)]
	#[case("data-validate-email", true)]
	#[case("data-validate-cpf", false)]
	#[case("data-validate-phone", false)]
	fn test_flag(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(descriptor().flag(name), expected);
	}

	#[rstest]
	#[case("checkbox", true)]
	#[case("RADIO", true)]
	#[case("text", false)]
	fn test_is_checkable(#[case] kind: &str, #[case] expected: bool) {
		let field = FieldDescriptor::new(FieldKey(2), [("type", kind)]);
		assert_eq!(field.is_checkable(), expected);
	}

	#[rstest]
	fn test_attr_lookup_is_case_insensitive() {
		assert_eq!(descriptor().attr("Required"), Some(""));
		assert!(!descriptor().has_attr("pattern"));
	}
}
