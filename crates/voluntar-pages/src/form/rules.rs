//! Field rule registry
//!
//! Rules are looked up by name. Each instance of the validation engine owns
//! its own [`RuleRegistry`], pre-filled with the built-in rules; custom rules
//! are added with [`RuleRegistry::register`] and declared on fields as
//! `data-rule-<name>="<param>"`.
//!
//! Evaluators receive the trimmed value. They report a violation as the
//! message to show and never panic.

use super::dom::{FieldDescriptor, SiblingValues};
use crate::debug_log;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::rc::Rc;
use voluntar_validators as v;
use voluntar_validators::ValidationError;

/// Built-in rule names.
pub mod names {
	/// Non-empty value.
	pub const REQUIRED: &str = "required";
	/// Minimum length in characters.
	pub const MIN_LENGTH: &str = "minLength";
	/// Maximum length in characters.
	pub const MAX_LENGTH: &str = "maxLength";
	/// Minimum numeric value.
	pub const MIN: &str = "min";
	/// Maximum numeric value.
	pub const MAX: &str = "max";
	/// Full-match regular expression.
	pub const PATTERN: &str = "pattern";
	/// Email address.
	pub const EMAIL: &str = "email";
	/// CPF with check digits.
	pub const CPF: &str = "cpf";
	/// Brazilian phone number.
	pub const PHONE: &str = "phone";
	/// Brazilian postal code.
	pub const CEP: &str = "cep";
	/// Past date within 120 years.
	pub const DATE: &str = "date";
	/// Same value as another field.
	pub const MATCH: &str = "match";
	/// Minimum age for a birth date.
	pub const MIN_AGE: &str = "minAge";
	/// Other fields required when this one is filled.
	pub const CONSISTENCY: &str = "consistency";
	/// Minimum number of checked boxes sharing the field's `name`.
	pub const MIN_CHECKED: &str = "minChecked";
}

/// Parameter compiled from a field attribute.
#[derive(Debug, Clone)]
pub enum RuleParam {
	/// Rule without a parameter.
	Flag,
	/// Character count.
	Length(usize),
	/// Numeric bound.
	Number(f64),
	/// Anchored regular expression.
	Pattern(Regex),
	/// Element id of another field in the same form.
	Field(String),
	/// Element ids of other fields in the same form.
	Fields(Vec<String>),
	/// Number of years.
	Years(u32),
	/// Free-form parameter of a custom rule.
	Text(String),
}

/// What an evaluator can see besides the value.
pub struct RuleContext<'a> {
	/// The field being evaluated.
	pub field: &'a FieldDescriptor,
	/// Values of the other fields in the form.
	pub siblings: &'a dyn SiblingValues,
	/// Today's date in the user's time zone.
	pub today: NaiveDate,
}

/// A named field rule.
pub trait FieldRule {
	/// Evaluates `value` (already trimmed).
	///
	/// Returns `Err(message)` when the value violates the rule.
	fn evaluate(&self, value: &str, param: &RuleParam, ctx: &RuleContext<'_>) -> Result<(), String>;
}

impl<F> FieldRule for F
where
	F: Fn(&str, &RuleParam, &RuleContext<'_>) -> Result<(), String>,
{
	fn evaluate(
		&self,
		value: &str,
		param: &RuleParam,
		ctx: &RuleContext<'_>,
	) -> Result<(), String> {
		self(value, param, ctx)
	}
}

fn message(result: Result<(), ValidationError>) -> Result<(), String> {
	result.map_err(|e| e.to_string())
}

fn mismatched(rule: &str, param: &RuleParam) -> Result<(), String> {
	debug_log!("Rule {} cannot use parameter {:?}", rule, param);
	Ok(())
}

struct Required;

impl FieldRule for Required {
	fn evaluate(&self, value: &str, _: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
		message(v::required(value))
	}
}

struct MinLength;

impl FieldRule for MinLength {
	fn evaluate(&self, value: &str, param: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
		match param {
			RuleParam::Length(min) => message(v::min_length(value, *min)),
			other => mismatched(names::MIN_LENGTH, other),
		}
	}
}

struct MaxLength;

impl FieldRule for MaxLength {
	fn evaluate(&self, value: &str, param: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
		match param {
			RuleParam::Length(max) => message(v::max_length(value, *max)),
			other => mismatched(names::MAX_LENGTH, other),
		}
	}
}

struct MinValue;

impl FieldRule for MinValue {
	fn evaluate(&self, value: &str, param: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
		match param {
			RuleParam::Number(min) => message(v::min_value(value, *min)),
			other => mismatched(names::MIN, other),
		}
	}
}

struct MaxValue;

impl FieldRule for MaxValue {
	fn evaluate(&self, value: &str, param: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
		match param {
			RuleParam::Number(max) => message(v::max_value(value, *max)),
			other => mismatched(names::MAX, other),
		}
	}
}

struct Pattern;

impl FieldRule for Pattern {
	fn evaluate(&self, value: &str, param: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
		match param {
			RuleParam::Pattern(re) => message(v::pattern(value, re)),
			other => mismatched(names::PATTERN, other),
		}
	}
}

/// Rule that only looks at the value.
struct ValueRule(fn(&str) -> Result<(), ValidationError>);

impl FieldRule for ValueRule {
	fn evaluate(&self, value: &str, _: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
		message((self.0)(value))
	}
}

struct DateRule;

impl FieldRule for DateRule {
	fn evaluate(&self, value: &str, _: &RuleParam, ctx: &RuleContext<'_>) -> Result<(), String> {
		message(v::date(value, ctx.today))
	}
}

struct MinAge;

impl FieldRule for MinAge {
	fn evaluate(
		&self,
		value: &str,
		param: &RuleParam,
		ctx: &RuleContext<'_>,
	) -> Result<(), String> {
		match param {
			RuleParam::Years(min) => message(v::min_age(value, *min, ctx.today)),
			other => mismatched(names::MIN_AGE, other),
		}
	}
}

struct Match;

impl FieldRule for Match {
	fn evaluate(
		&self,
		value: &str,
		param: &RuleParam,
		ctx: &RuleContext<'_>,
	) -> Result<(), String> {
		if value.is_empty() {
			return Ok(());
		}
		let RuleParam::Field(target) = param else {
			return mismatched(names::MATCH, param);
		};
		match ctx.siblings.sibling_value(target) {
			None => Err(ValidationError::MatchTargetMissing.to_string()),
			Some(other) if other.trim() != value => Err(ValidationError::Mismatch.to_string()),
			Some(_) => Ok(()),
		}
	}
}

struct Consistency;

impl FieldRule for Consistency {
	fn evaluate(
		&self,
		value: &str,
		param: &RuleParam,
		ctx: &RuleContext<'_>,
	) -> Result<(), String> {
		if value.is_empty() {
			return Ok(());
		}
		let RuleParam::Fields(targets) = param else {
			return mismatched(names::CONSISTENCY, param);
		};
		for target in targets {
			match ctx.siblings.sibling_value(target) {
				None => return Err(ValidationError::MatchTargetMissing.to_string()),
				Some(other) if other.trim().is_empty() => {
					return Err(ValidationError::IncompleteGroup {
						field: target.clone(),
					}
					.to_string());
				}
				Some(_) => {}
			}
		}
		Ok(())
	}
}

struct MinChecked;

impl FieldRule for MinChecked {
	fn evaluate(&self, _: &str, param: &RuleParam, ctx: &RuleContext<'_>) -> Result<(), String> {
		let RuleParam::Length(min) = param else {
			return mismatched(names::MIN_CHECKED, param);
		};
		let Some(group) = ctx.field.name.as_deref() else {
			debug_log!("Rule {} needs a named field", names::MIN_CHECKED);
			return Ok(());
		};
		let checked = ctx
			.siblings
			.group_values(group)
			.iter()
			.filter(|value| !value.trim().is_empty())
			.count();
		message(v::min_selected(checked, *min))
	}
}

/// Name → rule table.
#[derive(Clone)]
pub struct RuleRegistry {
	rules: HashMap<String, Rc<dyn FieldRule>>,
}

impl std::fmt::Debug for RuleRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<_> = self.rules.keys().collect();
		names.sort();
		f.debug_struct("RuleRegistry").field("rules", &names).finish()
	}
}

impl Default for RuleRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

impl RuleRegistry {
	/// Creates a registry without any rule.
	pub fn empty() -> Self {
		Self {
			rules: HashMap::new(),
		}
	}

	/// Creates a registry holding every built-in rule.
	pub fn with_builtins() -> Self {
		let mut registry = Self::empty();
		registry.register(names::REQUIRED, Required);
		registry.register(names::MIN_LENGTH, MinLength);
		registry.register(names::MAX_LENGTH, MaxLength);
		registry.register(names::MIN, MinValue);
		registry.register(names::MAX, MaxValue);
		registry.register(names::PATTERN, Pattern);
		registry.register(names::EMAIL, ValueRule(v::email));
		registry.register(names::CPF, ValueRule(v::cpf));
		registry.register(names::PHONE, ValueRule(v::phone));
		registry.register(names::CEP, ValueRule(v::cep));
		registry.register(names::DATE, DateRule);
		registry.register(names::MATCH, Match);
		registry.register(names::MIN_AGE, MinAge);
		registry.register(names::CONSISTENCY, Consistency);
		registry.register(names::MIN_CHECKED, MinChecked);
		registry
	}

	/// Registers a rule, replacing any rule of the same name.
	pub fn register<R>(&mut self, name: impl Into<String>, rule: R)
	where
		R: FieldRule + 'static,
	{
		self.rules.insert(name.into(), Rc::new(rule));
	}

	/// Gets a rule by name.
	pub fn get(&self, name: &str) -> Option<Rc<dyn FieldRule>> {
		self.rules.get(name).cloned()
	}

	/// Whether a rule named `name` exists.
	pub fn contains(&self, name: &str) -> bool {
		self.rules.contains_key(name)
	}

	/// Evaluates the rule named `name`. Unknown names pass.
	pub fn evaluate(
		&self,
		name: &str,
		value: &str,
		param: &RuleParam,
		ctx: &RuleContext<'_>,
	) -> Result<(), String> {
		match self.rules.get(name) {
			Some(rule) => rule.evaluate(value, param, ctx),
			None => {
				debug_log!("Skipping unknown rule {}", name);
				Ok(())
			}
		}
	}
}
