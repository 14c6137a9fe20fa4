//! Compiles a field's declared attributes into the rules it is checked against.

use super::dom::FieldDescriptor;
use super::rules::{RuleParam, RuleRegistry, names};
use crate::{debug_log, warn_log};
use voluntar_validators::MaskKind;
use voluntar_validators::numeric::parse_number;
use voluntar_validators::string::compile_pattern;

/// Prefix of attributes declaring custom rules (`data-rule-<name>`).
pub const CUSTOM_RULE_PREFIX: &str = "data-rule-";

/// Ids of the fields an address lookup fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTargets {
	/// Street (`logradouro`).
	pub street: String,
	/// District (`bairro`).
	pub district: String,
	/// City (`localidade`).
	pub city: String,
	/// State (`uf`).
	pub state: String,
	/// Field focused once the address is filled in.
	pub focus: String,
}

impl Default for LookupTargets {
	fn default() -> Self {
		Self {
			street: "endereco".to_string(),
			district: "bairro".to_string(),
			city: "cidade".to_string(),
			state: "estado".to_string(),
			focus: "numero".to_string(),
		}
	}
}

impl LookupTargets {
	fn from_field(field: &FieldDescriptor) -> Self {
		let defaults = Self::default();
		let pick = |attr: &str, default: String| {
			field
				.attr(attr)
				.map(str::trim)
				.filter(|id| !id.is_empty())
				.map(str::to_string)
				.unwrap_or(default)
		};
		Self {
			street: pick("data-fill-street", defaults.street),
			district: pick("data-fill-district", defaults.district),
			city: pick("data-fill-city", defaults.city),
			state: pick("data-fill-state", defaults.state),
			focus: pick("data-fill-focus", defaults.focus),
		}
	}
}

/// Everything compiled from one field's attributes.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
	/// Rules in declaration order.
	pub rules: Vec<(String, RuleParam)>,
	/// Mask applied on input.
	pub mask: Option<MaskKind>,
	/// Address lookup triggered on blur.
	pub lookup: Option<LookupTargets>,
}

impl FieldSchema {
	/// Compiles `field` against the rules known to `registry`.
	///
	/// Malformed parameters are dropped with a warning; rules the registry
	/// does not know are skipped.
	pub fn compile(field: &FieldDescriptor, registry: &RuleRegistry) -> Self {
		let mut rules = Vec::new();
		let mut push = |name: &str, param: RuleParam| {
			if registry.contains(name) {
				rules.push((name.to_string(), param));
			} else {
				debug_log!("Field {:?} declares unknown rule {}", field.id, name);
			}
		};

		if field.has_attr("required") {
			push(names::REQUIRED, RuleParam::Flag);
		}
		if let Some(min) = parsed_length(field, "minlength") {
			push(names::MIN_LENGTH, RuleParam::Length(min));
		}
		if let Some(max) = parsed_length(field, "maxlength") {
			push(names::MAX_LENGTH, RuleParam::Length(max));
		}
		if let Some(min) = parsed_number(field, "min") {
			push(names::MIN, RuleParam::Number(min));
		}
		if let Some(max) = parsed_number(field, "max") {
			push(names::MAX, RuleParam::Number(max));
		}
		if let Some(source) = field.attr("pattern") {
			match compile_pattern(source) {
				Ok(re) => push(names::PATTERN, RuleParam::Pattern(re)),
				Err(e) => warn_log!("Dropping pattern '{}' of {:?}: {}", source, field.id, e),
			}
		}

		for (attr, name) in [
			("data-validate-email", names::EMAIL),
			("data-validate-cpf", names::CPF),
			("data-validate-phone", names::PHONE),
			("data-validate-cep", names::CEP),
			("data-validate-date", names::DATE),
		] {
			if field.flag(attr) {
				push(name, RuleParam::Flag);
			}
		}

		if let Some(target) = field
			.attr("data-validate-match")
			.map(str::trim)
			.filter(|t| !t.is_empty())
		{
			push(names::MATCH, RuleParam::Field(target.to_string()));
		}
		if let Some(list) = field.attr("data-validate-consistency") {
			let targets: Vec<String> = list
				.split(',')
				.map(str::trim)
				.filter(|t| !t.is_empty())
				.map(str::to_string)
				.collect();
			if !targets.is_empty() {
				push(names::CONSISTENCY, RuleParam::Fields(targets));
			}
		}
		if let Some(years) = field.attr("data-validate-min-age") {
			match years.trim().parse::<u32>() {
				Ok(years) => push(names::MIN_AGE, RuleParam::Years(years)),
				Err(_) => warn_log!("Ignoring min age '{}' of {:?}", years, field.id),
			}
		}

		if let Some(raw) = field.attr("data-validate-min-checked") {
			match raw.trim() {
				"" => push(names::MIN_CHECKED, RuleParam::Length(1)),
				count => match count.parse::<usize>() {
					Ok(min) => push(names::MIN_CHECKED, RuleParam::Length(min)),
					Err(_) => warn_log!("Ignoring min checked '{}' of {:?}", raw, field.id),
				},
			}
		}

		for (attr, value) in &field.attributes {
			if let Some(name) = attr.strip_prefix(CUSTOM_RULE_PREFIX) {
				let param = if value.is_empty() {
					RuleParam::Flag
				} else {
					RuleParam::Text(value.clone())
				};
				push(name, param);
			}
		}

		let mask = field.attr("data-mask").and_then(|m| match m.parse::<MaskKind>() {
			Ok(mask) => Some(mask),
			Err(e) => {
				warn_log!("{} on {:?}", e, field.id);
				None
			}
		});

		let lookup = field
			.attr("data-lookup")
			.filter(|kind| kind.trim().eq_ignore_ascii_case("cep"))
			.map(|_| LookupTargets::from_field(field));

		Self {
			rules,
			mask,
			lookup,
		}
	}

	/// Names of the compiled rules, in evaluation order.
	pub fn rule_names(&self) -> Vec<&str> {
		self.rules.iter().map(|(name, _)| name.as_str()).collect()
	}
}

fn parsed_length(field: &FieldDescriptor, attr: &str) -> Option<usize> {
	let raw = field.attr(attr)?;
	match raw.trim().parse::<usize>() {
		Ok(n) => Some(n),
		Err(_) => {
			warn_log!("Ignoring {}='{}' of {:?}", attr, raw, field.id);
			None
		}
	}
}

fn parsed_number(field: &FieldDescriptor, attr: &str) -> Option<f64> {
	let raw = field.attr(attr)?;
	let parsed = parse_number(raw);
	if parsed.is_none() {
		warn_log!("Ignoring {}='{}' of {:?}", attr, raw, field.id);
	}
	parsed
}
