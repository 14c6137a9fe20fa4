//! Numeric bound validators
//!
//! Values that do not start with a number pass both bounds; format belongs to
//! other rules.

use crate::{ValidationError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
		.unwrap_or_else(|e| panic!("Invalid number pattern: {}", e))
});

/// Reads the number a value starts with, ignoring leading whitespace and
/// any trailing text: `"17 anos"` is 17 and `"1,5"` is 1.
///
/// ```
/// use voluntar_validators::parse_number;
///
/// assert_eq!(parse_number(" 2.5e1kg"), Some(25.0));
/// assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
/// assert_eq!(parse_number("R$ 10"), None);
/// ```
pub fn parse_number(value: &str) -> Option<f64> {
	let found = LEADING_NUMBER.find(value.trim_start())?;
	let text = found.as_str();
	text.strip_suffix('.')
		.unwrap_or(text)
		.parse::<f64>()
		.ok()
}

/// Lower bound.
pub fn min_value(value: &str, min: f64) -> ValidationResult<()> {
	match parse_number(value) {
		Some(n) if n < min => Err(ValidationError::BelowMinimum { min }),
		_ => Ok(()),
	}
}

/// Upper bound.
pub fn max_value(value: &str, max: f64) -> ValidationResult<()> {
	match parse_number(value) {
		Some(n) if n > max => Err(ValidationError::AboveMaximum { max }),
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("17", Err(ValidationError::BelowMinimum { min: 18.0 }))]
	#[case("18", Ok(()))]
	#[case("18.5", Ok(()))]
	#[case("", Ok(()))]
	#[case("dezoito", Ok(()))]
	#[case("17 anos", Err(ValidationError::BelowMinimum { min: 18.0 }))]
	#[case("18 anos", Ok(()))]
	#[case("17,9", Err(ValidationError::BelowMinimum { min: 18.0 }))]
	fn test_min_value(#[case] value: &str, #[case] expected: ValidationResult<()>) {
		assert_eq!(min_value(value, 18.0), expected);
	}

	#[rstest]
	#[case("100", Ok(()))]
	#[case("100.01", Err(ValidationError::AboveMaximum { max: 100.0 }))]
	#[case("-5", Ok(()))]
	#[case("NaN", Ok(()))]
	fn test_max_value(#[case] value: &str, #[case] expected: ValidationResult<()>) {
		assert_eq!(max_value(value, 100.0), expected);
	}

	#[rstest]
	#[case("1,5", Some(1.0))]
	#[case("  42", Some(42.0))]
	#[case(".5", Some(0.5))]
	#[case("7.", Some(7.0))]
	#[case("+3e2x", Some(300.0))]
	#[case("3e", Some(3.0))]
	#[case("Infinity", Some(f64::INFINITY))]
	#[case("-", None)]
	#[case("e5", None)]
	#[case("NaN", None)]
	fn test_parse_number_reads_leading_number(
		#[case] value: &str,
		#[case] expected: Option<f64>,
	) {
		assert_eq!(parse_number(value), expected);
	}

	#[rstest]
	fn test_decimal_comma_uses_integer_part() {
		assert_eq!(min_value("1,5", 2.0), Err(ValidationError::BelowMinimum { min: 2.0 }));
	}
}
