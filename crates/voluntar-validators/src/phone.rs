//! Brazilian phone number validator

use crate::digits::only_digits;
use crate::{ValidationError, ValidationResult};

/// Validates a landline (10 digits) or mobile (11 digits) number with area code.
///
/// ```
/// use voluntar_validators::phone;
///
/// assert!(phone("(11) 98765-4321").is_ok());
/// assert!(phone("(05) 98765-4321").is_err());
/// ```
pub fn phone(value: &str) -> ValidationResult<()> {
	if value.is_empty() {
		return Ok(());
	}

	let digits = only_digits(value);
	if !(10..=11).contains(&digits.len()) {
		return Err(ValidationError::PhoneLength);
	}

	let area_code: u32 = digits[..2]
		.parse()
		.map_err(|_| ValidationError::PhoneAreaCode)?;
	if !(11..=99).contains(&area_code) {
		return Err(ValidationError::PhoneAreaCode);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", Ok(()))]
	#[case("(11) 3456-7890", Ok(()))]
	#[case("21987654321", Ok(()))]
	#[case("(99) 99999-9999", Ok(()))]
	#[case("3456-7890", Err(ValidationError::PhoneLength))]
	#[case("+55 11 98765-4321", Err(ValidationError::PhoneLength))]
	#[case("(10) 98765-4321", Err(ValidationError::PhoneAreaCode))]
	#[case("0198765432", Err(ValidationError::PhoneAreaCode))]
	fn test_phone(#[case] value: &str, #[case] expected: ValidationResult<()>) {
		assert_eq!(phone(value), expected);
	}
}
