//! CPF (Cadastro de Pessoas Físicas) validator
//!
//! A CPF has nine base digits followed by two check digits. Each check digit
//! is `11 - (weighted_sum mod 11)`, forced to `0` when the result is 10 or
//! 11. The first uses weights 10 down to 2 over the base digits, the second
//! weights 11 down to 2 over the base digits plus the first check digit.

use crate::digits::{digit_values, only_digits};
use crate::{ValidationError, ValidationResult};

const CPF_LENGTH: usize = 11;

/// Computes the check digit for `digits`, weighting the first digit with
/// `digits.len() + 1`.
pub fn check_digit(digits: &[u32]) -> u32 {
	let top = digits.len() as u32 + 1;
	let sum: u32 = digits
		.iter()
		.enumerate()
		.map(|(i, d)| d * (top - i as u32))
		.sum();
	let digit = 11 - (sum % 11);
	if digit >= 10 { 0 } else { digit }
}

/// Validates a CPF, formatted or not.
///
/// ```
/// use voluntar_validators::cpf;
///
/// assert!(cpf("529.982.247-25").is_ok());
/// assert!(cpf("52998224724").is_err());
/// ```
pub fn cpf(value: &str) -> ValidationResult<()> {
	if value.is_empty() {
		return Ok(());
	}

	let digits = only_digits(value);
	if digits.len() != CPF_LENGTH {
		return Err(ValidationError::CpfLength);
	}

	let values = digit_values(&digits);
	if values.iter().all(|d| *d == values[0]) {
		return Err(ValidationError::CpfRepeatedDigits);
	}
	if check_digit(&values[..9]) != values[9] {
		return Err(ValidationError::CpfFirstCheckDigit);
	}
	if check_digit(&values[..10]) != values[10] {
		return Err(ValidationError::CpfSecondCheckDigit);
	}
	Ok(())
}
