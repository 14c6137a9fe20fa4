//! CEP (Código de Endereçamento Postal) validator

use crate::digits::only_digits;
use crate::{ValidationError, ValidationResult};

/// Number of digits in a CEP.
pub const CEP_LENGTH: usize = 8;

/// Validates that a CEP has exactly eight digits once punctuation is removed.
pub fn cep(value: &str) -> ValidationResult<()> {
	if value.is_empty() || only_digits(value).len() == CEP_LENGTH {
		Ok(())
	} else {
		Err(ValidationError::CepLength)
	}
}

/// Returns the bare eight digits of a CEP, or `None` when it is incomplete.
pub fn normalize_cep(value: &str) -> Option<String> {
	let digits = only_digits(value);
	(digits.len() == CEP_LENGTH).then_some(digits)
}
