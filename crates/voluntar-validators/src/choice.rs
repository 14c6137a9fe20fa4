//! Checkbox group validators

use crate::{ValidationError, ValidationResult};

/// Requires at least `min` checked boxes in a group.
///
/// ```
/// use voluntar_validators::{min_selected, ValidationError};
///
/// assert!(min_selected(1, 1).is_ok());
/// assert_eq!(min_selected(0, 1), Err(ValidationError::TooFewSelected { min: 1 }));
/// ```
pub fn min_selected(checked: usize, min: usize) -> ValidationResult<()> {
	if checked < min {
		Err(ValidationError::TooFewSelected { min })
	} else {
		Ok(())
	}
}

pub(crate) fn selection_message(min: &usize) -> String {
	match min {
		1 => "Selecione pelo menos uma opção".to_string(),
		n => format!("Selecione pelo menos {} opções", n),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, 1, false)]
	#[case(1, 1, true)]
	#[case(3, 1, true)]
	#[case(1, 2, false)]
	#[case(0, 0, true)]
	fn test_min_selected(#[case] checked: usize, #[case] min: usize, #[case] ok: bool) {
		assert_eq!(min_selected(checked, min).is_ok(), ok);
	}

	#[rstest]
	#[case(1, "Selecione pelo menos uma opção")]
	#[case(2, "Selecione pelo menos 2 opções")]
	fn test_message(#[case] min: usize, #[case] expected: &str) {
		assert_eq!(ValidationError::TooFewSelected { min }.to_string(), expected);
	}
}
