//! Presence, length and format validators

use crate::{ValidationError, ValidationResult};
use regex::Regex;

/// Fails iff the value is empty.
///
/// ```
/// use voluntar_validators::required;
///
/// assert!(required("Maria").is_ok());
/// assert!(required("").is_err());
/// ```
pub fn required(value: &str) -> ValidationResult<()> {
	if value.is_empty() {
		Err(ValidationError::Required)
	} else {
		Ok(())
	}
}

/// Minimum length in characters, enforced only for non-empty values.
pub fn min_length(value: &str, min: usize) -> ValidationResult<()> {
	let length = value.chars().count();
	if length > 0 && length < min {
		Err(ValidationError::TooShort { min })
	} else {
		Ok(())
	}
}

/// Maximum length in characters.
pub fn max_length(value: &str, max: usize) -> ValidationResult<()> {
	if value.chars().count() > max {
		Err(ValidationError::TooLong { max })
	} else {
		Ok(())
	}
}

/// Compiles an HTML `pattern` attribute so that it has to match the whole value.
///
/// ```
/// use voluntar_validators::string::compile_pattern;
///
/// let re = compile_pattern(r"\d{3}").unwrap();
/// assert!(re.is_match("123"));
/// assert!(!re.is_match("1234"));
/// ```
pub fn compile_pattern(source: &str) -> Result<Regex, regex::Error> {
	Regex::new(&format!("^(?:{})$", source))
}

/// Format check against a compiled pattern, enforced only for non-empty values.
pub fn pattern(value: &str, re: &Regex) -> ValidationResult<()> {
	if value.is_empty() || re.is_match(value) {
		Ok(())
	} else {
		Err(ValidationError::PatternMismatch)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", false)]
	#[case("a", true)]
	#[case("  x  ", true)]
	fn test_required(#[case] value: &str, #[case] ok: bool) {
		assert_eq!(required(value).is_ok(), ok);
	}

	#[rstest]
	fn test_min_length_ignores_empty() {
		assert!(min_length("", 5).is_ok());
		assert_eq!(min_length("abc", 5), Err(ValidationError::TooShort { min: 5 }));
		assert!(min_length("abcde", 5).is_ok());
	}

	#[rstest]
	fn test_lengths_count_characters() {
		assert!(max_length("ação", 4).is_ok());
		assert!(min_length("ção", 3).is_ok());
		assert_eq!(max_length("ações", 4), Err(ValidationError::TooLong { max: 4 }));
	}

	#[rstest]
	fn test_pattern_matches_whole_value() {
		let re = compile_pattern("[A-Z]{2}").unwrap();
		assert!(pattern("SP", &re).is_ok());
		assert!(pattern("", &re).is_ok());
		assert_eq!(pattern("xSPx", &re), Err(ValidationError::PatternMismatch));
	}

	#[rstest]
	fn test_pattern_alternation_is_grouped() {
		let re = compile_pattern("a|b").unwrap();
		assert!(re.is_match("a"));
		assert!(!re.is_match("ab"));
	}

	#[rstest]
	fn test_invalid_pattern_is_an_error() {
		assert!(compile_pattern("(unclosed").is_err());
	}
}
