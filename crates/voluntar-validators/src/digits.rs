//! Digit extraction shared by the document, phone and postal validators.

/// Returns the ASCII digits of `value`, dropping punctuation and spaces.
///
/// ```
/// use voluntar_validators::only_digits;
///
/// assert_eq!(only_digits("123.456.789-09"), "12345678909");
/// ```
pub fn only_digits(value: &str) -> String {
	value.chars().filter(char::is_ascii_digit).collect()
}

/// Digit values of an all-digit string.
pub(crate) fn digit_values(digits: &str) -> Vec<u32> {
	digits.chars().filter_map(|c| c.to_digit(10)).collect()
}
