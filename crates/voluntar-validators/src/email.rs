//! Email address validator

use crate::{ValidationError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_LOCAL_PART: usize = 64;
const MAX_DOMAIN: usize = 255;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
		.unwrap_or_else(|e| panic!("Invalid email pattern: {}", e))
});

/// Validates an email address.
///
/// The shape check requires exactly one `@` and a dotted domain. The local
/// part may not exceed 64 characters, the domain 255, and the domain may not
/// contain an empty label (`a@b..com`).
///
/// ```
/// use voluntar_validators::email;
///
/// assert!(email("a@b.com").is_ok());
/// assert!(email("a@@b.com").is_err());
/// assert!(email("").is_ok());
/// ```
pub fn email(value: &str) -> ValidationResult<()> {
	if value.is_empty() {
		return Ok(());
	}
	if !EMAIL_SHAPE.is_match(value) {
		return Err(ValidationError::InvalidEmail);
	}

	// The shape guarantees exactly one '@'.
	let (local, domain) = value
		.split_once('@')
		.ok_or(ValidationError::InvalidEmail)?;

	if local.chars().count() > MAX_LOCAL_PART {
		return Err(ValidationError::EmailLocalPartTooLong);
	}
	if domain.chars().count() > MAX_DOMAIN {
		return Err(ValidationError::EmailDomainTooLong);
	}
	if domain.split('.').any(str::is_empty) {
		return Err(ValidationError::EmailDomainLabel);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("a@b.com")]
	#[case("voluntario.silva+ong@exemplo.org.br")]
	fn test_valid(#[case] value: &str) {
		assert!(email(value).is_ok());
	}

	#[rstest]
	#[case("a@@b.com", ValidationError::InvalidEmail)]
	#[case("sem-arroba.com", ValidationError::InvalidEmail)]
	#[case("a@semponto", ValidationError::InvalidEmail)]
	#[case("a b@c.com", ValidationError::InvalidEmail)]
	#[case("a@b..com", ValidationError::EmailDomainLabel)]
	#[case("a@b.com.", ValidationError::EmailDomainLabel)]
	fn test_invalid(#[case] value: &str, #[case] expected: ValidationError) {
		assert_eq!(email(value), Err(expected));
	}

	#[rstest]
	fn test_long_local_part() {
		let value = format!("{}@b.com", "a".repeat(70));
		assert_eq!(email(&value), Err(ValidationError::EmailLocalPartTooLong));

		let value = format!("{}@b.com", "a".repeat(64));
		assert!(email(&value).is_ok());
	}

	#[rstest]
	fn test_long_domain() {
		let value = format!("a@{}.com", "b".repeat(260));
		assert_eq!(email(&value), Err(ValidationError::EmailDomainTooLong));
	}
}
