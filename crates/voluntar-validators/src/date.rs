//! Calendar date validators
//!
//! Both validators take `today` explicitly so that callers decide which
//! clock applies (the browser's local date in production, a fixed date in
//! tests).

use crate::{ValidationError, ValidationResult};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};

/// Oldest accepted date, in years before today.
pub const MAX_AGE_YEARS: u32 = 120;

/// Local date-time layouts submitted by `<input type="datetime-local">`.
const LOCAL_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses `YYYY-MM-DD` (what `<input type="date">` submits), a local
/// `YYYY-MM-DDTHH:MM[:SS]` date-time, an RFC 3339 timestamp, or the
/// Brazilian `DD/MM/YYYY` form.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
	let value = value.trim();
	NaiveDate::parse_from_str(value, "%Y-%m-%d")
		.ok()
		.or_else(|| {
			LOCAL_DATE_TIME_FORMATS.iter().find_map(|format| {
				NaiveDateTime::parse_from_str(value, format)
					.ok()
					.map(|dt| dt.date())
			})
		})
		.or_else(|| {
			DateTime::parse_from_rfc3339(value)
				.ok()
				.map(|dt| dt.date_naive())
		})
		.or_else(|| NaiveDate::parse_from_str(value, "%d/%m/%Y").ok())
}

/// Validates a past date no older than [`MAX_AGE_YEARS`].
///
/// ```
/// use chrono::NaiveDate;
/// use voluntar_validators::{date, ValidationError};
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// assert!(date("1990-05-20", today).is_ok());
/// assert_eq!(date("2030-01-01", today), Err(ValidationError::FutureDate));
/// ```
pub fn date(value: &str, today: NaiveDate) -> ValidationResult<()> {
	if value.is_empty() {
		return Ok(());
	}

	let parsed = parse_date(value).ok_or(ValidationError::InvalidDate)?;
	if parsed > today {
		return Err(ValidationError::FutureDate);
	}
	match today.checked_sub_months(Months::new(MAX_AGE_YEARS * 12)) {
		Some(oldest) if parsed < oldest => Err(ValidationError::DateTooOld),
		_ => Ok(()),
	}
}

/// Completed years between `born` and `today`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
	let mut age = today.year() - born.year();
	if (today.month(), today.day()) < (born.month(), born.day()) {
		age -= 1;
	}
	age
}

/// Requires a minimum completed age. Unparseable dates pass; `date` reports them.
pub fn min_age(value: &str, min: u32, today: NaiveDate) -> ValidationResult<()> {
	match parse_date(value) {
		Some(born) if age_on(born, today) < min as i32 => {
			Err(ValidationError::BelowMinimumAge { min })
		}
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn today() -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
	}

	#[rstest]
	#[case("2000-01-31")]
	#[case("31/01/2000")]
	#[case("2000-01-31T10:00:00-03:00")]
	#[case("2000-01-31T10:00")]
	#[case("2000-01-31T10:00:45")]
	#[case("2000-01-31T10:00:45.250")]
	fn test_parse_formats(#[case] value: &str) {
		assert_eq!(parse_date(value), NaiveDate::from_ymd_opt(2000, 1, 31));
	}

	#[rstest]
	#[case("", Ok(()))]
	#[case("2024-06-15", Ok(()))]
	#[case("2024-06-16", Err(ValidationError::FutureDate))]
	#[case("1904-06-15", Ok(()))]
	#[case("1904-06-14", Err(ValidationError::DateTooOld))]
	#[case("2023-02-30", Err(ValidationError::InvalidDate))]
	#[case("ontem", Err(ValidationError::InvalidDate))]
	#[case("2000-01-31T10:00", Ok(()))]
	#[case("2024-06-16T00:30", Err(ValidationError::FutureDate))]
	#[case("2000-01-31T25:00", Err(ValidationError::InvalidDate))]
	fn test_date(today: NaiveDate, #[case] value: &str, #[case] expected: ValidationResult<()>) {
		assert_eq!(date(value, today), expected);
	}

	#[rstest]
	fn test_age_on_birthday_boundary(today: NaiveDate) {
		let born = NaiveDate::from_ymd_opt(2008, 6, 15).unwrap();
		assert_eq!(age_on(born, today), 16);
		let born = NaiveDate::from_ymd_opt(2008, 6, 16).unwrap();
		assert_eq!(age_on(born, today), 15);
	}

	#[rstest]
	fn test_min_age(today: NaiveDate) {
		assert!(min_age("2008-06-15", 16, today).is_ok());
		assert_eq!(
			min_age("2008-06-16", 16, today),
			Err(ValidationError::BelowMinimumAge { min: 16 })
		);
		assert!(min_age("not a date", 16, today).is_ok());
	}
}
