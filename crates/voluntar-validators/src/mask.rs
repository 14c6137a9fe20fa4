//! Input masks applied while the user types
//!
//! Masks only reformat; they never reject input. Digits beyond the length
//! of the document are dropped.

use crate::digits::only_digits;
use std::str::FromStr;

/// Mask selected by a field's `data-mask` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
	/// `000.000.000-00`
	Cpf,
	/// `00000-000`
	Cep,
	/// `(00) 0000-0000` or `(00) 00000-0000`
	Phone,
}

impl MaskKind {
	/// Formats `value` with this mask.
	pub fn apply(self, value: &str) -> String {
		match self {
			Self::Cpf => format_cpf(value),
			Self::Cep => format_cep(value),
			Self::Phone => format_phone(value),
		}
	}
}

impl FromStr for MaskKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"cpf" => Ok(Self::Cpf),
			"cep" => Ok(Self::Cep),
			"phone" | "telefone" => Ok(Self::Phone),
			other => Err(format!("Unknown mask: {}", other)),
		}
	}
}

fn truncated_digits(value: &str, max: usize) -> String {
	only_digits(value).chars().take(max).collect()
}

/// ```
/// use voluntar_validators::format_cpf;
///
/// assert_eq!(format_cpf("52998224725"), "529.982.247-25");
/// assert_eq!(format_cpf("5299"), "529.9");
/// ```
pub fn format_cpf(value: &str) -> String {
	let d = truncated_digits(value, 11);
	match d.len() {
		0..=3 => d,
		4..=6 => format!("{}.{}", &d[..3], &d[3..]),
		7..=9 => format!("{}.{}.{}", &d[..3], &d[3..6], &d[6..]),
		_ => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
	}
}

/// ```
/// use voluntar_validators::format_cep;
///
/// assert_eq!(format_cep("01310100"), "01310-100");
/// ```
pub fn format_cep(value: &str) -> String {
	let d = truncated_digits(value, 8);
	if d.len() > 5 {
		format!("{}-{}", &d[..5], &d[5..])
	} else {
		d
	}
}

/// ```
/// use voluntar_validators::format_phone;
///
/// assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
/// assert_eq!(format_phone("1134567890"), "(11) 3456-7890");
/// ```
pub fn format_phone(value: &str) -> String {
	let d = truncated_digits(value, 11);
	match d.len() {
		0..=2 => d,
		3..=6 => format!("({}) {}", &d[..2], &d[2..]),
		7..=10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
		_ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "")]
	#[case("529", "529")]
	#[case("5299822", "529.982.2")]
	#[case("5299822472", "529.982.247-2")]
	#[case("529.982.247-25", "529.982.247-25")]
	#[case("529982247251234", "529.982.247-25")]
	fn test_format_cpf(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(format_cpf(input), expected);
	}

	#[rstest]
	#[case("01310", "01310")]
	#[case("013101", "01310-1")]
	#[case("01310-100", "01310-100")]
	fn test_format_cep(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(format_cep(input), expected);
	}

	#[rstest]
	#[case("11", "11")]
	#[case("119", "(11) 9")]
	#[case("1198765", "(11) 9876-5")]
	#[case("(11) 98765-4321", "(11) 98765-4321")]
	fn test_format_phone(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(format_phone(input), expected);
	}

	#[rstest]
	fn test_mask_kind_parse() {
		assert_eq!("cpf".parse::<MaskKind>(), Ok(MaskKind::Cpf));
		assert_eq!("Telefone".parse::<MaskKind>(), Ok(MaskKind::Phone));
		assert!("rg".parse::<MaskKind>().is_err());
	}
}
