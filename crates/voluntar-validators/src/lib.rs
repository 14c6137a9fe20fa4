//! Field validators for VôLuntar forms
//!
//! This crate holds the DOM-free half of form validation: one function per
//! rule, each taking the already-trimmed field value and returning
//! [`ValidationResult`]. The messages carried by [`ValidationError`] are the
//! ones shown to users next to the field.
//!
//! Every validator except [`required`] lets an empty value through. Emptiness
//! is owned by `required`, so a field declaring several rules reports exactly
//! one message when left blank.
//!
//! ## Example
//!
//! ```
//! use voluntar_validators::{cpf, email, ValidationError};
//!
//! assert!(email("voluntario@exemplo.org").is_ok());
//! assert_eq!(cpf("111.111.111-11"), Err(ValidationError::CpfRepeatedDigits));
//! ```

pub mod choice;
pub mod date;
pub mod digits;
pub mod document;
pub mod email;
pub mod errors;
pub mod mask;
pub mod numeric;
pub mod phone;
pub mod postal;
pub mod string;

pub use choice::min_selected;
pub use date::{date, min_age, parse_date};
pub use digits::only_digits;
pub use document::cpf;
pub use email::email;
pub use errors::{ValidationError, ValidationResult};
pub use mask::{MaskKind, format_cep, format_cpf, format_phone};
pub use numeric::{max_value, min_value, parse_number};
pub use phone::phone;
pub use postal::cep;
pub use string::{max_length, min_length, pattern, required};

/// Re-export commonly used items
pub mod prelude {
	pub use crate::choice::*;
	pub use crate::date::*;
	pub use crate::document::*;
	pub use crate::email::*;
	pub use crate::errors::*;
	pub use crate::mask::*;
	pub use crate::numeric::*;
	pub use crate::phone::*;
	pub use crate::postal::*;
	pub use crate::string::*;
}
