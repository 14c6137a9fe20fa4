//! Validation error type
//!
//! The `Display` text of each variant is the user-facing message.

use crate::choice::selection_message;
use thiserror::Error;

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
	#[error("Este campo é obrigatório")]
	Required,
	#[error("Mínimo de {min} caracteres")]
	TooShort { min: usize },
	#[error("Máximo de {max} caracteres")]
	TooLong { max: usize },
	#[error("Valor mínimo: {min}")]
	BelowMinimum { min: f64 },
	#[error("Valor máximo: {max}")]
	AboveMaximum { max: f64 },
	#[error("Formato inválido")]
	PatternMismatch,

	#[error("Email inválido")]
	InvalidEmail,
	#[error("Parte local do email muito longa")]
	EmailLocalPartTooLong,
	#[error("Domínio do email muito longo")]
	EmailDomainTooLong,
	#[error("Domínio do email inválido")]
	EmailDomainLabel,

	#[error("CPF deve ter 11 dígitos")]
	CpfLength,
	#[error("CPF inválido")]
	CpfRepeatedDigits,
	#[error("CPF inválido (primeiro dígito verificador)")]
	CpfFirstCheckDigit,
	#[error("CPF inválido (segundo dígito verificador)")]
	CpfSecondCheckDigit,

	#[error("Telefone deve ter 10 ou 11 dígitos")]
	PhoneLength,
	#[error("DDD inválido")]
	PhoneAreaCode,

	#[error("CEP deve ter 8 dígitos")]
	CepLength,

	#[error("Data inválida")]
	InvalidDate,
	#[error("Data não pode estar no futuro")]
	FutureDate,
	#[error("Data muito antiga")]
	DateTooOld,
	#[error("Idade mínima: {min} anos")]
	BelowMinimumAge { min: u32 },

	#[error("Campo de comparação não encontrado")]
	MatchTargetMissing,
	#[error("Os campos não coincidem")]
	Mismatch,
	#[error("Preencha também o campo {field}")]
	IncompleteGroup { field: String },

	#[error("{}", selection_message(.min))]
	TooFewSelected { min: usize },
}

/// Result type for validators
pub type ValidationResult<T> = Result<T, ValidationError>;
