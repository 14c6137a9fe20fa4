//! Field rules and input masks
//!
//! DOM-free checks behind the form validation engine. Every error's
//! `Display` text is the Portuguese message shown under the field.

// Re-export all voluntar-validators functionality
pub use voluntar_validators::*;
