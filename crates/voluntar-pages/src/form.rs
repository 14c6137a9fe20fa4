//! Declarative form validation
//!
//! Forms opt in with the `data-validate` attribute. Each field declares its
//! rules as attributes:
//!
//! | Attribute | Rule |
//! |-----------|------|
//! | `required` | non-empty |
//! | `minlength` / `maxlength` | length bounds |
//! | `min` / `max` | numeric bounds |
//! | `pattern` | full-match regular expression |
//! | `data-validate-email` / `-cpf` / `-phone` / `-cep` / `-date` | format checks |
//! | `data-validate-match="<id>"` | same value as another field |
//! | `data-validate-min-age="<years>"` | minimum age for a birth date |
//! | `data-validate-consistency="<id>,<id>"` | other fields required once this one is filled |
//! | `data-validate-min-checked="<n>"` | at least `n` checked boxes sharing this field's `name` (default 1) |
//! | `data-rule-<name>="<param>"` | custom rule registered on the engine |
//!
//! `data-mask` formats input as it is typed and `data-lookup="cep"` fills
//! the address fields from the postal code, then focuses `#numero` (or the
//! id given in `data-fill-focus`).
//!
//! ## Example
//!
//! ```ignore
//! use voluntar_pages::form::{RuleContext, RuleParam, RuleRegistry, ValidationEngine};
//! use std::rc::Rc;
//!
//! fn even(value: &str, _: &RuleParam, _: &RuleContext<'_>) -> Result<(), String> {
//!     match value.parse::<u32>() {
//!         Ok(n) if n % 2 == 1 => Err("Informe um número par".to_string()),
//!         _ => Ok(()),
//!     }
//! }
//!
//! let mut registry = RuleRegistry::with_builtins();
//! registry.register("even", even);
//!
//! let engine = ValidationEngine::builder(Rc::new(BrowserForms::new()?), Rc::new(TimeoutScheduler))
//!     .registry(registry)
//!     .build();
//! engine.scan();
//! ```

#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod dom;
pub mod engine;
pub mod lookup;
pub mod rules;
pub mod schema;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserForms, FormListeners};
pub use dom::{AlertKind, FieldDescriptor, FieldFeedback, FieldKey, FormDom, FormKey, SiblingValues};
pub use engine::{SubmitOutcome, ValidationEngine, ValidationEngineBuilder};
pub use lookup::{Address, AddressLookup, LookupError, ViaCepClient, parse_response};
pub use rules::{FieldRule, RuleContext, RuleParam, RuleRegistry, names};
pub use schema::{CUSTOM_RULE_PREFIX, FieldSchema, LookupTargets};
pub use state::{FieldSnapshot, FieldStatus};
