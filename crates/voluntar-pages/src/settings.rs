//! Front-end settings
//!
//! Settings default to the constants the site ships with. A page can
//! override any subset by embedding a JSON block:
//!
//! ```html
//! <script type="application/json" id="pages-settings">
//!   { "forms": { "debounce_ms": 500 } }
//! </script>
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Placeholder replaced by the bare CEP digits in [`LookupSettings::endpoint`].
pub const CEP_PLACEHOLDER: &str = "{cep}";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The JSON block could not be parsed.
	#[error("Invalid settings JSON: {0}")]
	Parse(#[from] serde_json::Error),
	/// A value is out of range.
	#[error("Invalid setting '{key}': {reason}")]
	Invalid {
		/// Dotted setting path.
		key: &'static str,
		/// What is wrong with it.
		reason: String,
	},
}

/// Root settings structure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PagesSettings {
	/// Navigation controller settings.
	pub router: RouterSettings,
	/// Validation engine settings.
	pub forms: FormSettings,
	/// Address lookup settings.
	pub lookup: LookupSettings,
}

/// Navigation controller settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouterSettings {
	/// Id of the element whose content is swapped.
	pub container_id: String,
	/// Delay between fade-out and swap, in milliseconds. `0` disables it.
	pub transition_delay_ms: u64,
	/// Classes identifying navigation links that receive the active marker.
	pub nav_link_classes: Vec<String>,
	/// Class marking the link of the current route.
	pub active_class: String,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			container_id: "spa-content".to_string(),
			transition_delay_ms: 200,
			nav_link_classes: vec!["nav-link".to_string(), "nav-link-hero".to_string()],
			active_class: "active".to_string(),
		}
	}
}

impl RouterSettings {
	/// Transition delay as a [`Duration`].
	pub fn transition_delay(&self) -> Duration {
		Duration::from_millis(self.transition_delay_ms)
	}
}

/// Validation engine settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormSettings {
	/// Attribute a form must carry to be validated.
	pub marker_attribute: String,
	/// Quiet period before re-validating a touched field, in milliseconds.
	pub debounce_ms: u64,
	/// Delay before a successfully submitted form is reset, in milliseconds.
	pub reset_delay_ms: u64,
	/// Lifetime of a form alert, in milliseconds.
	pub alert_timeout_ms: u64,
	/// Alert shown when submission is blocked.
	pub invalid_message: String,
	/// Alert shown when submission succeeds.
	pub success_message: String,
	/// Placeholder of a CEP field while its address is looked up.
	pub lookup_placeholder: String,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			marker_attribute: "data-validate".to_string(),
			debounce_ms: 300,
			reset_delay_ms: 2000,
			alert_timeout_ms: 5000,
			invalid_message: "Por favor, corrija os erros no formulário antes de enviar."
				.to_string(),
			success_message: "Cadastro enviado com sucesso!".to_string(),
			lookup_placeholder: "Buscando...".to_string(),
		}
	}
}

impl FormSettings {
	/// Debounce window as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Post-submit reset delay as a [`Duration`].
	pub fn reset_delay(&self) -> Duration {
		Duration::from_millis(self.reset_delay_ms)
	}

	/// Alert lifetime as a [`Duration`].
	pub fn alert_timeout(&self) -> Duration {
		Duration::from_millis(self.alert_timeout_ms)
	}
}

/// Address lookup settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookupSettings {
	/// Whether CEP fields with `data-lookup="cep"` trigger a lookup.
	pub enabled: bool,
	/// URL template containing [`CEP_PLACEHOLDER`].
	pub endpoint: String,
}

impl Default for LookupSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			endpoint: "https://viacep.com.br/ws/{cep}/json/".to_string(),
		}
	}
}

impl PagesSettings {
	/// Parses settings from JSON and validates them. Missing keys keep their defaults.
	///
	/// ```
	/// use voluntar_pages::settings::PagesSettings;
	///
	/// let settings = PagesSettings::from_json(r#"{"forms": {"debounce_ms": 500}}"#).unwrap();
	/// assert_eq!(settings.forms.debounce_ms, 500);
	/// assert_eq!(settings.router.container_id, "spa-content");
	/// ```
	pub fn from_json(json: &str) -> Result<Self, SettingsError> {
		let settings: Self = serde_json::from_str(json)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks value ranges.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.router.container_id.trim().is_empty() {
			return Err(SettingsError::Invalid {
				key: "router.container_id",
				reason: "must not be empty".to_string(),
			});
		}
		if self.forms.debounce_ms == 0 {
			return Err(SettingsError::Invalid {
				key: "forms.debounce_ms",
				reason: "must be greater than zero".to_string(),
			});
		}
		if !self.forms.marker_attribute.starts_with("data-") {
			return Err(SettingsError::Invalid {
				key: "forms.marker_attribute",
				reason: format!(
					"'{}' is not a data attribute",
					self.forms.marker_attribute
				),
			});
		}
		if self.lookup.enabled && !self.lookup.endpoint.contains(CEP_PLACEHOLDER) {
			return Err(SettingsError::Invalid {
				key: "lookup.endpoint",
				reason: format!("missing {} placeholder", CEP_PLACEHOLDER),
			});
		}
		Ok(())
	}

	/// Reads settings from an inline JSON `<script>` element.
	///
	/// Falls back to defaults when the element is absent or invalid.
	#[cfg(target_arch = "wasm32")]
	pub fn from_document(element_id: &str) -> Self {
		let text = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(element_id))
			.and_then(|el| el.text_content());

		match text {
			Some(json) => Self::from_json(&json).unwrap_or_else(|e| {
				crate::warn_log!("Ignoring #{}: {}", element_id, e);
				Self::default()
			}),
			None => Self::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults_match_site_constants() {
		let settings = PagesSettings::default();
		assert_eq!(settings.router.container_id, "spa-content");
		assert_eq!(settings.router.transition_delay(), Duration::from_millis(200));
		assert_eq!(settings.forms.marker_attribute, "data-validate");
		assert_eq!(settings.forms.debounce(), Duration::from_millis(300));
		assert_eq!(settings.forms.reset_delay(), Duration::from_millis(2000));
		assert_eq!(settings.forms.lookup_placeholder, "Buscando...");
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	fn test_partial_json_keeps_defaults() {
		let settings =
			PagesSettings::from_json(r#"{"router": {"transition_delay_ms": 0}}"#).unwrap();
		assert_eq!(settings.router.transition_delay_ms, 0);
		assert_eq!(settings.router.active_class, "active");
		assert_eq!(settings.forms, FormSettings::default());
	}

	#[rstest]
	#[case(r#"{"forms": {"debounce_ms": 0}}"#, "forms.debounce_ms")]
	#[case(r#"{"router": {"container_id": " "}}"#, "router.container_id")]
	#[case(r#"{"forms": {"marker_attribute": "validate"}}"#, "forms.marker_attribute")]
	#[case(r#"{"lookup": {"endpoint": "https://example.org"}}"#, "lookup.endpoint")]
	fn test_invalid_values(#[case] json: &str, #[case] key: &str) {
		match PagesSettings::from_json(json) {
			Err(SettingsError::Invalid { key: k, .. }) => assert_eq!(k, key),
			other => panic!("expected invalid {}, got {:?}", key, other),
		}
	}

	#[rstest]
	fn test_malformed_json() {
		assert!(matches!(
			PagesSettings::from_json("{"),
			Err(SettingsError::Parse(_))
		));
	}
}
