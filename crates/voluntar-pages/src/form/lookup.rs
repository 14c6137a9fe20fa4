//! Postal-code address lookup.
//!
//! [`ViaCepClient`] queries the ViaCEP web service. Its JSON answer either
//! carries the address or `{"erro": true}` for unknown codes.

use crate::settings::{CEP_PLACEHOLDER, LookupSettings};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::Deserialize;
use thiserror::Error;
use voluntar_validators::postal::normalize_cep;

/// Address returned by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
	/// Street name.
	#[serde(rename = "logradouro", default)]
	pub street: String,
	/// District.
	#[serde(rename = "bairro", default)]
	pub district: String,
	/// City.
	#[serde(rename = "localidade", default)]
	pub city: String,
	/// Two-letter state code.
	#[serde(rename = "uf", default)]
	pub state: String,
}

/// Lookup failure. `Display` is the message shown on the CEP field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
	/// Not eight digits.
	#[error("CEP inválido")]
	InvalidCep,
	/// The service does not know the code.
	#[error("CEP não encontrado")]
	NotFound,
	/// The request failed.
	#[error("Erro ao buscar CEP")]
	Transport(String),
	/// The response was not the expected JSON.
	#[error("Erro ao buscar CEP")]
	Decode(String),
}

/// Asynchronous address source.
pub trait AddressLookup {
	/// Looks up the address of `cep` (bare eight digits).
	fn lookup(&self, cep: &str) -> LocalBoxFuture<'_, Result<Address, LookupError>>;
}

#[derive(Deserialize)]
struct ViaCepResponse {
	#[serde(default)]
	erro: Option<serde_json::Value>,
	#[serde(flatten)]
	address: Address,
}

impl ViaCepResponse {
	fn into_result(self) -> Result<Address, LookupError> {
		let flagged = match &self.erro {
			None | Some(serde_json::Value::Null) => false,
			Some(serde_json::Value::Bool(b)) => *b,
			Some(serde_json::Value::String(s)) => s != "false",
			Some(_) => true,
		};
		if flagged {
			Err(LookupError::NotFound)
		} else {
			Ok(self.address)
		}
	}
}

/// Parses a ViaCEP response body.
pub fn parse_response(body: &str) -> Result<Address, LookupError> {
	serde_json::from_str::<ViaCepResponse>(body)
		.map_err(|e| LookupError::Decode(e.to_string()))?
		.into_result()
}

/// [`AddressLookup`] backed by ViaCEP.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
	client: reqwest::Client,
	endpoint: String,
}

impl ViaCepClient {
	/// Creates a client for the endpoint template in `settings`.
	pub fn new(settings: &LookupSettings) -> Self {
		Self {
			client: reqwest::Client::new(),
			endpoint: settings.endpoint.clone(),
		}
	}

	/// Request URL for `cep`, or `None` when it is not eight digits.
	pub fn url_for(&self, cep: &str) -> Option<String> {
		normalize_cep(cep).map(|digits| self.endpoint.replace(CEP_PLACEHOLDER, &digits))
	}

	async fn fetch(&self, cep: &str) -> Result<Address, LookupError> {
		let url = self.url_for(cep).ok_or(LookupError::InvalidCep)?;
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| LookupError::Transport(e.to_string()))?;

		let status = response.status();
		if status == reqwest::StatusCode::BAD_REQUEST {
			return Err(LookupError::InvalidCep);
		}
		if !status.is_success() {
			return Err(LookupError::Transport(format!("HTTP {}", status)));
		}

		let body = response
			.text()
			.await
			.map_err(|e| LookupError::Transport(e.to_string()))?;
		parse_response(&body)
	}
}

impl AddressLookup for ViaCepClient {
	fn lookup(&self, cep: &str) -> LocalBoxFuture<'_, Result<Address, LookupError>> {
		let cep = cep.to_string();
		async move { self.fetch(&cep).await }.boxed_local()
	}
}
