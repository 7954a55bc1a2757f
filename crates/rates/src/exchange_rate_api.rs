//! Keyed pair-conversion provider.

use async_trait::async_trait;
use captain_core::currency::{ProviderError, RateProvider};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::client::{ensure_success, transport_error};

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: String,
    conversion_rate: Option<Decimal>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

/// Queries `GET {base_url}/{api_key}/pair/{FROM}/{TO}`.
pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ExchangeRateApiProvider {
    /// Creates a provider. Without a key every fetch fails with
    /// [`ProviderError::MissingApiKey`].
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Decimal, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey)?;

        debug!(from = %from, to = %to, "requesting pair rate from primary provider");
        let url = format!("{}/{key}/pair/{from}/{to}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let body: PairResponse = ensure_success(response)?
            .json()
            .await
            .map_err(|e| transport_error(&e))?;

        if body.result != "success" {
            return Err(ProviderError::Rejected(
                body.error_type.unwrap_or(body.result),
            ));
        }

        body.conversion_rate
            .ok_or_else(|| ProviderError::Malformed("no conversion_rate".into()))
    }
}
