//! Key-less latest-rates provider.

use std::collections::HashMap;

use async_trait::async_trait;
use captain_core::currency::{ProviderError, RateProvider};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::client::{ensure_success, transport_error};

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, Decimal>,
}

/// Queries `GET {base_url}/{FROM}` and picks the target from `rates`.
pub struct LatestRatesProvider {
    client: Client,
    base_url: String,
}

impl LatestRatesProvider {
    /// Creates a provider.
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RateProvider for LatestRatesProvider {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Decimal, ProviderError> {
        debug!(from = %from, to = %to, "requesting latest rates from fallback provider");
        let url = format!("{}/{from}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let body: LatestResponse = ensure_success(response)?
            .json()
            .await
            .map_err(|e| transport_error(&e))?;

        body.rates
            .get(to)
            .copied()
            .ok_or_else(|| ProviderError::MissingCurrency(to.to_string()))
    }
}
