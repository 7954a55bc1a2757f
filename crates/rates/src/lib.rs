//! HTTP exchange-rate providers.
//!
//! Two providers back the resolver once the cache has nothing usable:
//! - [`ExchangeRateApiProvider`], keyed, queried first
//! - [`LatestRatesProvider`], key-less, queried on primary failure

mod client;
mod exchange_rate_api;
mod latest_rates;

use std::sync::Arc;
use std::time::Duration;

use captain_core::currency::RateProvider;
use captain_shared::config::ExchangeRatesConfig;

pub use client::build_client;
pub use exchange_rate_api::ExchangeRateApiProvider;
pub use latest_rates::LatestRatesProvider;

/// Primary and fallback providers sharing one HTTP client.
pub struct Providers {
    /// Keyed provider.
    pub primary: Arc<dyn RateProvider>,
    /// Key-less provider.
    pub fallback: Arc<dyn RateProvider>,
}

/// Builds both providers from configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_providers(config: &ExchangeRatesConfig) -> Result<Providers, reqwest::Error> {
    let client = build_client(Duration::from_secs(config.timeout_secs))?;

    Ok(Providers {
        primary: Arc::new(ExchangeRateApiProvider::new(
            client.clone(),
            &config.primary_url,
            config.api_key.clone(),
        )),
        fallback: Arc::new(LatestRatesProvider::new(client, &config.fallback_url)),
    })
}
