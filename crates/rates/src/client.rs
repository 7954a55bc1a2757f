//! Shared HTTP client and error mapping.

use std::time::Duration;

use captain_core::currency::ProviderError;
use reqwest::{Client, Response};

/// Builds a client with a per-request timeout.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("captain-ledger/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub(crate) fn transport_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::Malformed(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// Rejects non-2xx responses.
pub(crate) fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ProviderError::Status(status.as_u16()))
    }
}
