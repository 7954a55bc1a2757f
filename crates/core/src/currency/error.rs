//! Exchange-rate error types.
//!
//! Neither error ever reaches a caller of the resolver; both are logged and
//! turned into a fall-through to the next tier.

use thiserror::Error;

/// Failure of an external rate provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider needs an API key and none is configured.
    #[error("no API key configured")]
    MissingApiKey,

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The provider answered but refused the request.
    #[error("provider rejected request: {0}")]
    Rejected(String),

    /// The response has no rate for the requested currency.
    #[error("no rate for {0}")]
    MissingCurrency(String),

    /// The rate is zero or negative.
    #[error("non-positive rate")]
    NonPositiveRate,
}

/// Failure of the rate cache.
#[derive(Debug, Error)]
#[error("rate store error: {0}")]
pub struct RateStoreError(pub String);
