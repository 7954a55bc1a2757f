//! HS256 access tokens.
//!
//! Tokens are issued by an upstream identity service; the API only verifies
//! them. [`JwtService::issue`] exists for tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::JwtSettings;

/// Token failures.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing a new token failed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// Token is malformed, badly signed or carries unexpected claims.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Token is past its expiry.
    #[error("token has expired")]
    Expired,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Builds the service from the `jwt` configuration section.
    #[must_use]
    pub fn new(settings: &JwtSettings) -> Self {
        let secret = settings.secret.as_bytes();
        let ttl_secs = i64::try_from(settings.access_token_expiry_secs).unwrap_or(i64::MAX);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
        }
    }

    /// Issues a token for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Signing` if encoding fails.
    pub fn issue(&self, owner: Uuid) -> Result<String, JwtError> {
        let claims = Claims::issued_at(owner, Utc::now(), self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for an expired token and
    /// `JwtError::Invalid` for anything else that fails verification.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
