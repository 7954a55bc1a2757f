//! Application-wide error types.

use thiserror::Error;

use crate::jwt::JwtError;

/// Result carrying an [`AppError`].
pub type AppResult<T> = Result<T, AppError>;

/// Every failure the API can report.
///
/// Each variant maps to one HTTP status and one machine-readable code; the
/// payload is the human-readable message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, invalid or expired bearer token.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The row does not exist or belongs to another owner.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input: amounts, thresholds, currency codes, months.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed input the current state does not allow, such as rolling an inactive budget.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// An active budget already covers the category and period.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage failure; the message is generic.
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::BusinessRule(m)
            | Self::Conflict(m)
            | Self::Database(m)
            | Self::Internal(m) => m,
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::Unauthorized("token has expired".to_string()),
            JwtError::Invalid(_) => Self::Unauthorized("invalid token".to_string()),
            JwtError::Signing(msg) => Self::Internal(msg),
        }
    }
}
