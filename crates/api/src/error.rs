//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": <code>, "message": <text>}`
//! with the status code of the matching [`AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;

use captain_db::repositories::{
    BudgetError, CurrencyPreferenceError, ExchangeRateError, InvestmentError, LoanError,
    NotificationError, TransactionError,
};
use captain_shared::AppError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(err.into())
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        Self(err.into())
    }
}

impl From<ExchangeRateError> for ApiError {
    fn from(err: ExchangeRateError) -> Self {
        Self(err.into())
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        Self(err.into())
    }
}

impl From<LoanError> for ApiError {
    fn from(err: LoanError) -> Self {
        Self(err.into())
    }
}

impl From<InvestmentError> for ApiError {
    fn from(err: InvestmentError) -> Self {
        Self(err.into())
    }
}

impl From<CurrencyPreferenceError> for ApiError {
    fn from(err: CurrencyPreferenceError) -> Self {
        Self(err.into())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        tracing::error!(error = %err, "database operation failed");
        Self(AppError::Database("A database error occurred".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::NotFound("Budget not found".into()), StatusCode::NOT_FOUND, "NOT_FOUND")]
    #[case(AppError::Conflict("taken".into()), StatusCode::CONFLICT, "CONFLICT")]
    #[case(AppError::Validation("bad".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    #[case(
        AppError::BusinessRule("inactive".into()),
        StatusCode::UNPROCESSABLE_ENTITY,
        "BUSINESS_RULE_VIOLATION"
    )]
    #[tokio::test]
    async fn test_error_body(
        #[case] err: AppError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let message = err.message().to_string();
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), status);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], code);
        assert_eq!(body["message"], message.as_str());
    }

    #[test]
    fn test_portfolio_errors_map_to_status() {
        let ApiError(missing) = ApiError::from(LoanError::NotFound(uuid::Uuid::nil()));
        assert_eq!(missing.status_code(), 404);

        let ApiError(invalid) = ApiError::from(InvestmentError::NonPositiveAmount);
        assert_eq!(invalid.status_code(), 400);

        let unknown = CurrencyPreferenceError::CurrencyNotFound("XYZ".to_string());
        let ApiError(unknown) = ApiError::from(unknown);
        assert_eq!(unknown.status_code(), 404);
    }

    #[test]
    fn test_database_error_is_hidden() {
        let ApiError(err) = ApiError::from(DbErr::Custom("connection reset".into()));
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("connection reset"));
    }
}
