//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - Mapping of repository errors onto [`AppError`]

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    BudgetRepository, CurrencyPreferenceRepository, CurrencyRepository, ExchangeRateRepository,
    InvestmentRepository, LoanRepository, NotificationRepository, TransactionRepository,
};

use std::time::Duration;

use captain_shared::AppError;
use captain_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::error;

use repositories::{
    BudgetError, CurrencyPreferenceError, ExchangeRateError, InvestmentError, LoanError,
    NotificationError, TransactionError,
};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the configured pool sizes.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}

fn database_error(err: &DbErr) -> AppError {
    error!(error = %err, "database operation failed");
    AppError::Database("A database error occurred".to_string())
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::Rule(rule) => rule.into(),
            BudgetError::Database(e) => database_error(&e),
        }
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => Self::NotFound(err.to_string()),
            TransactionError::ZeroAmount
            | TransactionError::InvalidCurrency(_)
            | TransactionError::InvalidMonth { .. } => Self::Validation(err.to_string()),
            TransactionError::Database(e) => database_error(&e),
        }
    }
}

impl From<ExchangeRateError> for AppError {
    fn from(err: ExchangeRateError) -> Self {
        match err {
            ExchangeRateError::NonPositiveRate | ExchangeRateError::SameCurrency => {
                Self::Validation(err.to_string())
            }
            ExchangeRateError::CurrencyNotFound(_) => Self::NotFound(err.to_string()),
            ExchangeRateError::Database(e) => database_error(&e),
        }
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::NotFound(_) => Self::NotFound(err.to_string()),
            NotificationError::Database(e) => database_error(&e),
        }
    }
}

impl From<LoanError> for AppError {
    fn from(err: LoanError) -> Self {
        match err {
            LoanError::NotFound(_) => Self::NotFound(err.to_string()),
            LoanError::NonPositiveAmount
            | LoanError::InvalidCurrency(_)
            | LoanError::EmptyContact
            | LoanError::NegativeInterest(_) => Self::Validation(err.to_string()),
            LoanError::Database(e) => database_error(&e),
        }
    }
}

impl From<InvestmentError> for AppError {
    fn from(err: InvestmentError) -> Self {
        match err {
            InvestmentError::NotFound(_) => Self::NotFound(err.to_string()),
            InvestmentError::EmptyName
            | InvestmentError::NonPositiveAmount
            | InvestmentError::NegativeValue(_)
            | InvestmentError::InvalidCurrency(_)
            | InvestmentError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            InvestmentError::Database(e) => database_error(&e),
        }
    }
}

impl From<CurrencyPreferenceError> for AppError {
    fn from(err: CurrencyPreferenceError) -> Self {
        match err {
            CurrencyPreferenceError::InvalidCurrency(_) => Self::Validation(err.to_string()),
            CurrencyPreferenceError::CurrencyNotFound(_) => Self::NotFound(err.to_string()),
            CurrencyPreferenceError::Database(e) => database_error(&e),
        }
    }
}
