//! Budget error types.

use captain_shared::AppError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Budget is no longer active.
    #[error("Budget {0} is inactive")]
    Inactive(Uuid),

    /// An active budget already covers this category and period.
    #[error("budget already exists for this category/period")]
    Duplicate {
        /// Budget category.
        category: String,
        /// Budget period.
        period: String,
    },

    /// Amount must be strictly positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Alert threshold outside `(0, 100]`.
    #[error("Alert threshold must be within (0, 100], got {0}")]
    InvalidThreshold(Decimal),

    /// Inactive budgets cannot be switched back on.
    #[error("Budget {0} is inactive and cannot be reactivated")]
    Reactivation(Uuid),

    /// Currency is not a three-letter code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// End date precedes start date.
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        /// First tracked day.
        start: NaiveDate,
        /// Requested last tracked day.
        end: NaiveDate,
    },

    /// Next period start is not representable.
    #[error("Next period start is out of range")]
    DateOutOfRange,
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => Self::NotFound(err.to_string()),
            BudgetError::Inactive(_)
            | BudgetError::Reactivation(_)
            | BudgetError::DateOutOfRange => Self::BusinessRule(err.to_string()),
            BudgetError::Duplicate { .. } => Self::Conflict(err.to_string()),
            BudgetError::NonPositiveAmount
            | BudgetError::InvalidThreshold(_)
            | BudgetError::InvalidCurrency(_)
            | BudgetError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
        }
    }
}
