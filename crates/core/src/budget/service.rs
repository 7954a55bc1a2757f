//! Budget service for status evaluation and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{BudgetEvaluation, BudgetStatus};

/// Spend share, in percent, at which a budget counts as on track.
const ON_TRACK_PERCENT: i64 = 50;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Classify spend against a budget.
    ///
    /// First match wins:
    /// 1. budgeted <= 0 is `invalid` with percentage 0
    /// 2. percentage >= 100 is `exceeded`
    /// 3. percentage >= threshold is `warning`
    /// 4. percentage >= 50 is `on_track`
    /// 5. otherwise `healthy`
    ///
    /// Tiers compare the exact percentage; the reported one is rounded to 2 dp.
    #[must_use]
    pub fn evaluate(spent: Decimal, budgeted: Decimal, threshold: Decimal) -> BudgetEvaluation {
        let remaining = budgeted.saturating_sub(spent);

        if budgeted <= Decimal::ZERO {
            return BudgetEvaluation {
                status: BudgetStatus::Invalid,
                percentage: Decimal::ZERO,
                remaining,
            };
        }

        let percentage = spent
            .checked_div(budgeted)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX);

        let status = if percentage >= Decimal::ONE_HUNDRED {
            BudgetStatus::Exceeded
        } else if percentage >= threshold {
            BudgetStatus::Warning
        } else if percentage >= Decimal::from(ON_TRACK_PERCENT) {
            BudgetStatus::OnTrack
        } else {
            BudgetStatus::Healthy
        };

        BudgetEvaluation {
            status,
            percentage: percentage.round_dp(2),
            remaining,
        }
    }

    /// Validate a budgeted amount.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NonPositiveAmount` if the amount is zero or negative.
    pub fn validate_amount(amount: Decimal) -> Result<(), BudgetError> {
        if amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount);
        }
        Ok(())
    }

    /// Validate an alert threshold.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidThreshold` unless `0 < threshold <= 100`.
    pub fn validate_threshold(threshold: Decimal) -> Result<(), BudgetError> {
        if threshold <= Decimal::ZERO || threshold > Decimal::ONE_HUNDRED {
            return Err(BudgetError::InvalidThreshold(threshold));
        }
        Ok(())
    }

    /// Validate that a budget does not end before it starts.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidDateRange` if `end` precedes `start`.
    pub fn validate_dates(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), BudgetError> {
        match end {
            Some(end) if end < start => Err(BudgetError::InvalidDateRange { start, end }),
            _ => Ok(()),
        }
    }
}
