//! Rollover planning.
//!
//! Persisting the plan (deactivate predecessor, insert successor) is the
//! storage layer's job and must happen atomically.

use chrono::NaiveDate;

use super::error::BudgetError;
use super::period::{PeriodKind, next_period_start, period_window};
use super::types::BudgetDefinition;

/// Builds the successor of `budget` for the next period.
///
/// `target` overrides the period kind; by default the budget keeps its own.
/// The successor copies the budget's terms, starts on the next period start,
/// has no end date and is active.
///
/// # Errors
///
/// Returns `BudgetError::Inactive` if the budget was already rolled over or
/// deactivated, and `BudgetError::DateOutOfRange` if the next start cannot be
/// represented.
pub fn plan_rollover(
    budget: &BudgetDefinition,
    target: Option<PeriodKind>,
) -> Result<BudgetDefinition, BudgetError> {
    if !budget.is_active {
        return Err(BudgetError::Inactive(budget.id.unwrap_or_default()));
    }

    let period = target.unwrap_or(budget.period);
    let start_date =
        next_period_start(period, budget.start_date).ok_or(BudgetError::DateOutOfRange)?;

    Ok(BudgetDefinition {
        id: None,
        name: budget.name.clone(),
        category: budget.category.clone(),
        amount: budget.amount,
        currency: budget.currency.clone(),
        period,
        start_date,
        end_date: None,
        alert_threshold: budget.alert_threshold,
        is_active: true,
        auto_rollover: budget.auto_rollover,
        notes: budget.notes.clone(),
    })
}

/// Last tracked day of `budget`.
///
/// An unset end date means the budget ends with its first period window.
#[must_use]
pub fn effective_end(budget: &BudgetDefinition) -> NaiveDate {
    budget
        .end_date
        .unwrap_or_else(|| period_window(budget.period, budget.start_date).1)
}

/// Whether a budget should be rolled over automatically on `today`.
#[must_use]
pub fn is_due(budget: &BudgetDefinition, today: NaiveDate) -> bool {
    budget.is_active && budget.auto_rollover && effective_end(budget) < today
}
