//! Budget data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::PeriodKind;

/// Default alert threshold in percent.
#[must_use]
pub fn default_alert_threshold() -> Decimal {
    Decimal::from(80)
}

/// Status tier of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Budgeted amount is zero or negative.
    Invalid,
    /// Spent at least the whole budget.
    Exceeded,
    /// Spent at least the alert threshold.
    Warning,
    /// Spent at least half.
    OnTrack,
    /// Spent less than half.
    Healthy,
}

impl BudgetStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Exceeded => "exceeded",
            Self::Warning => "warning",
            Self::OnTrack => "on_track",
            Self::Healthy => "healthy",
        }
    }

    /// Whether this status should raise an alert.
    #[must_use]
    pub const fn is_alerting(self) -> bool {
        matches!(self, Self::Warning | Self::Exceeded)
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating spend against a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEvaluation {
    /// Status tier.
    pub status: BudgetStatus,
    /// Spent as a percentage of the budget, rounded to 2 dp.
    pub percentage: Decimal,
    /// Budgeted minus spent; negative once exceeded.
    pub remaining: Decimal,
}

/// The user-facing terms of a budget, independent of storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetDefinition {
    /// Budget ID, if persisted.
    pub id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Transaction category tracked by this budget.
    pub category: String,
    /// Budgeted amount.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Recurrence period.
    pub period: PeriodKind,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered, if fixed.
    pub end_date: Option<NaiveDate>,
    /// Alert threshold in percent.
    pub alert_threshold: Decimal,
    /// Whether the budget is active.
    pub is_active: bool,
    /// Whether the budget rolls over automatically when it ends.
    pub auto_rollover: bool,
    /// Free-form notes.
    pub notes: Option<String>,
}
