//! Budget tracking: period windows, status evaluation and rollover.

pub mod error;
pub mod period;
pub mod rollover;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use period::{PeriodKind, last_day_of_month, next_period_start, period_window, tracking_window};
pub use rollover::{effective_end, is_due, plan_rollover};
pub use service::BudgetService;
pub use types::{BudgetDefinition, BudgetEvaluation, BudgetStatus, default_alert_threshold};
