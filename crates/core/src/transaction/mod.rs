//! Transaction aggregation.

pub mod aggregate;

pub use aggregate::{CategoryTotal, MonthlySummary, spend_by_currency, sum_income, sum_spent};
