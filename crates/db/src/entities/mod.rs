//! `SeaORM` entity definitions.

pub mod budget_alerts;
pub mod budgets;
pub mod currencies;
pub mod currency_preferences;
pub mod exchange_rates;
pub mod investment_roi_entries;
pub mod investments;
pub mod loans;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod transactions;
