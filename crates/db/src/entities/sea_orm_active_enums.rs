//! String-backed enums stored in entity columns.

use captain_core::budget::BudgetStatus;
use captain_core::currency::RateOrigin;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Origin of a cached exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "api")]
    Api,
    #[sea_orm(string_value = "fallback")]
    Fallback,
    #[sea_orm(string_value = "calculated")]
    Calculated,
    #[sea_orm(string_value = "calculated_bridge")]
    CalculatedBridge,
}

impl From<RateOrigin> for RateSource {
    fn from(origin: RateOrigin) -> Self {
        match origin {
            RateOrigin::Manual => Self::Manual,
            RateOrigin::Api => Self::Api,
            RateOrigin::Fallback => Self::Fallback,
            RateOrigin::Calculated => Self::Calculated,
            RateOrigin::CalculatedBridge => Self::CalculatedBridge,
        }
    }
}

impl From<RateSource> for RateOrigin {
    fn from(source: RateSource) -> Self {
        match source {
            RateSource::Manual => Self::Manual,
            RateSource::Api => Self::Api,
            RateSource::Fallback => Self::Fallback,
            RateSource::Calculated => Self::Calculated,
            RateSource::CalculatedBridge => Self::CalculatedBridge,
        }
    }
}

/// Status that triggered a budget alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "exceeded")]
    Exceeded,
}

impl AlertLevel {
    /// Alert level for a status, if that status alerts at all.
    #[must_use]
    pub const fn for_status(status: BudgetStatus) -> Option<Self> {
        match status {
            BudgetStatus::Warning => Some(Self::Warning),
            BudgetStatus::Exceeded => Some(Self::Exceeded),
            BudgetStatus::Invalid | BudgetStatus::OnTrack | BudgetStatus::Healthy => None,
        }
    }
}

/// Direction of a personal loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    /// Money lent to the contact.
    #[sea_orm(string_value = "given")]
    Given,
    /// Money borrowed from the contact.
    #[sea_orm(string_value = "taken")]
    Taken,
}

/// Repayment state of a loan.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    #[sea_orm(string_value = "outstanding")]
    Outstanding,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Lifecycle of an investment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "matured")]
    Matured,
    #[sea_orm(string_value = "sold")]
    Sold,
}
