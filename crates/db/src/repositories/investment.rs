//! Investment repository.
//!
//! Holdings with a dated history of recorded values. Every recorded value
//! updates the holding's current value and ROI in the same transaction.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use captain_core::currency::normalize_code;
use captain_core::investment::{Holding, PortfolioAnalytics, days_held, roi_percentage};

use crate::entities::sea_orm_active_enums::InvestmentStatus;
use crate::entities::{investment_roi_entries, investments};

/// Investment type used when none is given.
pub const DEFAULT_INVESTMENT_TYPE: &str = "stocks";

/// Note attached to the entry written when an investment is created.
pub const INITIAL_ENTRY_NOTE: &str = "Initial investment";

/// Error types for investment operations.
#[derive(Debug, thiserror::Error)]
pub enum InvestmentError {
    /// Investment not found for this owner.
    #[error("Investment not found: {0}")]
    NotFound(Uuid),

    /// Name is blank.
    #[error("Name must not be empty")]
    EmptyName,

    /// Initial amount must be strictly positive.
    #[error("Initial amount must be greater than zero")]
    NonPositiveAmount,

    /// Recorded values are never negative.
    #[error("Value must not be negative, got {0}")]
    NegativeValue(Decimal),

    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Maturity precedes purchase.
    #[error("Maturity date {maturity} is before purchase date {purchase}")]
    InvalidDateRange {
        /// Purchase date.
        purchase: NaiveDate,
        /// Requested maturity date.
        maturity: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an investment.
#[derive(Debug, Clone)]
pub struct CreateInvestmentInput {
    /// Display name.
    pub name: String,
    /// Broker or platform.
    pub platform: Option<String>,
    /// Investment type; [`DEFAULT_INVESTMENT_TYPE`] when absent.
    pub investment_type: Option<String>,
    /// Amount paid in.
    pub initial_amount: Decimal,
    /// Value today; the initial amount when absent.
    pub current_value: Option<Decimal>,
    /// Target ROI in percent.
    pub expected_roi: Option<Decimal>,
    /// Currency code.
    pub currency: String,
    /// Day of purchase.
    pub purchase_date: NaiveDate,
    /// Day the investment matures.
    pub maturity_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating an investment.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvestmentInput {
    /// New name.
    pub name: Option<String>,
    /// New platform; `Some(None)` clears it.
    pub platform: Option<Option<String>>,
    /// New investment type.
    pub investment_type: Option<String>,
    /// New current value; the ROI follows it.
    pub current_value: Option<Decimal>,
    /// New target ROI; `Some(None)` clears it.
    pub expected_roi: Option<Option<Decimal>>,
    /// New lifecycle state.
    pub status: Option<InvestmentStatus>,
    /// New maturity date; `Some(None)` clears it.
    pub maturity_date: Option<Option<NaiveDate>>,
    /// New notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

/// Input for recording a valuation.
#[derive(Debug, Clone)]
pub struct RecordRoiInput {
    /// Value of the holding on `entry_date`.
    pub recorded_value: Decimal,
    /// Valuation date.
    pub entry_date: NaiveDate,
    /// Free-form note.
    pub note: Option<String>,
}

/// Filter for listing investments.
#[derive(Debug, Clone, Default)]
pub struct InvestmentFilter {
    /// Only investments in this state.
    pub status: Option<InvestmentStatus>,
    /// Only investments of this type.
    pub investment_type: Option<String>,
}

/// An investment with its derived figures.
#[derive(Debug, Clone, Serialize)]
pub struct InvestmentSummary {
    /// The stored investment.
    #[serde(flatten)]
    pub investment: investments::Model,
    /// ROI of the current value; 0 without one.
    pub current_roi: Decimal,
    /// Days since purchase.
    pub days_held: i64,
    /// Most recent valuation.
    pub latest_roi_entry: Option<investment_roi_entries::Model>,
}

/// Investment repository.
#[derive(Debug, Clone)]
pub struct InvestmentRepository {
    db: DatabaseConnection,
}

impl InvestmentRepository {
    /// Creates a new investment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an investment and its initial valuation entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Name is blank or the currency is invalid
    /// - Initial amount is not positive or the current value is negative
    /// - Maturity date precedes the purchase date
    /// - Database operation fails
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateInvestmentInput,
    ) -> Result<investments::Model, InvestmentError> {
        let name = validate_name(&input.name)?;
        let currency = normalize_currency(&input.currency)?;
        if input.initial_amount <= Decimal::ZERO {
            return Err(InvestmentError::NonPositiveAmount);
        }
        let current_value = input.current_value.unwrap_or(input.initial_amount);
        validate_value(current_value)?;
        validate_maturity(input.purchase_date, input.maturity_date)?;

        let investment_type = clean(input.investment_type)
            .unwrap_or_else(|| DEFAULT_INVESTMENT_TYPE.to_string());
        let now = Utc::now().into();

        let txn = self.db.begin().await?;
        let investment = investments::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(name),
            platform: Set(clean(input.platform)),
            investment_type: Set(investment_type),
            initial_amount: Set(input.initial_amount),
            current_value: Set(Some(current_value)),
            expected_roi: Set(input.expected_roi),
            actual_roi: Set(Some(roi_percentage(input.initial_amount, current_value))),
            currency: Set(currency),
            purchase_date: Set(input.purchase_date),
            maturity_date: Set(input.maturity_date),
            status: Set(InvestmentStatus::Active),
            notes: Set(clean(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        investment_roi_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            investment_id: Set(investment.id),
            recorded_value: Set(investment.initial_amount),
            roi_percentage: Set(Decimal::ZERO),
            entry_date: Set(investment.purchase_date),
            note: Set(Some(INITIAL_ENTRY_NOTE.to_string())),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(
            investment_id = %investment.id,
            investment_type = %investment.investment_type,
            "investment created"
        );
        Ok(investment)
    }

    /// Gets an investment owned by `owner_id`.
    pub async fn get(
        &self,
        owner_id: Uuid,
        investment_id: Uuid,
    ) -> Result<investments::Model, InvestmentError> {
        find_owned(&self.db, owner_id, investment_id).await
    }

    /// Lists investments, latest purchase first, with their derived figures
    /// as of `today`.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: InvestmentFilter,
        today: NaiveDate,
    ) -> Result<Vec<InvestmentSummary>, DbErr> {
        let mut query =
            investments::Entity::find().filter(investments::Column::OwnerId.eq(owner_id));

        if let Some(status) = filter.status {
            query = query.filter(investments::Column::Status.eq(status));
        }
        if let Some(investment_type) = clean(filter.investment_type) {
            query = query.filter(investments::Column::InvestmentType.eq(investment_type));
        }

        let rows = query
            .order_by_desc(investments::Column::PurchaseDate)
            .order_by_desc(investments::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut latest = self
            .latest_entries(rows.iter().map(|row| row.id).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|investment| {
                let current_roi = investment
                    .current_value
                    .map(|value| roi_percentage(investment.initial_amount, value))
                    .unwrap_or_default();
                InvestmentSummary {
                    current_roi,
                    days_held: days_held(investment.purchase_date, today),
                    latest_roi_entry: latest.remove(&investment.id),
                    investment,
                }
            })
            .collect())
    }

    /// Updates an investment; a new current value recomputes the ROI.
    pub async fn update(
        &self,
        owner_id: Uuid,
        investment_id: Uuid,
        input: UpdateInvestmentInput,
    ) -> Result<investments::Model, InvestmentError> {
        let investment = self.get(owner_id, investment_id).await?;
        let initial_amount = investment.initial_amount;
        let purchase_date = investment.purchase_date;
        let mut active: investments::ActiveModel = investment.into();

        if let Some(name) = input.name {
            active.name = Set(validate_name(&name)?);
        }
        if let Some(platform) = input.platform {
            active.platform = Set(clean(platform));
        }
        if let Some(investment_type) = clean(input.investment_type) {
            active.investment_type = Set(investment_type);
        }
        if let Some(value) = input.current_value {
            validate_value(value)?;
            active.current_value = Set(Some(value));
            active.actual_roi = Set(Some(roi_percentage(initial_amount, value)));
        }
        if let Some(expected_roi) = input.expected_roi {
            active.expected_roi = Set(expected_roi);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(maturity_date) = input.maturity_date {
            validate_maturity(purchase_date, maturity_date)?;
            active.maturity_date = Set(maturity_date);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(notes));
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an investment and its valuation history.
    pub async fn delete(&self, owner_id: Uuid, investment_id: Uuid) -> Result<(), InvestmentError> {
        let txn = self.db.begin().await?;
        let investment = find_owned(&txn, owner_id, investment_id).await?;

        investment_roi_entries::Entity::delete_many()
            .filter(investment_roi_entries::Column::InvestmentId.eq(investment.id))
            .exec(&txn)
            .await?;
        investments::Entity::delete_by_id(investment.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!(investment_id = %investment_id, "investment deleted");
        Ok(())
    }

    // ========================================================================
    // VALUATIONS
    // ========================================================================

    /// Records a valuation and moves the investment's current value and ROI
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the investment is not found, the value is
    /// negative, or the database operation fails.
    pub async fn record_roi(
        &self,
        owner_id: Uuid,
        investment_id: Uuid,
        input: RecordRoiInput,
    ) -> Result<investment_roi_entries::Model, InvestmentError> {
        validate_value(input.recorded_value)?;

        let txn = self.db.begin().await?;
        let investment = find_owned(&txn, owner_id, investment_id).await?;
        let roi = roi_percentage(investment.initial_amount, input.recorded_value);
        let now = Utc::now().into();

        let entry = investment_roi_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            investment_id: Set(investment.id),
            recorded_value: Set(input.recorded_value),
            roi_percentage: Set(roi),
            entry_date: Set(input.entry_date),
            note: Set(clean(input.note)),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut active: investments::ActiveModel = investment.into();
        active.current_value = Set(Some(input.recorded_value));
        active.actual_roi = Set(Some(roi));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;
        info!(
            investment_id = %investment_id,
            value = %entry.recorded_value,
            roi = %entry.roi_percentage,
            "valuation recorded"
        );
        Ok(entry)
    }

    /// Valuation history, most recent first.
    pub async fn roi_history(
        &self,
        owner_id: Uuid,
        investment_id: Uuid,
    ) -> Result<Vec<investment_roi_entries::Model>, InvestmentError> {
        let investment = self.get(owner_id, investment_id).await?;

        Ok(investment_roi_entries::Entity::find()
            .filter(investment_roi_entries::Column::InvestmentId.eq(investment.id))
            .order_by_desc(investment_roi_entries::Column::EntryDate)
            .order_by_desc(investment_roi_entries::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Portfolio totals, per-type breakdown and best and worst performers.
    pub async fn analytics(&self, owner_id: Uuid) -> Result<PortfolioAnalytics, DbErr> {
        let rows = investments::Entity::find()
            .filter(investments::Column::OwnerId.eq(owner_id))
            .order_by_asc(investments::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let holdings: Vec<Holding> = rows
            .into_iter()
            .map(|row| Holding {
                name: row.name,
                investment_type: Some(row.investment_type),
                initial_amount: row.initial_amount,
                current_value: row.current_value,
                actual_roi: row.actual_roi,
            })
            .collect();

        Ok(PortfolioAnalytics::from_holdings(&holdings))
    }

    /// Newest entry per investment.
    async fn latest_entries(
        &self,
        investment_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, investment_roi_entries::Model>, DbErr> {
        if investment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let entries = investment_roi_entries::Entity::find()
            .filter(investment_roi_entries::Column::InvestmentId.is_in(investment_ids))
            .order_by_desc(investment_roi_entries::Column::EntryDate)
            .order_by_desc(investment_roi_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut latest = HashMap::new();
        for entry in entries {
            latest.entry(entry.investment_id).or_insert(entry);
        }
        Ok(latest)
    }
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    investment_id: Uuid,
) -> Result<investments::Model, InvestmentError> {
    investments::Entity::find_by_id(investment_id)
        .filter(investments::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(InvestmentError::NotFound(investment_id))
}

fn validate_name(name: &str) -> Result<String, InvestmentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InvestmentError::EmptyName);
    }
    Ok(name.to_string())
}

fn validate_value(value: Decimal) -> Result<(), InvestmentError> {
    if value < Decimal::ZERO {
        return Err(InvestmentError::NegativeValue(value));
    }
    Ok(())
}

fn validate_maturity(
    purchase: NaiveDate,
    maturity: Option<NaiveDate>,
) -> Result<(), InvestmentError> {
    match maturity {
        Some(maturity) if maturity < purchase => {
            Err(InvestmentError::InvalidDateRange { purchase, maturity })
        }
        _ => Ok(()),
    }
}

fn normalize_currency(code: &str) -> Result<String, InvestmentError> {
    normalize_code(code).ok_or_else(|| InvestmentError::InvalidCurrency(code.to_string()))
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
