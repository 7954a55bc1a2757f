//! Transaction repository.
//!
//! Plain CRUD plus the reads the budget tracker aggregates over.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use captain_core::budget::last_day_of_month;
use captain_core::currency::normalize_code;
use captain_core::transaction::{MonthlySummary, spend_by_currency, sum_spent};
use captain_shared::types::PageRequest;

use crate::entities::transactions;

/// Currency reported by an empty monthly summary.
pub const DEFAULT_SUMMARY_CURRENCY: &str = "USD";

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Zero amounts are neither income nor expense.
    #[error("Amount must not be zero")]
    ZeroAmount,

    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Month outside 1..=12 or an unrepresentable year.
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Signed amount: positive income, negative expense.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Booking date.
    pub date: NaiveDate,
    /// Optional category.
    pub category: Option<String>,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// Input for updating a transaction.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New currency code.
    pub currency: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New category; `Some(None)` clears it.
    pub category: Option<Option<String>>,
    /// New note; `Some(None)` clears it.
    pub note: Option<Option<String>>,
}

/// Filter for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Exact category.
    pub category: Option<String>,
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        validate_amount(input.amount)?;
        let currency = normalize_currency(&input.currency)?;
        let now = Utc::now().into();

        let model = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            amount: Set(input.amount),
            currency: Set(currency),
            date: Set(input.date),
            category: Set(clean(input.category)),
            note: Set(clean(input.note)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Gets a transaction owned by `owner_id`.
    pub async fn get(
        &self,
        owner_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))
    }

    /// Lists transactions newest first, returning the page and the total count.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), TransactionError> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::OwnerId.eq(owner_id));

        if let Some(category) = filter.category {
            query = query.filter(transactions::Column::Category.eq(category));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(transactions::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(transactions::Column::Date.lte(end));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Updates a transaction.
    pub async fn update(
        &self,
        owner_id: Uuid,
        transaction_id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self.get(owner_id, transaction_id).await?;
        let mut active: transactions::ActiveModel = transaction.into();

        if let Some(amount) = input.amount {
            validate_amount(amount)?;
            active.amount = Set(amount);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(normalize_currency(&currency)?);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(category) = input.category {
            active.category = Set(clean(category));
        }
        if let Some(note) = input.note {
            active.note = Set(clean(note));
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a transaction.
    pub async fn delete(
        &self,
        owner_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(transaction_id))
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TransactionError::NotFound(transaction_id));
        }
        Ok(())
    }

    /// Absolute expense total for a category over an inclusive window,
    /// ignoring currencies. Never negative; 0 for no rows.
    pub async fn sum_spent(
        &self,
        owner_id: Uuid,
        category: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal, DbErr> {
        let amounts: Vec<Decimal> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Amount)
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .filter(transactions::Column::Category.eq(category))
            .filter(transactions::Column::Date.between(start, end))
            .filter(transactions::Column::Amount.lt(Decimal::ZERO))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(sum_spent(amounts))
    }

    /// Absolute expense totals per currency for a category over an inclusive window.
    pub async fn spend_by_currency(
        &self,
        owner_id: Uuid,
        category: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<String, Decimal>, DbErr> {
        let rows: Vec<(String, Decimal)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Currency)
            .column(transactions::Column::Amount)
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .filter(transactions::Column::Category.eq(category))
            .filter(transactions::Column::Date.between(start, end))
            .filter(transactions::Column::Amount.lt(Decimal::ZERO))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(spend_by_currency(rows))
    }

    /// Income, expenses and per-category spend for a calendar month.
    pub async fn monthly_summary(
        &self,
        owner_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<MonthlySummary, TransactionError> {
        let invalid = || TransactionError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = last_day_of_month(year, month).ok_or_else(invalid)?;

        let rows: Vec<(Option<String>, String, Decimal)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Category)
            .column(transactions::Column::Currency)
            .column(transactions::Column::Amount)
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .filter(transactions::Column::Date.between(start, end))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(MonthlySummary::from_rows(
            format!("{year:04}-{month:02}"),
            DEFAULT_SUMMARY_CURRENCY,
            rows.iter().map(|(category, currency, amount)| {
                (category.as_deref(), currency.as_str(), *amount)
            }),
        ))
    }
}

fn validate_amount(amount: Decimal) -> Result<(), TransactionError> {
    if amount.is_zero() {
        return Err(TransactionError::ZeroAmount);
    }
    Ok(())
}

fn normalize_currency(code: &str) -> Result<String, TransactionError> {
    normalize_code(code).ok_or_else(|| TransactionError::InvalidCurrency(code.to_string()))
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
