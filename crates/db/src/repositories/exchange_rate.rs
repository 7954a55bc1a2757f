//! Exchange-rate cache storage.
//!
//! Backs the core rate resolver: lookups by pair and age, inserts with
//! per-pair pruning, and manually entered rates.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use captain_core::currency::{CachedRate, RateOrigin, RateStore, RateStoreError};

use crate::entities::{currencies, exchange_rates, sea_orm_active_enums::RateSource};

/// Error types for manual exchange rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeRateError {
    /// Rate must be positive.
    #[error("Exchange rate must be positive")]
    NonPositiveRate,

    /// Currencies must be different.
    #[error("From and to currencies must be different")]
    SameCurrency,

    /// Currency not found.
    #[error("Currency '{0}' not found")]
    CurrencyNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Exchange rate repository.
#[derive(Debug, Clone)]
pub struct ExchangeRateRepository {
    db: DatabaseConnection,
    retain_per_pair: usize,
}

impl ExchangeRateRepository {
    /// Rows kept per pair by [`Self::create_manual`] unless overridden.
    pub const DEFAULT_RETAIN: usize = 20;

    /// Creates a new exchange rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            retain_per_pair: Self::DEFAULT_RETAIN,
        }
    }

    /// Sets how many rows manual inserts keep per pair.
    #[must_use]
    pub const fn with_retention(mut self, retain_per_pair: usize) -> Self {
        self.retain_per_pair = retain_per_pair;
        self
    }

    /// Cached rows for a pair, newest first.
    pub async fn list_pair(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<exchange_rates::Model>, DbErr> {
        exchange_rates::Entity::find()
            .filter(exchange_rates::Column::FromCurrency.eq(normalize(from)))
            .filter(exchange_rates::Column::ToCurrency.eq(normalize(to)))
            .order_by_desc(exchange_rates::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Records a manually entered rate.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Rate is not positive
    /// - From and to currencies are the same
    /// - Either currency does not exist
    /// - Database operation fails
    pub async fn create_manual(
        &self,
        from: &str,
        to: &str,
        rate: Decimal,
    ) -> Result<exchange_rates::Model, ExchangeRateError> {
        let from = normalize(from);
        let to = normalize(to);

        if rate <= Decimal::ZERO {
            return Err(ExchangeRateError::NonPositiveRate);
        }
        if from == to {
            return Err(ExchangeRateError::SameCurrency);
        }
        for code in [&from, &to] {
            if currencies::Entity::find_by_id(code.as_str())
                .one(&self.db)
                .await?
                .is_none()
            {
                return Err(ExchangeRateError::CurrencyNotFound(code.clone()));
            }
        }

        let txn = self.db.begin().await?;
        let row = insert_rate(&txn, &from, &to, rate, RateSource::Manual).await?;
        prune_pair(&txn, &from, &to, self.retain_per_pair).await?;
        txn.commit().await?;

        Ok(row)
    }
}

#[async_trait]
impl RateStore for ExchangeRateRepository {
    async fn latest_since(
        &self,
        from: &str,
        to: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<CachedRate>, RateStoreError> {
        let mut query = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::FromCurrency.eq(from))
            .filter(exchange_rates::Column::ToCurrency.eq(to));

        if let Some(since) = since {
            let since = DateTime::<FixedOffset>::from(since);
            query = query.filter(exchange_rates::Column::CreatedAt.gte(since));
        }

        let row = query
            .order_by_desc(exchange_rates::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(row.map(|row| CachedRate {
            from_currency: row.from_currency,
            to_currency: row.to_currency,
            rate: row.rate,
            origin: row.source.into(),
            created_at: row.created_at.with_timezone(&Utc),
        }))
    }

    async fn record(
        &self,
        from: &str,
        to: &str,
        rate: Decimal,
        origin: RateOrigin,
        retain: usize,
    ) -> Result<(), RateStoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        insert_rate(&txn, from, to, rate, origin.into())
            .await
            .map_err(store_error)?;
        prune_pair(&txn, from, to, retain)
            .await
            .map_err(store_error)?;
        txn.commit().await.map_err(store_error)
    }
}

async fn insert_rate<C: ConnectionTrait>(
    conn: &C,
    from: &str,
    to: &str,
    rate: Decimal,
    source: RateSource,
) -> Result<exchange_rates::Model, DbErr> {
    let now = Utc::now();
    exchange_rates::ActiveModel {
        id: Set(Uuid::new_v4()),
        from_currency: Set(from.to_string()),
        to_currency: Set(to.to_string()),
        rate: Set(rate),
        source: Set(source),
        date: Set(now.date_naive()),
        created_at: Set(now.into()),
    }
    .insert(conn)
    .await
}

/// Deletes all but the `retain` newest rows of a pair.
async fn prune_pair<C: ConnectionTrait>(
    conn: &C,
    from: &str,
    to: &str,
    retain: usize,
) -> Result<u64, DbErr> {
    let ids: Vec<Uuid> = exchange_rates::Entity::find()
        .select_only()
        .column(exchange_rates::Column::Id)
        .filter(exchange_rates::Column::FromCurrency.eq(from))
        .filter(exchange_rates::Column::ToCurrency.eq(to))
        .order_by_desc(exchange_rates::Column::CreatedAt)
        .into_tuple()
        .all(conn)
        .await?;
    let stale: Vec<Uuid> = ids.into_iter().skip(retain).collect();

    if stale.is_empty() {
        return Ok(0);
    }

    let result = exchange_rates::Entity::delete_many()
        .filter(exchange_rates::Column::Id.is_in(stale))
        .exec(conn)
        .await?;

    debug!(from = %from, to = %to, pruned = result.rows_affected, "rate cache pruned");
    Ok(result.rows_affected)
}

fn store_error(err: DbErr) -> RateStoreError {
    RateStoreError(err.to_string())
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
