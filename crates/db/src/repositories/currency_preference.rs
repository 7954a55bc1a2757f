//! Per-user currency preferences.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use captain_core::currency::normalize_code;

use crate::entities::{currencies, currency_preferences};

/// Error types for currency preference operations.
#[derive(Debug, thiserror::Error)]
pub enum CurrencyPreferenceError {
    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Currency is missing from the reference table.
    #[error("Currency '{0}' not found")]
    CurrencyNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for setting a preference.
#[derive(Debug, Clone)]
pub struct SetCurrencyPreferenceInput {
    /// Currency code.
    pub currency_code: String,
    /// Make this the owner's only primary currency.
    pub is_primary: bool,
    /// Position in the owner's list; kept as is when absent.
    pub display_order: Option<i32>,
}

/// Currency preference repository.
#[derive(Debug, Clone)]
pub struct CurrencyPreferenceRepository {
    db: DatabaseConnection,
}

impl CurrencyPreferenceRepository {
    /// Creates a new currency preference repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The owner's preferences, primary first, then by display order.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<currency_preferences::Model>, DbErr> {
        currency_preferences::Entity::find()
            .filter(currency_preferences::Column::OwnerId.eq(owner_id))
            .order_by_desc(currency_preferences::Column::IsPrimary)
            .order_by_asc(currency_preferences::Column::DisplayOrder)
            .order_by_asc(currency_preferences::Column::CurrencyCode)
            .all(&self.db)
            .await
    }

    /// Adds or updates the preference for a currency.
    ///
    /// At most one preference per owner is primary: marking one primary
    /// clears the flag on the others in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is malformed or unknown, or the
    /// database operation fails.
    pub async fn set(
        &self,
        owner_id: Uuid,
        input: SetCurrencyPreferenceInput,
    ) -> Result<currency_preferences::Model, CurrencyPreferenceError> {
        let code = normalize_code(&input.currency_code)
            .ok_or_else(|| CurrencyPreferenceError::InvalidCurrency(input.currency_code.clone()))?;
        if currencies::Entity::find_by_id(code.as_str())
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(CurrencyPreferenceError::CurrencyNotFound(code));
        }

        let txn = self.db.begin().await?;
        if input.is_primary {
            currency_preferences::Entity::update_many()
                .col_expr(currency_preferences::Column::IsPrimary, Expr::value(false))
                .filter(currency_preferences::Column::OwnerId.eq(owner_id))
                .filter(currency_preferences::Column::CurrencyCode.ne(code.as_str()))
                .exec(&txn)
                .await?;
        }

        let existing = currency_preferences::Entity::find()
            .filter(currency_preferences::Column::OwnerId.eq(owner_id))
            .filter(currency_preferences::Column::CurrencyCode.eq(code.as_str()))
            .one(&txn)
            .await?;

        let preference = if let Some(existing) = existing {
            let mut active: currency_preferences::ActiveModel = existing.into();
            active.is_primary = Set(input.is_primary);
            if let Some(display_order) = input.display_order {
                active.display_order = Set(display_order);
            }
            active.update(&txn).await?
        } else {
            currency_preferences::ActiveModel {
                id: Set(Uuid::new_v4()),
                owner_id: Set(owner_id),
                currency_code: Set(code),
                is_primary: Set(input.is_primary),
                display_order: Set(input.display_order.unwrap_or_default()),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?
        };

        txn.commit().await?;
        info!(
            owner_id = %owner_id,
            currency = %preference.currency_code,
            is_primary = preference.is_primary,
            "currency preference set"
        );
        Ok(preference)
    }
}
