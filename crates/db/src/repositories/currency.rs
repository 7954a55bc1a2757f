//! Currency reference data.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::currencies;

/// Decimal places used for codes missing from the reference table.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Read access to the seeded currency table.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DatabaseConnection,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active currencies ordered by code.
    pub async fn list_active(&self) -> Result<Vec<currencies::Model>, DbErr> {
        currencies::Entity::find()
            .filter(currencies::Column::IsActive.eq(true))
            .order_by_asc(currencies::Column::Code)
            .all(&self.db)
            .await
    }

    /// Finds a currency by code, case-insensitively.
    pub async fn get(&self, code: &str) -> Result<Option<currencies::Model>, DbErr> {
        currencies::Entity::find_by_id(code.trim().to_ascii_uppercase())
            .one(&self.db)
            .await
    }

    /// Minor-unit digits for a code, falling back to
    /// [`DEFAULT_DECIMAL_PLACES`] for unknown codes.
    pub async fn decimal_places(&self, code: &str) -> Result<u32, DbErr> {
        Ok(self
            .get(code)
            .await?
            .and_then(|currency| u32::try_from(currency.decimal_places).ok())
            .unwrap_or(DEFAULT_DECIMAL_PLACES))
    }
}
