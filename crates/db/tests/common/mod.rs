//! Shared fixtures for repository integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use captain_core::currency::{
    ExchangeRates, ProviderError, RateProvider, RateResolution, ResolutionMethod,
};
use captain_db::migration::Migrator;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use captain_db::entities::{exchange_rates, sea_orm_active_enums::RateSource};

/// Fresh in-memory database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Inserts a cached rate row that is `age` old.
pub async fn seed_rate(
    db: &DatabaseConnection,
    from: &str,
    to: &str,
    rate: Decimal,
    age: Duration,
) -> exchange_rates::Model {
    let created_at = Utc::now() - age;
    exchange_rates::ActiveModel {
        id: Set(Uuid::new_v4()),
        from_currency: Set(from.to_string()),
        to_currency: Set(to.to_string()),
        rate: Set(rate),
        source: Set(RateSource::Api),
        date: Set(created_at.date_naive()),
        created_at: Set(created_at.into()),
    }
    .insert(db)
    .await
    .expect("Failed to seed rate")
}

/// Answers every pair with the same rate.
pub struct FixedRates(pub Decimal);

#[async_trait]
impl ExchangeRates for FixedRates {
    async fn rate(&self, _from: &str, _to: &str) -> RateResolution {
        RateResolution::new(self.0, ResolutionMethod::FreshCache)
    }
}

/// Provider that is always down.
pub struct Unavailable;

#[async_trait]
impl RateProvider for Unavailable {
    async fn fetch_rate(&self, _from: &str, _to: &str) -> Result<Decimal, ProviderError> {
        Err(ProviderError::Transport("connection refused".to_string()))
    }
}
