//! Captain Ledger API server.
//!
//! Serves the HTTP API and, when enabled, runs periodic maintenance: due
//! budget rollovers and pruning of old notifications.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use captain_api::{AppState, create_router};
use captain_core::currency::{RateResolver, ResolverPolicy};
use captain_db::{
    BudgetRepository, ExchangeRateRepository, NotificationRepository, connect_with,
    migration::Migrator,
};
use captain_shared::{
    AppConfig, JwtService,
    config::{ExchangeRatesConfig, MaintenanceConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "captain=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    let providers = captain_rates::build_providers(&config.exchange_rates)
        .context("failed to build exchange-rate providers")?;
    if config.exchange_rates.api_key.is_none() {
        info!("No exchange-rate API key, primary provider disabled");
    }
    let store = ExchangeRateRepository::new(db.clone())
        .with_retention(config.exchange_rates.retain_per_pair);
    let rates = RateResolver::new(
        store,
        providers.primary,
        providers.fallback,
        resolver_policy(&config.exchange_rates)?,
    );

    let jwt_service = JwtService::new(&config.jwt);

    if config.maintenance.enabled {
        let retention = notification_retention(&config.maintenance)?;
        let maintenance = run_maintenance(db.clone(), config.maintenance.clone(), retention);
        tokio::spawn(maintenance);
    }

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        rates: Arc::new(rates),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn resolver_policy(config: &ExchangeRatesConfig) -> anyhow::Result<ResolverPolicy> {
    let fresh_for = TimeDelta::try_hours(config.fresh_hours)
        .context("exchange_rates.fresh_hours is out of range")?;
    let stale_for = TimeDelta::try_hours(config.stale_hours)
        .context("exchange_rates.stale_hours is out of range")?;

    Ok(ResolverPolicy {
        fresh_for,
        stale_for,
        retain_per_pair: config.retain_per_pair,
        reference_currency: config.reference_currency.to_uppercase(),
    })
}

fn notification_retention(config: &MaintenanceConfig) -> anyhow::Result<TimeDelta> {
    TimeDelta::try_days(config.notification_retention_days)
        .context("maintenance.notification_retention_days is out of range")
}

/// Rolls over due budgets and prunes old notifications on every tick.
async fn run_maintenance(
    db: DatabaseConnection,
    config: MaintenanceConfig,
    retention: TimeDelta,
) {
    let budgets = BudgetRepository::new(db.clone());
    let notifications = NotificationRepository::new(db);
    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs.max(1)));

    info!(interval_secs = config.interval_secs, "maintenance started");
    loop {
        interval.tick().await;
        let now = Utc::now();

        match budgets.rollover_due(None, now.date_naive()).await {
            Ok(report) if !report.failed.is_empty() => {
                error!(
                    rolled_over = report.rolled_over.len(),
                    failed = report.failed.len(),
                    "scheduled rollover finished with failures"
                );
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "scheduled rollover failed"),
        }

        let Some(cutoff) = now.checked_sub_signed(retention) else {
            error!("notification cutoff out of range, skipping cleanup");
            continue;
        };
        if let Err(e) = notifications.delete_older_than(cutoff).await {
            error!(error = %e, "notification cleanup failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates_config(fresh_hours: i64, stale_hours: i64) -> ExchangeRatesConfig {
        ExchangeRatesConfig {
            fresh_hours,
            stale_hours,
            reference_currency: "usd".to_string(),
            ..ExchangeRatesConfig::default()
        }
    }

    #[test]
    fn test_resolver_policy_from_config() {
        let policy = resolver_policy(&rates_config(24, 168)).unwrap();

        assert_eq!(policy.fresh_for, TimeDelta::hours(24));
        assert_eq!(policy.stale_for, TimeDelta::days(7));
        assert_eq!(policy.reference_currency, "USD");
    }

    #[test]
    fn test_out_of_range_hours_are_config_errors() {
        let err = resolver_policy(&rates_config(i64::MAX, 168)).unwrap_err();
        assert!(err.to_string().contains("fresh_hours"));

        let err = resolver_policy(&rates_config(24, i64::MIN)).unwrap_err();
        assert!(err.to_string().contains("stale_hours"));
    }

    #[test]
    fn test_notification_retention() {
        let config = MaintenanceConfig {
            notification_retention_days: 90,
            ..MaintenanceConfig::default()
        };
        let retention = notification_retention(&config).unwrap();
        assert_eq!(retention, TimeDelta::days(90));

        let config = MaintenanceConfig {
            notification_retention_days: i64::MAX,
            ..MaintenanceConfig::default()
        };
        assert!(notification_retention(&config).is_err());
    }
}
