//! Integration tests for the exchange-rate cache and the resolver on top of it.

mod common;

use std::sync::Arc;

use captain_core::currency::{
    RateOrigin, RateResolver, RateStore, ResolutionMethod, ResolverPolicy,
};
use captain_db::entities::sea_orm_active_enums::RateSource;
use captain_db::repositories::{ExchangeRateError, ExchangeRateRepository};
use chrono::Duration;
use common::{Unavailable, seed_rate, setup_db};
use rust_decimal_macros::dec;

fn resolver(repo: ExchangeRateRepository) -> RateResolver<ExchangeRateRepository> {
    RateResolver::new(
        repo,
        Arc::new(Unavailable),
        Arc::new(Unavailable),
        ResolverPolicy::default(),
    )
}

#[tokio::test]
async fn test_record_prunes_to_newest_rows() {
    let db = setup_db().await;
    let repo = ExchangeRateRepository::new(db);

    for rate in [dec!(1.25), dec!(1.5), dec!(1.75), dec!(2), dec!(2.25)] {
        repo.record("EUR", "USD", rate, RateOrigin::Api, 3)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let rows = repo.list_pair("EUR", "USD").await.unwrap();
    let rates: Vec<_> = rows.iter().map(|row| row.rate).collect();
    assert_eq!(rates, vec![dec!(2.25), dec!(2), dec!(1.75)]);
}

#[tokio::test]
async fn test_pruning_is_per_pair() {
    let db = setup_db().await;
    let repo = ExchangeRateRepository::new(db);

    repo.record("GBP", "USD", dec!(1.25), RateOrigin::Api, 1)
        .await
        .unwrap();
    repo.record("EUR", "USD", dec!(1.5), RateOrigin::Api, 1)
        .await
        .unwrap();
    repo.record("EUR", "USD", dec!(1.75), RateOrigin::Api, 1)
        .await
        .unwrap();

    assert_eq!(repo.list_pair("GBP", "USD").await.unwrap().len(), 1);
    assert_eq!(repo.list_pair("EUR", "USD").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_latest_since_respects_age() {
    let db = setup_db().await;
    seed_rate(&db, "EUR", "USD", dec!(1.5), Duration::hours(30)).await;
    seed_rate(&db, "EUR", "USD", dec!(1.25), Duration::hours(10)).await;
    let repo = ExchangeRateRepository::new(db);
    let now = chrono::Utc::now();

    let fresh = repo
        .latest_since("EUR", "USD", Some(now - Duration::hours(6)))
        .await
        .unwrap();
    assert!(fresh.is_none());

    let stale = repo
        .latest_since("EUR", "USD", Some(now - Duration::hours(48)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stale.rate, dec!(1.25));
    assert_eq!(stale.origin, RateOrigin::Api);

    let any = repo.latest_since("EUR", "USD", None).await.unwrap();
    assert_eq!(any.map(|hit| hit.rate), Some(dec!(1.25)));
}

#[tokio::test]
async fn test_resolver_caches_reverse_inference() {
    let db = setup_db().await;
    seed_rate(&db, "EUR", "USD", dec!(1.25), Duration::minutes(5)).await;
    let rates = resolver(ExchangeRateRepository::new(db));

    let resolution = rates.resolve("usd", "eur").await;
    assert_eq!(resolution.rate, dec!(0.8));
    assert_eq!(resolution.method, ResolutionMethod::Reverse);

    let cached = rates.store().list_pair("USD", "EUR").await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].source, RateSource::Calculated);

    // The inferred row now answers directly.
    let again = rates.resolve("USD", "EUR").await;
    assert_eq!(again.method, ResolutionMethod::FreshCache);
}

#[tokio::test]
async fn test_resolver_bridges_through_usd() {
    let db = setup_db().await;
    seed_rate(&db, "GBP", "USD", dec!(1.25), Duration::hours(1)).await;
    seed_rate(&db, "USD", "JPY", dec!(150), Duration::hours(20)).await;
    let rates = resolver(ExchangeRateRepository::new(db));

    let resolution = rates.resolve("GBP", "JPY").await;

    assert_eq!(resolution.rate, dec!(187.5));
    assert_eq!(resolution.method, ResolutionMethod::Bridge);
    let cached = rates.store().list_pair("GBP", "JPY").await.unwrap();
    assert_eq!(cached[0].source, RateSource::CalculatedBridge);
}

#[tokio::test]
async fn test_resolver_degrades_to_historical_then_default() {
    let db = setup_db().await;
    seed_rate(&db, "EUR", "USD", dec!(1.5), Duration::days(30)).await;
    let rates = resolver(ExchangeRateRepository::new(db));

    let historical = rates.resolve("EUR", "USD").await;
    assert_eq!(historical.rate, dec!(1.5));
    assert_eq!(historical.method, ResolutionMethod::Historical);

    let unknown = rates.resolve("EUR", "CHF").await;
    assert_eq!(unknown.rate, dec!(1));
    assert_eq!(unknown.method, ResolutionMethod::Default);
}

#[tokio::test]
async fn test_create_manual_rate() {
    let db = setup_db().await;
    let repo = ExchangeRateRepository::new(db);

    let row = repo
        .create_manual("eur", "usd", dec!(1.125))
        .await
        .unwrap();
    assert_eq!(row.from_currency, "EUR");
    assert_eq!(row.to_currency, "USD");
    assert_eq!(row.rate, dec!(1.125));
    assert_eq!(row.source, RateSource::Manual);
}

#[tokio::test]
async fn test_create_manual_rate_validation() {
    let db = setup_db().await;
    let repo = ExchangeRateRepository::new(db);

    assert!(matches!(
        repo.create_manual("EUR", "USD", dec!(0)).await,
        Err(ExchangeRateError::NonPositiveRate)
    ));
    assert!(matches!(
        repo.create_manual("EUR", "eur", dec!(1.5)).await,
        Err(ExchangeRateError::SameCurrency)
    ));
    assert!(matches!(
        repo.create_manual("EUR", "XXX", dec!(1.5)).await,
        Err(ExchangeRateError::CurrencyNotFound(code)) if code == "XXX"
    ));
}
