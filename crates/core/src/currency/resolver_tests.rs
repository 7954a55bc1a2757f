use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

/// In-memory cache with the same contract as the database store.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<CachedRate>>,
    broken: bool,
}

impl MemoryStore {
    fn seed(&self, from: &str, to: &str, rate: Decimal, age_hours: i64) {
        self.rows.lock().unwrap().push(CachedRate {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            origin: RateOrigin::Api,
            created_at: Utc::now() - Duration::hours(age_hours),
        });
    }

    fn rows_for(&self, from: &str, to: &str) -> Vec<CachedRate> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.from_currency == from && r.to_currency == to)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn latest_since(
        &self,
        from: &str,
        to: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<CachedRate>, RateStoreError> {
        if self.broken {
            return Err(RateStoreError("connection refused".to_string()));
        }
        Ok(self
            .rows_for(from, to)
            .into_iter()
            .filter(|r| since.is_none_or(|s| r.created_at >= s))
            .max_by_key(|r| r.created_at))
    }

    async fn record(
        &self,
        from: &str,
        to: &str,
        rate: Decimal,
        origin: RateOrigin,
        retain: usize,
    ) -> Result<(), RateStoreError> {
        if self.broken {
            return Err(RateStoreError("connection refused".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(CachedRate {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            origin,
            created_at: Utc::now(),
        });
        let mut pair: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.from_currency == from && r.to_currency == to)
            .map(|(i, _)| i)
            .collect();
        pair.sort_by_key(|&i| rows[i].created_at);
        let excess = pair.len().saturating_sub(retain);
        let mut doomed: Vec<usize> = pair.into_iter().take(excess).collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        for index in doomed {
            rows.remove(index);
        }
        Ok(())
    }
}

fn failing_provider() -> Arc<dyn RateProvider> {
    let mut provider = MockRateProvider::new();
    provider
        .expect_fetch_rate()
        .returning(|_, _| Err(ProviderError::Timeout));
    Arc::new(provider)
}

fn unused_provider() -> Arc<dyn RateProvider> {
    let mut provider = MockRateProvider::new();
    provider.expect_fetch_rate().never();
    Arc::new(provider)
}

fn fixed_provider(rate: Decimal) -> Arc<dyn RateProvider> {
    let mut provider = MockRateProvider::new();
    provider
        .expect_fetch_rate()
        .times(1)
        .returning(move |_, _| Ok(rate));
    Arc::new(provider)
}

fn resolver(
    store: MemoryStore,
    primary: Arc<dyn RateProvider>,
    fallback: Arc<dyn RateProvider>,
) -> RateResolver<MemoryStore> {
    RateResolver::new(store, primary, fallback, ResolverPolicy::default())
}

#[tokio::test]
async fn test_identity_touches_nothing() {
    let mut store = MockRateStore::new();
    store.expect_latest_since().never();
    store.expect_record().never();
    let resolver = RateResolver::new(
        store,
        unused_provider(),
        unused_provider(),
        ResolverPolicy::default(),
    );

    let resolution = resolver.resolve("usd", " USD ").await;

    assert_eq!(resolution.rate, Decimal::ONE);
    assert_eq!(resolution.method, ResolutionMethod::Identity);
}

#[tokio::test]
async fn test_fresh_cache_hit() {
    let store = MemoryStore::default();
    store.seed("EUR", "USD", dec!(1.10), 30);
    store.seed("EUR", "USD", dec!(1.08), 1);
    let resolver = resolver(store, unused_provider(), unused_provider());

    let resolution = resolver.resolve("eur", "usd").await;

    assert_eq!(resolution.rate, dec!(1.08));
    assert_eq!(resolution.method, ResolutionMethod::FreshCache);
}

#[tokio::test]
async fn test_stale_cache_hit() {
    let store = MemoryStore::default();
    store.seed("EUR", "USD", dec!(1.07), 40);
    store.seed("EUR", "USD", dec!(1.09), 12);
    let resolver = resolver(store, unused_provider(), unused_provider());

    let resolution = resolver.resolve("EUR", "USD").await;

    assert_eq!(resolution.rate, dec!(1.09));
    assert_eq!(resolution.method, ResolutionMethod::StaleCache);
    assert!(resolution.method.is_degraded());
}

#[tokio::test]
async fn test_reverse_pair_is_inverted_and_cached() {
    let store = MemoryStore::default();
    store.seed("USD", "EUR", dec!(1.25), 2);
    let resolver = resolver(store, unused_provider(), unused_provider());

    let resolution = resolver.resolve("EUR", "USD").await;

    assert_eq!(resolution.rate, dec!(0.8));
    assert_eq!(resolution.method, ResolutionMethod::Reverse);
    let cached = resolver.store().rows_for("EUR", "USD");
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].origin, RateOrigin::Calculated);
}

#[tokio::test]
async fn test_zero_reverse_rate_is_ignored() {
    let store = MemoryStore::default();
    store.seed("EUR", "USD", Decimal::ZERO, 1);
    let resolver = resolver(store, fixed_provider(dec!(0.92)), unused_provider());

    let resolution = resolver.resolve("USD", "EUR").await;

    assert_eq!(resolution.rate, dec!(0.92));
    assert_eq!(resolution.method, ResolutionMethod::PrimaryApi);
}

#[tokio::test]
async fn test_bridge_through_usd() {
    let store = MemoryStore::default();
    store.seed("GBP", "USD", dec!(1.25), 3);
    store.seed("USD", "JPY", dec!(150), 20);
    let resolver = resolver(store, unused_provider(), unused_provider());

    let resolution = resolver.resolve("GBP", "JPY").await;

    assert_eq!(resolution.rate, dec!(187.50));
    assert_eq!(resolution.method, ResolutionMethod::Bridge);
    let cached = resolver.store().rows_for("GBP", "JPY");
    assert_eq!(cached[0].origin, RateOrigin::CalculatedBridge);
}

#[tokio::test]
async fn test_bridge_needs_both_legs() {
    let store = MemoryStore::default();
    store.seed("GBP", "USD", dec!(1.25), 3);
    let resolver = resolver(store, fixed_provider(dec!(190)), unused_provider());

    let resolution = resolver.resolve("GBP", "JPY").await;

    assert_eq!(resolution.method, ResolutionMethod::PrimaryApi);
}

#[tokio::test]
async fn test_primary_result_is_cached_as_api() {
    let resolver = resolver(
        MemoryStore::default(),
        fixed_provider(dec!(0.91)),
        unused_provider(),
    );

    let resolution = resolver.resolve("USD", "EUR").await;

    assert_eq!(resolution.method, ResolutionMethod::PrimaryApi);
    let cached = resolver.store().rows_for("USD", "EUR");
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].origin, RateOrigin::Api);

    // Second lookup is served from cache; the mock allows one call only.
    let again = resolver.resolve("USD", "EUR").await;
    assert_eq!(again.method, ResolutionMethod::FreshCache);
}

#[tokio::test]
async fn test_fallback_after_primary_failure() {
    let resolver = resolver(
        MemoryStore::default(),
        failing_provider(),
        fixed_provider(dec!(0.93)),
    );

    let resolution = resolver.resolve("USD", "EUR").await;

    assert_eq!(resolution.rate, dec!(0.93));
    assert_eq!(resolution.method, ResolutionMethod::FallbackApi);
    let cached = resolver.store().rows_for("USD", "EUR");
    assert_eq!(cached[0].origin, RateOrigin::Fallback);
}

#[tokio::test]
async fn test_non_positive_provider_rate_falls_through() {
    let resolver = resolver(
        MemoryStore::default(),
        fixed_provider(Decimal::ZERO),
        fixed_provider(dec!(0.95)),
    );

    let resolution = resolver.resolve("USD", "EUR").await;

    assert_eq!(resolution.method, ResolutionMethod::FallbackApi);
}

#[tokio::test]
async fn test_historical_rate_when_providers_fail() {
    let store = MemoryStore::default();
    store.seed("USD", "EUR", dec!(0.85), 24 * 30);
    let resolver = resolver(store, failing_provider(), failing_provider());

    let resolution = resolver.resolve("USD", "EUR").await;

    assert_eq!(resolution.rate, dec!(0.85));
    assert_eq!(resolution.method, ResolutionMethod::Historical);
}

#[tokio::test]
async fn test_old_reverse_rate_is_not_used() {
    let store = MemoryStore::default();
    store.seed("EUR", "USD", dec!(1.25), 72);
    let resolver = resolver(store, failing_provider(), failing_provider());

    let resolution = resolver.resolve("USD", "EUR").await;

    assert_eq!(resolution.rate, Decimal::ONE);
    assert_eq!(resolution.method, ResolutionMethod::Default);
}

#[tokio::test]
async fn test_default_when_nothing_is_available() {
    let resolver = resolver(
        MemoryStore::default(),
        failing_provider(),
        failing_provider(),
    );

    let resolution = resolver.resolve("CHF", "SEK").await;

    assert_eq!(resolution.rate, Decimal::ONE);
    assert_eq!(resolution.method, ResolutionMethod::Default);
}

#[tokio::test]
async fn test_broken_store_is_treated_as_miss() {
    let store = MemoryStore {
        broken: true,
        ..MemoryStore::default()
    };
    let resolver = resolver(store, fixed_provider(dec!(1.11)), unused_provider());

    let resolution = resolver.resolve("EUR", "USD").await;

    assert_eq!(resolution.rate, dec!(1.11));
    assert_eq!(resolution.method, ResolutionMethod::PrimaryApi);
}

#[tokio::test]
async fn test_cache_writes_keep_newest_rows() {
    let store = MemoryStore::default();
    let policy = ResolverPolicy {
        fresh_for: Duration::zero(),
        stale_for: Duration::zero(),
        retain_per_pair: 3,
        ..ResolverPolicy::default()
    };
    let mut provider = MockRateProvider::new();
    let mut next = dec!(1.00);
    provider.expect_fetch_rate().times(5).returning(move |_, _| {
        next += dec!(0.01);
        Ok(next)
    });
    let resolver = RateResolver::new(store, Arc::new(provider), unused_provider(), policy);

    let later = Utc::now() + Duration::hours(1);
    for _ in 0..5 {
        resolver.resolve_at("USD", "EUR", later).await;
    }

    let mut rates: Vec<Decimal> = resolver
        .store()
        .rows_for("USD", "EUR")
        .into_iter()
        .map(|r| r.rate)
        .collect();
    rates.sort();
    assert_eq!(rates, vec![dec!(1.03), dec!(1.04), dec!(1.05)]);
}

#[tokio::test]
async fn test_convert_rounds_to_target_places() {
    let store = MemoryStore::default();
    store.seed("USD", "JPY", dec!(150.5), 1);
    let resolver = resolver(store, unused_provider(), unused_provider());

    let conversion = resolver.convert(dec!(3), "USD", "JPY", 0).await;

    assert_eq!(conversion.converted, dec!(452));
    assert_eq!(conversion.rate, Some(dec!(150.5)));
    assert_eq!(conversion.method, Some(ResolutionMethod::FreshCache));
}

#[tokio::test]
async fn test_convert_zero_skips_lookup() {
    let mut store = MockRateStore::new();
    store.expect_latest_since().never();
    let resolver = RateResolver::new(
        store,
        unused_provider(),
        unused_provider(),
        ResolverPolicy::default(),
    );

    let conversion = resolver.convert(Decimal::ZERO, "USD", "EUR", 2).await;

    assert_eq!(conversion.converted, Decimal::ZERO);
    assert_eq!(conversion.method, None);
}
