//! Layered exchange-rate resolution.
//!
//! Tiers, first success wins:
//! 1. identity (same code, no I/O)
//! 2. cached pair within the fresh window
//! 3. cached pair within the stale window
//! 4. reciprocal of the cached reverse pair within the stale window
//! 5. product of both legs through the reference currency within the stale window
//! 6. primary provider
//! 7. fallback provider
//! 8. newest cached pair of any age, else 1
//!
//! Storage and provider failures are logged and fall through; `resolve`
//! always returns a rate.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::conversion::convert_amount;
use super::error::{ProviderError, RateStoreError};
use super::types::{CachedRate, Conversion, RateOrigin, RateResolution, ResolutionMethod};

/// Persistent cache of exchange rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Newest row for the exact pair created at or after `since`; any age when `None`.
    async fn latest_since(
        &self,
        from: &str,
        to: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<CachedRate>, RateStoreError>;

    /// Inserts a row, then prunes the pair to its `retain` newest rows.
    async fn record(
        &self,
        from: &str,
        to: &str,
        rate: Decimal,
        origin: RateOrigin,
        retain: usize,
    ) -> Result<(), RateStoreError>;
}

/// External source of exchange rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the current rate, 1 `from` = rate `to`.
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Decimal, ProviderError>;
}

/// Anything that can turn a currency pair into a rate.
#[async_trait]
pub trait ExchangeRates: Send + Sync {
    /// Resolves the rate from `from` to `to`. Never fails.
    async fn rate(&self, from: &str, to: &str) -> RateResolution;
}

/// Cache windows and retention.
#[derive(Debug, Clone)]
pub struct ResolverPolicy {
    /// Age under which a cached rate is served directly.
    pub fresh_for: Duration,
    /// Age under which a cached rate is still usable.
    pub stale_for: Duration,
    /// Rows kept per pair.
    pub retain_per_pair: usize,
    /// Currency used for bridge inference.
    pub reference_currency: String,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            fresh_for: Duration::hours(6),
            stale_for: Duration::hours(48),
            retain_per_pair: 20,
            reference_currency: "USD".to_string(),
        }
    }
}

/// Resolves exchange rates through the cache and two providers.
pub struct RateResolver<S> {
    store: S,
    primary: Arc<dyn RateProvider>,
    fallback: Arc<dyn RateProvider>,
    policy: ResolverPolicy,
}

impl<S> std::fmt::Debug for RateResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateResolver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: RateStore> RateResolver<S> {
    /// Creates a resolver.
    pub fn new(
        store: S,
        primary: Arc<dyn RateProvider>,
        fallback: Arc<dyn RateProvider>,
        policy: ResolverPolicy,
    ) -> Self {
        Self {
            store,
            primary,
            fallback,
            policy,
        }
    }

    /// The underlying rate store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The cache policy.
    pub const fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    /// Resolves the rate from `from` to `to` as of now.
    pub async fn resolve(&self, from: &str, to: &str) -> RateResolution {
        self.resolve_at(from, to, Utc::now()).await
    }

    /// Resolves the rate from `from` to `to`, judging cache age against `now`.
    pub async fn resolve_at(&self, from: &str, to: &str, now: DateTime<Utc>) -> RateResolution {
        let from = normalize(from);
        let to = normalize(to);

        if from == to {
            return RateResolution::new(Decimal::ONE, ResolutionMethod::Identity);
        }

        let fresh_since = now - self.policy.fresh_for;
        if let Some(hit) = self.cached(&from, &to, Some(fresh_since)).await {
            debug!(from = %from, to = %to, rate = %hit.rate, "fresh cached rate");
            return RateResolution::new(hit.rate, ResolutionMethod::FreshCache);
        }

        let stale_since = now - self.policy.stale_for;

        if let Some(hit) = self.cached(&from, &to, Some(stale_since)).await {
            debug!(from = %from, to = %to, rate = %hit.rate, "stale cached rate");
            return RateResolution::new(hit.rate, ResolutionMethod::StaleCache);
        }

        if let Some(rate) = self.reverse(&from, &to, stale_since).await {
            self.remember(&from, &to, rate, RateOrigin::Calculated)
                .await;
            return RateResolution::new(rate, ResolutionMethod::Reverse);
        }

        if let Some(rate) = self.bridge(&from, &to, stale_since).await {
            self.remember(&from, &to, rate, RateOrigin::CalculatedBridge)
                .await;
            return RateResolution::new(rate, ResolutionMethod::Bridge);
        }

        if let Some(rate) = fetch("primary", self.primary.as_ref(), &from, &to).await {
            self.remember(&from, &to, rate, RateOrigin::Api).await;
            return RateResolution::new(rate, ResolutionMethod::PrimaryApi);
        }

        if let Some(rate) = fetch("fallback", self.fallback.as_ref(), &from, &to).await {
            self.remember(&from, &to, rate, RateOrigin::Fallback).await;
            return RateResolution::new(rate, ResolutionMethod::FallbackApi);
        }

        if let Some(hit) = self.cached(&from, &to, None).await {
            warn!(
                from = %from,
                to = %to,
                created_at = %hit.created_at,
                "using outdated cached rate"
            );
            return RateResolution::new(hit.rate, ResolutionMethod::Historical);
        }

        warn!(from = %from, to = %to, "no exchange rate available, assuming 1");
        RateResolution::new(Decimal::ONE, ResolutionMethod::Default)
    }

    /// Converts `amount` and rounds to `decimal_places` with banker's rounding.
    ///
    /// A zero amount converts to zero without a lookup.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        decimal_places: u32,
    ) -> Conversion {
        if amount.is_zero() {
            return Conversion {
                amount,
                converted: Decimal::ZERO,
                rate: None,
                method: None,
            };
        }

        let resolution = self.resolve(from, to).await;
        Conversion {
            amount,
            converted: convert_amount(amount, resolution.rate, decimal_places),
            rate: Some(resolution.rate),
            method: Some(resolution.method),
        }
    }

    async fn reverse(&self, from: &str, to: &str, since: DateTime<Utc>) -> Option<Decimal> {
        let hit = self.cached(to, from, Some(since)).await?;
        let rate = Decimal::ONE.checked_div(hit.rate)?;
        debug!(from = %from, to = %to, %rate, "rate inferred from reverse pair");
        Some(rate)
    }

    async fn bridge(&self, from: &str, to: &str, since: DateTime<Utc>) -> Option<Decimal> {
        let reference = self.policy.reference_currency.as_str();
        if from == reference || to == reference {
            return None;
        }

        let first = self.cached(from, reference, Some(since)).await?;
        let second = self.cached(reference, to, Some(since)).await?;
        let rate = first.rate.checked_mul(second.rate)?;
        debug!(from = %from, to = %to, via = %reference, %rate, "rate inferred through bridge");
        Some(rate)
    }

    async fn cached(
        &self,
        from: &str,
        to: &str,
        since: Option<DateTime<Utc>>,
    ) -> Option<CachedRate> {
        match self.store.latest_since(from, to, since).await {
            Ok(hit) => hit.filter(|row| row.rate > Decimal::ZERO),
            Err(e) => {
                warn!(error = %e, from = %from, to = %to, "rate cache read failed");
                None
            }
        }
    }

    async fn remember(&self, from: &str, to: &str, rate: Decimal, origin: RateOrigin) {
        if let Err(e) = self
            .store
            .record(from, to, rate, origin, self.policy.retain_per_pair)
            .await
        {
            warn!(
                error = %e,
                from = %from,
                to = %to,
                origin = origin.as_str(),
                "rate cache write failed"
            );
        }
    }
}

#[async_trait]
impl<S: RateStore> ExchangeRates for RateResolver<S> {
    async fn rate(&self, from: &str, to: &str) -> RateResolution {
        self.resolve(from, to).await
    }
}

async fn fetch(
    tier: &'static str,
    provider: &dyn RateProvider,
    from: &str,
    to: &str,
) -> Option<Decimal> {
    match provider.fetch_rate(from, to).await {
        Ok(rate) if rate > Decimal::ZERO => {
            debug!(tier, from = %from, to = %to, %rate, "provider rate");
            Some(rate)
        }
        Ok(_) => {
            warn!(
                tier,
                from = %from,
                to = %to,
                error = %ProviderError::NonPositiveRate,
                "provider failed"
            );
            None
        }
        Err(e) => {
            warn!(tier, from = %from, to = %to, error = %e, "provider failed");
            None
        }
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
