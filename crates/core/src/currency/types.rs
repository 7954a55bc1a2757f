//! Exchange-rate types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a cached rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    /// Entered by a user.
    Manual,
    /// Primary keyed provider.
    Api,
    /// Key-less fallback provider.
    Fallback,
    /// Reciprocal of the reverse pair.
    Calculated,
    /// Product of two legs through the reference currency.
    CalculatedBridge,
}

impl RateOrigin {
    /// Returns the stored name of the origin.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Api => "api",
            Self::Fallback => "fallback",
            Self::Calculated => "calculated",
            Self::CalculatedBridge => "calculated_bridge",
        }
    }
}

/// How a resolution obtained its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// Same currency on both sides.
    Identity,
    /// Cached within the fresh window.
    FreshCache,
    /// Cached within the stale window.
    StaleCache,
    /// Reciprocal of a cached reverse rate.
    Reverse,
    /// Composed through the reference currency.
    Bridge,
    /// Fetched from the primary provider.
    PrimaryApi,
    /// Fetched from the fallback provider.
    FallbackApi,
    /// Newest cached rate regardless of age.
    Historical,
    /// Nothing available; 1 was assumed.
    Default,
}

impl ResolutionMethod {
    /// Whether the rate may be out of date or made up.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::StaleCache | Self::Historical | Self::Default)
    }
}

/// A cached exchange rate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRate {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// 1 `from_currency` = `rate` `to_currency`.
    pub rate: Decimal,
    /// Where the rate came from.
    pub origin: RateOrigin,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// A resolved rate and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResolution {
    /// The rate.
    pub rate: Decimal,
    /// Which tier produced it.
    pub method: ResolutionMethod,
}

impl RateResolution {
    /// Creates a resolution.
    #[must_use]
    pub const fn new(rate: Decimal, method: ResolutionMethod) -> Self {
        Self { rate, method }
    }
}

/// Result of converting an amount between currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Amount in the source currency.
    pub amount: Decimal,
    /// Amount in the target currency.
    pub converted: Decimal,
    /// Rate used; absent when no lookup was needed.
    pub rate: Option<Decimal>,
    /// How the rate was obtained; absent when no lookup was needed.
    pub method: Option<ResolutionMethod>,
}
