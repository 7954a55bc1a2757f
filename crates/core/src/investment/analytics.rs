//! Portfolio analytics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::roi::roi_percentage;

/// Group name for holdings without an investment type.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// One investment as seen by the analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    /// Display name.
    pub name: String,
    /// Investment type, e.g. `stocks`.
    pub investment_type: Option<String>,
    /// Amount paid in.
    pub initial_amount: Decimal,
    /// Latest known value, if any was recorded.
    pub current_value: Option<Decimal>,
    /// Latest ROI percentage, if any was recorded.
    pub actual_roi: Option<Decimal>,
}

impl Holding {
    /// Current value, falling back to the amount invested.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.current_value.unwrap_or(self.initial_amount)
    }

    fn roi(&self) -> Decimal {
        self.actual_roi.unwrap_or(Decimal::ZERO)
    }

    fn type_name(&self) -> &str {
        self.investment_type
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_TYPE)
    }
}

/// Totals for one investment type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    /// Number of holdings.
    pub count: usize,
    /// Sum of amounts invested.
    pub total_invested: Decimal,
    /// Sum of current values.
    pub total_current_value: Decimal,
    /// ROI of the group as a whole.
    pub avg_roi: Decimal,
}

/// Name and ROI of a single holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    /// Holding name.
    pub name: String,
    /// Its ROI percentage.
    pub roi: Decimal,
}

/// Aggregate view over a user's investments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAnalytics {
    /// Number of holdings.
    pub total_investments: usize,
    /// Sum of amounts invested.
    pub total_invested: Decimal,
    /// Sum of current values.
    pub total_current_value: Decimal,
    /// ROI of the whole portfolio.
    pub total_roi_percentage: Decimal,
    /// Current value minus amount invested.
    pub total_gain_loss: Decimal,
    /// Totals keyed by investment type.
    pub by_investment_type: BTreeMap<String, TypeBreakdown>,
    /// Highest ROI; the earliest holding wins ties.
    pub best_performer: Option<Performer>,
    /// Lowest ROI; the earliest holding wins ties.
    pub worst_performer: Option<Performer>,
}

impl PortfolioAnalytics {
    /// Builds the analytics for `holdings`.
    ///
    /// Holdings without a recorded ROI rank as 0%.
    #[must_use]
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let total_invested: Decimal = holdings.iter().map(|h| h.initial_amount).sum();
        let total_current_value: Decimal = holdings.iter().map(Holding::value).sum();

        let mut by_investment_type: BTreeMap<String, TypeBreakdown> = BTreeMap::new();
        for holding in holdings {
            let group = by_investment_type
                .entry(holding.type_name().to_string())
                .or_default();
            group.count += 1;
            group.total_invested += holding.initial_amount;
            group.total_current_value += holding.value();
        }
        for group in by_investment_type.values_mut() {
            group.avg_roi = roi_percentage(group.total_invested, group.total_current_value);
        }

        // `max_by_key` keeps the last maximum, so scan backwards for the first.
        let best_performer = holdings.iter().rev().max_by_key(|h| h.roi());
        let worst_performer = holdings.iter().min_by_key(|h| h.roi());

        Self {
            total_investments: holdings.len(),
            total_invested,
            total_current_value,
            total_roi_percentage: roi_percentage(total_invested, total_current_value),
            total_gain_loss: total_current_value - total_invested,
            by_investment_type,
            best_performer: best_performer.map(Performer::from),
            worst_performer: worst_performer.map(Performer::from),
        }
    }
}

impl From<&Holding> for Performer {
    fn from(holding: &Holding) -> Self {
        Self {
            name: holding.name.clone(),
            roi: holding.roi(),
        }
    }
}
