//! Investment valuation.
//!
//! Pure calculations behind the investment tracker:
//! - ROI of a recorded value against the amount invested
//! - Portfolio analytics grouped by investment type

pub mod analytics;
pub mod roi;

#[cfg(test)]
mod tests;

pub use analytics::{Holding, Performer, PortfolioAnalytics, TypeBreakdown, UNKNOWN_TYPE};
pub use roi::{ROI_SCALE, days_held, roi_percentage};
