//! Return on investment.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Decimal places kept on ROI percentages.
pub const ROI_SCALE: u32 = 2;

/// Percentage gain of `value` over `initial`, rounded to [`ROI_SCALE`].
///
/// Returns 0 when nothing was invested.
#[must_use]
pub fn roi_percentage(initial: Decimal, value: Decimal) -> Decimal {
    if initial <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((value - initial) / initial * Decimal::ONE_HUNDRED).round_dp(ROI_SCALE)
}

/// Whole days between purchase and `today`; negative for future purchases.
#[must_use]
pub fn days_held(purchase_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - purchase_date).num_days()
}
