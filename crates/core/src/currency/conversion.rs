//! Amount conversion between currencies.

use rust_decimal::{Decimal, RoundingStrategy};

/// `amount * rate`, rounded half-to-even to the target currency's decimal places.
///
/// Products outside the representable range saturate.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    amount
        .saturating_mul(rate)
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}
