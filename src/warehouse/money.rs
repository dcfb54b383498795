//! Currency arithmetic
//!
//! All money is exact decimal. Rounding is half away from zero to two
//! places, matching SQL `ROUND(x, 2)`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for currency values
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds a currency value to two decimal places.
///
/// The result always carries exactly two places so `10` renders as `10.00`.
pub fn round_currency(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

/// Mean of `count` values summing to `sum`, rounded after division.
///
/// Returns `None` for an empty group.
pub fn rounded_average(sum: Decimal, count: u64) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some(round_currency(sum / Decimal::from(count)))
}

/// `part / whole * 100` rounded to two places.
///
/// Returns `None` when `whole` is zero or the ratio is out of range.
pub fn rounded_percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(round_currency)
}
