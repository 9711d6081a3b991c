//! Rounding primitives of the statutory cost rules.
//!
//! Each rule in the cost ladder rounds in a specific way, and the results
//! feed later rules, so the primitives are kept in one place and named for
//! what they do.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of days every month counts for under the base-30 convention.
pub const BASE_MONTH_DAYS: u32 = 30;

const THOUSAND: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a positive amount up to the next multiple of 1000.
///
/// Zero and negative amounts are returned unchanged. Returns `None` when
/// the rounded amount does not fit in a [`Decimal`].
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::ceil_to_thousand;
/// use rust_decimal::Decimal;
///
/// assert_eq!(ceil_to_thousand(Decimal::from(1_234_567)), Some(Decimal::from(1_235_000)));
/// assert_eq!(ceil_to_thousand(Decimal::from(3_000_000)), Some(Decimal::from(3_000_000)));
/// assert_eq!(ceil_to_thousand(Decimal::ZERO), Some(Decimal::ZERO));
/// assert_eq!(ceil_to_thousand(Decimal::MAX), None);
/// ```
pub fn ceil_to_thousand(amount: Decimal) -> Option<Decimal> {
    if amount > Decimal::ZERO {
        (amount / THOUSAND).ceil().checked_mul(THOUSAND)
    } else {
        Some(amount)
    }
}

/// Rounds to the nearest integer, halves away from zero.
pub fn round_half_up(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest integer, halves to the even neighbour.
pub fn round_half_even(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Rounds to the nearest multiple of 100, halves up.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_hundred;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_hundred(Decimal::from(15_649)), Decimal::from(15_600));
/// assert_eq!(round_hundred(Decimal::from(15_650)), Decimal::from(15_700));
/// ```
pub fn round_hundred(amount: Decimal) -> Decimal {
    round_half_up(amount / HUNDRED) * HUNDRED
}

/// Apportions a monthly total to `days` base-30 days, halves to even.
///
/// `amount` is a priced full-month value, bounded by
/// [`MAX_MONTHLY_COST`](super::MAX_MONTHLY_COST), so the product cannot
/// overflow.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::apportion_total;
/// use rust_decimal::Decimal;
///
/// assert_eq!(apportion_total(Decimal::from(4_681_300), 6), Decimal::from(936_260));
/// assert_eq!(apportion_total(Decimal::from(75), 1), Decimal::from(2));
/// ```
pub fn apportion_total(amount: Decimal, days: u32) -> Decimal {
    round_half_even(amount * Decimal::from(days) / Decimal::from(BASE_MONTH_DAYS))
}

/// Apportions one cost component to `days` base-30 days, halves up.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::apportion_component;
/// use rust_decimal::Decimal;
///
/// assert_eq!(apportion_component(Decimal::from(75), 1), Decimal::from(3));
/// ```
pub fn apportion_component(amount: Decimal, days: u32) -> Decimal {
    round_half_up(amount * Decimal::from(days) / Decimal::from(BASE_MONTH_DAYS))
}
