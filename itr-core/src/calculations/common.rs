//! Common utility functions for tax calculations.
//!
//! Rupee amounts leave the engine as whole rupees, always rounded down.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value down to a whole rupee.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::round_down_rupee;
///
/// assert_eq!(round_down_rupee(dec!(2450.99)), dec!(2450));
/// assert_eq!(round_down_rupee(dec!(61250)), dec!(61250));
/// assert_eq!(round_down_rupee(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_down_rupee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::ToNegativeInfinity)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps negative values to zero.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Limits a claimed amount to its statutory cap, in whole rupees.
pub fn capped(
    claimed: Decimal,
    limit: Decimal,
) -> Decimal {
    round_down_rupee(claimed.min(limit))
}
