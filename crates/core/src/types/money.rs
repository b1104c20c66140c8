//! Money rounding for derived totals.
//!
//! All monetary amounts in BugStore are `rust_decimal::Decimal` values in the
//! currency's standard unit (dollars, not cents). Derived fields (discount,
//! tax, totals) are rounded exactly once, at the end of their formula, so
//! rounding error never cascades through the subtotal → discount → tax chain.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to 2 decimal places, half-up.
///
/// `19.985` rounds to `19.99`, `3.1984` to `3.20`.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_to_cents(dec!(19.985)), dec!(19.99));
        assert_eq!(round_to_cents(dec!(19.984)), dec!(19.98));
    }

    #[test]
    fn test_round_exact_values_unchanged() {
        assert_eq!(round_to_cents(dec!(39.98)), dec!(39.98));
        assert_eq!(round_to_cents(dec!(0)), dec!(0));
    }

    #[test]
    fn test_round_tax_scenario() {
        // 39.98 * 0.08 = 3.1984
        assert_eq!(round_to_cents(dec!(39.98) * dec!(0.08)), dec!(3.20));
        // 39.98 * 0.10 = 3.998
        assert_eq!(round_to_cents(dec!(39.98) * dec!(0.10)), dec!(4.00));
    }
}
