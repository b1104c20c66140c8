//! Pure totals computation.
//!
//! `compute_totals` is deterministic and side-effect free: the same items,
//! discount, tax rate, and shipping policy always produce the same totals.
//! That property is what lets the cart re-display totals idempotently and
//! lets order placement replay the computation server-side.
//!
//! Each derived field is rounded to 2 decimal places (half-up) exactly once,
//! at the end of its own formula. The discount applies to the subtotal only,
//! before tax and shipping; tax is charged on the discounted base.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bugstore_core::round_to_cents;

use crate::cart::LineItem;
use crate::error::{CommerceError, Result};

/// Monetary breakdown of a cart. All fields are derived and non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub shipping_amount: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// All-zero totals. An empty cart's real totals come from
    /// [`compute_totals`], which still applies the shipping policy.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            shipping_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Shipping rule applied to a subtotal.
///
/// The calculator treats this as an opaque function from subtotal to
/// shipping amount; policies never see individual line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShippingPolicy {
    /// The same fee for every order.
    Flat { fee: Decimal },
    /// Flat fee below the threshold, free at or above it.
    FreeAbove { threshold: Decimal, fee: Decimal },
}

impl ShippingPolicy {
    /// Shipping amount for the given subtotal.
    #[must_use]
    pub fn amount_for(&self, subtotal: Decimal) -> Decimal {
        match self {
            Self::Flat { fee } => *fee,
            Self::FreeAbove { threshold, fee } => {
                if subtotal >= *threshold {
                    Decimal::ZERO
                } else {
                    *fee
                }
            }
        }
    }
}

/// Tax rate and shipping policy used when recomputing cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Fractional tax rate, e.g. `0.08` for 8%.
    pub tax_rate: Decimal,
    pub shipping: ShippingPolicy,
}

/// Compute the totals breakdown for a set of line items.
///
/// `discount_percent` is the active whole-number discount in `[0, 100]`.
///
/// # Errors
///
/// Returns [`CommerceError::InvalidLineItem`] if any unit price is negative
/// or any quantity is zero. The cart store never constructs such items, so
/// hitting this is an invariant breach, not an expected runtime path.
pub fn compute_totals(
    items: &[LineItem],
    discount_percent: u8,
    config: &PricingConfig,
) -> Result<Totals> {
    let mut subtotal = Decimal::ZERO;
    for item in items {
        if item.unit_price < Decimal::ZERO {
            return Err(CommerceError::InvalidLineItem {
                product_id: item.product_id,
                reason: format!("negative unit price {}", item.unit_price),
            });
        }
        if item.quantity == 0 {
            return Err(CommerceError::InvalidLineItem {
                product_id: item.product_id,
                reason: "zero quantity".to_string(),
            });
        }
        subtotal += item.unit_price * Decimal::from(item.quantity);
    }
    let subtotal = round_to_cents(subtotal);

    let discount_amount =
        round_to_cents(subtotal * Decimal::from(discount_percent.min(100)) / Decimal::ONE_HUNDRED);
    let taxable = subtotal - discount_amount;
    let tax_amount = round_to_cents(taxable * config.tax_rate);
    let shipping_amount = round_to_cents(config.shipping.amount_for(subtotal));
    let total = round_to_cents(taxable + tax_amount + shipping_amount);

    Ok(Totals {
        subtotal,
        discount_amount,
        tax_amount,
        shipping_amount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use bugstore_core::ProductId;
    use rust_decimal_macros::dec;

    use super::*;

    fn item(id: i64, price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(id),
            product_name: format!("Bug {id}"),
            product_image: None,
            unit_price: price,
            quantity,
        }
    }

    fn flat_five_eight_percent() -> PricingConfig {
        PricingConfig {
            tax_rate: dec!(0.08),
            shipping: ShippingPolicy::Flat { fee: dec!(5.00) },
        }
    }

    #[test]
    fn test_single_item_no_discount() {
        // 19.99 x 2 = 39.98; 8% tax = 3.20; $5 flat shipping
        let totals = compute_totals(
            &[item(1, dec!(19.99), 2)],
            0,
            &flat_five_eight_percent(),
        )
        .expect("valid items");
        assert_eq!(totals.subtotal, dec!(39.98));
        assert_eq!(totals.discount_amount, dec!(0.00));
        assert_eq!(totals.tax_amount, dec!(3.20));
        assert_eq!(totals.shipping_amount, dec!(5.00));
        assert_eq!(totals.total, dec!(48.18));
    }

    #[test]
    fn test_ten_percent_discount_applies_before_tax() {
        // discount = 4.00; taxable base = 35.98; tax = 2.88
        let totals = compute_totals(
            &[item(1, dec!(19.99), 2)],
            10,
            &flat_five_eight_percent(),
        )
        .expect("valid items");
        assert_eq!(totals.discount_amount, dec!(4.00));
        assert_eq!(totals.tax_amount, dec!(2.88));
        assert_eq!(totals.shipping_amount, dec!(5.00));
        assert_eq!(totals.total, dec!(43.86));
    }

    #[test]
    fn test_order_independent() {
        let config = flat_five_eight_percent();
        let forward = [
            item(1, dec!(19.99), 2),
            item(2, dec!(45.00), 1),
            item(3, dec!(0.99), 7),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            compute_totals(&forward, 15, &config).expect("valid"),
            compute_totals(&reversed, 15, &config).expect("valid"),
        );
    }

    #[test]
    fn test_discount_bounded_by_subtotal() {
        let config = flat_five_eight_percent();
        for percent in [0u8, 1, 33, 50, 99, 100] {
            let totals =
                compute_totals(&[item(1, dec!(33.33), 3)], percent, &config).expect("valid");
            assert!(totals.discount_amount >= Decimal::ZERO);
            assert!(totals.discount_amount <= totals.subtotal);
        }
    }

    #[test]
    fn test_full_discount_still_charges_tax_free_base_and_shipping() {
        let totals = compute_totals(
            &[item(1, dec!(10.00), 1)],
            100,
            &flat_five_eight_percent(),
        )
        .expect("valid");
        assert_eq!(totals.discount_amount, dec!(10.00));
        assert_eq!(totals.tax_amount, dec!(0.00));
        assert_eq!(totals.total, dec!(5.00));
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let config = PricingConfig {
            tax_rate: dec!(0.08),
            shipping: ShippingPolicy::FreeAbove {
                threshold: dec!(100.00),
                fee: dec!(5.99),
            },
        };

        let below = compute_totals(&[item(1, dec!(45.00), 2)], 0, &config).expect("valid");
        assert_eq!(below.shipping_amount, dec!(5.99));

        let at = compute_totals(&[item(1, dec!(50.00), 2)], 0, &config).expect("valid");
        assert_eq!(at.shipping_amount, dec!(0.00));
    }

    #[test]
    fn test_rounding_not_cascaded() {
        // Two lines at 0.105 each: subtotal rounds once (0.21), discount and
        // tax are computed from the rounded subtotal, not from per-line
        // rounded values.
        let totals = compute_totals(
            &[item(1, dec!(0.105), 1), item(2, dec!(0.105), 1)],
            0,
            &PricingConfig {
                tax_rate: dec!(0.08),
                shipping: ShippingPolicy::Flat { fee: dec!(0.00) },
            },
        )
        .expect("valid");
        assert_eq!(totals.subtotal, dec!(0.21));
        assert_eq!(totals.tax_amount, dec!(0.02));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = compute_totals(
            &[item(1, dec!(-1.00), 1)],
            0,
            &flat_five_eight_percent(),
        );
        assert!(matches!(
            result,
            Err(CommerceError::InvalidLineItem { .. })
        ));
    }

    #[test]
    fn test_empty_cart_flat_shipping_applies() {
        let totals = compute_totals(&[], 0, &flat_five_eight_percent()).expect("valid");
        assert_eq!(totals.subtotal, dec!(0.00));
        assert_eq!(totals.total, dec!(5.00));
    }
}
