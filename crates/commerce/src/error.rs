//! Error taxonomy for the cart and checkout engine.
//!
//! Every failure carries the affected field or item so the presentation
//! layer can show a specific message instead of a generic error. Validation
//! failures never abort the shopper's session; `Transient` failures are safe
//! to retry because mutations only apply after collaborator responses are
//! known and order submission is deduplicated on its idempotency token.

use bugstore_core::ProductId;
use thiserror::Error;

use crate::checkout::CheckoutStep;
use crate::pricing::Totals;

/// Result type alias for the commerce engine.
pub type Result<T> = std::result::Result<T, CommerceError>;

/// Errors produced by cart and checkout operations.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// A line item violated a pricing invariant. The cart store never
    /// constructs such input, so this indicates a bug, not a user error.
    #[error("invalid line item for product {product_id}: {reason}")]
    InvalidLineItem {
        product_id: ProductId,
        reason: String,
    },

    /// The catalog could not price the product (unknown or out of stock).
    #[error("product {0} is unavailable")]
    ProductUnavailable(ProductId),

    /// A quantity update below 1 was requested. Removal is an explicit
    /// operation, never a side effect of update.
    #[error("invalid quantity {quantity} for product {product_id}: must be at least 1")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: u32,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// No coupon with this code exists.
    #[error("coupon code \"{0}\" was not found")]
    CouponNotFound(String),

    /// The coupon exists but has been retired or expired.
    #[error("coupon code \"{0}\" is no longer active")]
    CouponInactive(String),

    /// The shipping address is missing required fields.
    #[error("shipping address is incomplete: missing {}", missing.join(", "))]
    IncompleteAddress { missing: Vec<&'static str> },

    /// Simulated payment details failed format validation.
    #[error("payment details are invalid: {}", problems.join(", "))]
    InvalidPayment { problems: Vec<&'static str> },

    /// A checkout operation was attempted from the wrong step.
    #[error("checkout is at the {actual} step, expected {expected}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    /// The live cart no longer matches the reviewed snapshot. Carries the
    /// refreshed totals so Review can be re-displayed.
    #[error("cart changed since review")]
    CartChanged { current: Totals },

    /// Order placement was declined. Terminates this submission attempt
    /// only; the shopper returns to Review.
    #[error("order placement rejected: {reason}")]
    Rejected { reason: String },

    /// A collaborator call timed out or failed with a connectivity error.
    /// The cart is left in its pre-call state.
    #[error("transient collaborator failure: {source}")]
    Transient {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CommerceError {
    /// Stable machine-readable kind, used in API error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidLineItem { .. } => "invalid_line_item",
            Self::ProductUnavailable(_) => "product_unavailable",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::ItemNotFound(_) => "item_not_found",
            Self::CouponNotFound(_) => "coupon_not_found",
            Self::CouponInactive(_) => "coupon_inactive",
            Self::IncompleteAddress { .. } => "incomplete_address",
            Self::InvalidPayment { .. } => "invalid_payment",
            Self::WrongStep { .. } => "wrong_step",
            Self::CartChanged { .. } => "cart_changed",
            Self::Rejected { .. } => "rejected",
            Self::Transient { .. } => "transient",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = CommerceError::InvalidQuantity {
            product_id: ProductId::new(3),
            quantity: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid quantity 0 for product 3: must be at least 1"
        );

        let err = CommerceError::CouponNotFound("NOPE".to_string());
        assert_eq!(err.to_string(), "coupon code \"NOPE\" was not found");

        let err = CommerceError::IncompleteAddress {
            missing: vec!["city", "postal_code"],
        };
        assert_eq!(
            err.to_string(),
            "shipping address is incomplete: missing city, postal_code"
        );
    }

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(
            CommerceError::ItemNotFound(ProductId::new(1)).kind(),
            "item_not_found"
        );
        assert_eq!(
            CommerceError::Rejected {
                reason: "declined".to_string()
            }
            .kind(),
            "rejected"
        );
    }
}
