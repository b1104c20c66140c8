//! Integration tests for BugStore.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bugstore-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart lifecycle against the seeded collaborators
//! - `checkout_flow` - Checkout state machine, snapshotting, submission
//!
//! The harness wires the real engine to the server's in-process
//! collaborators - the same composition the binary runs, minus HTTP.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use bugstore_commerce::{
    CartStore, CheckoutOrchestrator, PaymentDetails, PricingConfig, ShippingAddress,
    ShippingPolicy,
};
use bugstore_server::services::{InMemoryCouponRegistry, OrderService, SeededCatalog};

/// A fully wired shop: cart store, order service, and orchestrator over the
/// seeded demo collaborators.
pub struct TestShop {
    pub store: Arc<CartStore>,
    pub orders: Arc<OrderService>,
    pub orchestrator: CheckoutOrchestrator,
}

impl TestShop {
    /// Build a shop with the given pricing rules.
    #[must_use]
    pub fn with_pricing(pricing: PricingConfig) -> Self {
        let store = Arc::new(CartStore::new(
            Arc::new(SeededCatalog::new()),
            Arc::new(InMemoryCouponRegistry::new()),
            pricing,
            Duration::from_secs(1),
        ));
        let orders = Arc::new(OrderService::new(Arc::clone(&store)));
        let orchestrator = CheckoutOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&orders) as _,
            Duration::from_secs(1),
        );
        Self {
            store,
            orders,
            orchestrator,
        }
    }

    /// 8% tax and a $5 flat shipping fee.
    #[must_use]
    pub fn flat_shipping() -> Self {
        Self::with_pricing(PricingConfig {
            tax_rate: dec!(0.08),
            shipping: ShippingPolicy::Flat { fee: dec!(5.00) },
        })
    }

    /// The demo defaults: 8% tax, $5.99 shipping, free at $100.
    #[must_use]
    pub fn demo() -> Self {
        Self::with_pricing(PricingConfig {
            tax_rate: dec!(0.08),
            shipping: ShippingPolicy::FreeAbove {
                threshold: dec!(100.00),
                fee: dec!(5.99),
            },
        })
    }
}

/// A complete demo shipping address.
#[must_use]
pub fn demo_address() -> ShippingAddress {
    ShippingAddress {
        name: "Curious Larva".to_string(),
        address_line: "12 Mound Way".to_string(),
        city: "Hivetown".to_string(),
        postal_code: "90210".to_string(),
        country: "USA".to_string(),
    }
}

/// Well-formed sandbox payment details.
#[must_use]
pub fn demo_payment() -> PaymentDetails {
    PaymentDetails {
        card_number: "4111-1111-1111-1111".to_string(),
        expiry: "12/30".to_string(),
        cvv: "123".to_string(),
    }
}
