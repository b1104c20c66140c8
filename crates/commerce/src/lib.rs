//! BugStore Commerce - Cart and checkout pricing engine.
//!
//! This crate owns the one part of BugStore with real state management:
//! the shopping cart, the totals math, coupon resolution, and the ordered
//! checkout sequence that ends in atomic order placement. It has no HTTP
//! surface and no rendering concerns - the `server` crate binds these
//! operations to a JSON API.
//!
//! # Architecture
//!
//! - [`pricing`] - Pure totals computation. No I/O, deterministic.
//! - [`coupon`] - Coupon code resolution against a registry.
//! - [`cart`] - Session-scoped cart store. Every mutation is serialized
//!   per session and returns the updated items plus freshly computed
//!   totals.
//! - [`checkout`] - The Shipping → Payment → Review → Confirmed state
//!   machine, totals snapshotting, and idempotent order submission.
//! - [`collaborators`] - Trait seams for the catalog, coupon registry,
//!   and order placement service. The engine only ever reads catalog and
//!   coupon state; it never mutates it.
//! - [`order`] - Order types produced by placement.
//!
//! Reads flow one direction: cart items → pricing → totals. Checkout reads
//! the cart until Review, where it freezes a snapshot; that snapshot, not a
//! live recomputation, is what gets submitted.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod collaborators;
pub mod coupon;
pub mod error;
pub mod order;
pub mod pricing;

pub use cart::{Cart, CartStore, CartSummary, LineItem};
pub use checkout::{
    CheckoutOrchestrator, CheckoutSession, CheckoutStep, PaymentDetails, ShippingAddress,
};
pub use collaborators::{Catalog, CollaboratorError, CouponRegistry, OrderGateway, ProductQuote};
pub use coupon::{CouponRule, resolve_coupon};
pub use error::{CommerceError, Result};
pub use order::{Order, OrderOutcome, PlaceOrderRequest};
pub use pricing::{PricingConfig, ShippingPolicy, Totals, compute_totals};
