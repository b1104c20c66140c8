//! Order types produced by placement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bugstore_core::{OrderId, OrderStatus, SessionKey};

use crate::cart::{CartSummary, LineItem};
use crate::checkout::{PaymentDetails, ShippingAddress};
use crate::pricing::Totals;

/// A placed order. Created atomically by the order placement service and
/// immutable afterwards except for status transitions, which fulfillment
/// owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Copy of the purchased line items, decoupled from the (now cleared)
    /// cart.
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    /// Copy of the reviewed totals; this is the charged amount.
    pub totals: Totals,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Everything the checkout orchestrator hands to the order placement
/// service at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub session_owner: SessionKey,
    pub shipping_address: ShippingAddress,
    /// The frozen cart snapshot from Review entry. The gateway revalidates
    /// the live cart against it before charging anything.
    pub snapshot: CartSummary,
    /// Simulated payment data; never persisted beyond the checkout session.
    pub payment: PaymentDetails,
    /// One token per checkout session; a retried submission with the same
    /// token returns the original order instead of creating a duplicate.
    pub idempotency_token: Uuid,
}

/// Outcome of an order placement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The order was created (or found again via the idempotency token).
    Placed(Order),
    /// The live cart no longer matches the snapshot; `current` carries the
    /// refreshed totals for re-review.
    CartChanged { current: Totals },
    /// Placement was declined.
    Rejected { reason: String },
}
