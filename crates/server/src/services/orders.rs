//! Order placement service.
//!
//! This is the authoritative side of checkout: it never trusts the
//! submitted snapshot on its own, but re-reads the live cart and only
//! places the order when the two still agree. Submissions are deduplicated
//! on the checkout session's idempotency token, so a retry after a timeout
//! returns the original order instead of charging twice.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use bugstore_core::{OrderId, OrderStatus};
use bugstore_commerce::{
    CartStore, CollaboratorError, Order, OrderGateway, OrderOutcome, PlaceOrderRequest,
};

/// In-process order placement backed by the live cart store.
pub struct OrderService {
    store: Arc<CartStore>,
    next_id: AtomicI64,
    /// Placed orders by idempotency token. One entry per confirmed
    /// checkout; the token space is per checkout session, so this doubles
    /// as the order log.
    placed: Mutex<HashMap<Uuid, Order>>,
}

impl OrderService {
    #[must_use]
    pub fn new(store: Arc<CartStore>) -> Self {
        Self {
            store,
            next_id: AtomicI64::new(1),
            placed: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a previously placed order by its idempotency token.
    pub async fn find_by_token(&self, token: Uuid) -> Option<Order> {
        self.placed.lock().await.get(&token).cloned()
    }
}

#[async_trait]
impl OrderGateway for OrderService {
    async fn place_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderOutcome, CollaboratorError> {
        // Holding the map lock across the whole call makes placement atomic
        // with respect to concurrent retries of the same token.
        let mut placed = self.placed.lock().await;

        if let Some(existing) = placed.get(&request.idempotency_token) {
            tracing::debug!(token = %request.idempotency_token, order_id = %existing.id,
                "duplicate submission, returning original order");
            return Ok(OrderOutcome::Placed(existing.clone()));
        }

        // Authoritative recomputation from the live cart, never the client's
        // numbers.
        let live = self
            .store
            .summary(&request.session_owner)
            .await
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        // Snapshot drift outranks emptiness: a cart emptied after Review is
        // a change to reconcile, not a rejection. Only a snapshot that was
        // already empty at Review gets rejected outright.
        if live.items != request.snapshot.items || live.totals != request.snapshot.totals {
            return Ok(OrderOutcome::CartChanged {
                current: live.totals,
            });
        }

        if live.items.is_empty() {
            return Ok(OrderOutcome::Rejected {
                reason: "cart is empty".to_string(),
            });
        }

        let order = Order {
            id: OrderId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            items: live.items,
            shipping_address: request.shipping_address,
            totals: live.totals,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        placed.insert(request.idempotency_token, order.clone());
        tracing::info!(order_id = %order.id, total = %order.totals.total, "order created");

        Ok(OrderOutcome::Placed(order))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use bugstore_core::{ProductId, SessionKey};
    use bugstore_commerce::{PaymentDetails, PricingConfig, ShippingAddress, ShippingPolicy};

    use crate::services::{InMemoryCouponRegistry, SeededCatalog};

    use super::*;

    fn store() -> Arc<CartStore> {
        Arc::new(CartStore::new(
            Arc::new(SeededCatalog::new()),
            Arc::new(InMemoryCouponRegistry::new()),
            PricingConfig {
                tax_rate: dec!(0.08),
                shipping: ShippingPolicy::Flat { fee: dec!(5.00) },
            },
            Duration::from_secs(1),
        ))
    }

    fn request(
        session: SessionKey,
        snapshot: bugstore_commerce::CartSummary,
    ) -> PlaceOrderRequest {
        PlaceOrderRequest {
            session_owner: session,
            shipping_address: ShippingAddress {
                name: "Curious Larva".to_string(),
                address_line: "12 Mound Way".to_string(),
                city: "Hivetown".to_string(),
                postal_code: "90210".to_string(),
                country: "USA".to_string(),
            },
            snapshot,
            payment: PaymentDetails {
                card_number: "4111-1111-1111-1111".to_string(),
                expiry: "12/30".to_string(),
                cvv: "123".to_string(),
            },
            idempotency_token: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_cart_emptied_after_review_is_cart_changed_not_rejected() {
        let store = store();
        let service = OrderService::new(Arc::clone(&store));
        let session = SessionKey::from("shopper");

        store
            .add_item(&session, ProductId::new(9), 2)
            .await
            .expect("add");
        let snapshot = store.summary(&session).await.expect("summary");
        store.clear(&session).await.expect("clear");

        let outcome = service
            .place_order(request(session, snapshot))
            .await
            .expect("gateway ok");
        assert!(matches!(outcome, OrderOutcome::CartChanged { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_empty_at_review_is_rejected() {
        let store = store();
        let service = OrderService::new(Arc::clone(&store));
        let session = SessionKey::from("shopper");

        let snapshot = store.summary(&session).await.expect("summary");

        let outcome = service
            .place_order(request(session, snapshot))
            .await
            .expect("gateway ok");
        assert!(matches!(outcome, OrderOutcome::Rejected { reason } if reason == "cart is empty"));
    }
}
