//! Trait seams for the engine's external collaborators.
//!
//! The catalog, coupon registry, and order placement service are owned
//! elsewhere; the engine consumes them behind object-safe async traits so
//! the server can wire in real implementations and tests can substitute
//! fakes. Every call that crosses one of these seams is bounded by a
//! timeout; on timeout the operation fails transiently and the cart is
//! left in its pre-call state.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bugstore_core::ProductId;

use crate::coupon::CouponRule;
use crate::error::CommerceError;
use crate::order::{OrderOutcome, PlaceOrderRequest};

/// Failure of a collaborator call, distinct from domain failures.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// The call did not complete within the configured deadline.
    #[error("collaborator call timed out after {0:?}")]
    Timeout(Duration),

    /// The collaborator reported a connectivity or internal failure.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

impl From<CollaboratorError> for CommerceError {
    fn from(err: CollaboratorError) -> Self {
        Self::Transient {
            source: Box::new(err),
        }
    }
}

/// A product priced by the catalog at the moment of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuote {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: Decimal,
}

/// Read-only product pricing. Availability is the catalog's decision; the
/// cart store only surfaces it.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Price a product, or `None` if it cannot currently be sold.
    async fn unit_price(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductQuote>, CollaboratorError>;
}

/// Read-only registry of issued coupon codes.
#[async_trait]
pub trait CouponRegistry: Send + Sync {
    /// Look up a code (already upper-cased), or `None` if never issued.
    async fn lookup(&self, code: &str) -> Result<Option<CouponRule>, CollaboratorError>;
}

/// Order placement service. Must revalidate the live cart against the
/// submitted snapshot and deduplicate on the idempotency token.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn place_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderOutcome, CollaboratorError>;
}

/// Bound a collaborator future by a deadline.
pub async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, CollaboratorError>> + Send,
) -> Result<T, CollaboratorError> {
    (tokio::time::timeout(limit, fut).await).map_or(Err(CollaboratorError::Timeout(limit)), |r| r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_through() {
        let result = with_timeout(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.expect("fast future completes"), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result: Result<(), _> = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(CollaboratorError::Timeout(_))));
    }

    #[test]
    fn test_collaborator_error_maps_to_transient() {
        let err: CommerceError = CollaboratorError::Unavailable("down".to_string()).into();
        assert_eq!(err.kind(), "transient");
    }
}
