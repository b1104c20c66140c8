//! Session-scoped cart store.
//!
//! One cart per session key, created empty on first access. Mutations on
//! the same session are serialized behind a per-session async lock, so no
//! two concurrent operations can interleave partially; carts for different
//! sessions share nothing and proceed in parallel. Collaborator responses
//! are awaited before any cart state changes, so a timed-out call leaves
//! the cart exactly as it was.
//!
//! Totals are never stored. Every operation recomputes them from the item
//! list and returns them alongside it, so callers never do pricing math
//! themselves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bugstore_core::{ProductId, SessionKey, round_to_cents};

use crate::collaborators::{Catalog, CouponRegistry, with_timeout};
use crate::coupon::resolve_coupon;
use crate::error::{CommerceError, Result};
use crate::pricing::{PricingConfig, Totals, compute_totals};

/// One product entry in a cart.
///
/// The unit price is snapshotted from the catalog when the product is first
/// added; later catalog price changes do not reprice lines already in the
/// cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: Option<String>,
    pub unit_price: Decimal,
    /// Always >= 1. Reducing below 1 is rejected; removal is explicit.
    pub quantity: u32,
}

impl LineItem {
    /// Price of this line: `unit_price * quantity`, rounded to cents.
    #[must_use]
    pub fn line_subtotal(&self) -> Decimal {
        round_to_cents(self.unit_price * Decimal::from(self.quantity))
    }
}

/// A shopper's cart: ordered line items plus the active discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    session_owner: SessionKey,
    /// Insertion order is display order.
    items: Vec<LineItem>,
    /// Whole-number percentage in `[0, 100]`; 0 means no discount.
    applied_discount_percent: u8,
    /// Code behind the active discount, echoed back to the shopper.
    applied_coupon_code: Option<String>,
}

impl Cart {
    fn new(session_owner: SessionKey) -> Self {
        Self {
            session_owner,
            items: Vec::new(),
            applied_discount_percent: 0,
            applied_coupon_code: None,
        }
    }

    #[must_use]
    pub fn session_owner(&self) -> &SessionKey {
        &self.session_owner
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub const fn applied_discount_percent(&self) -> u8 {
        self.applied_discount_percent
    }

    #[must_use]
    pub fn applied_coupon_code(&self) -> Option<&str> {
        self.applied_coupon_code.as_deref()
    }

    fn summary(&self, pricing: &PricingConfig) -> Result<CartSummary> {
        let totals = compute_totals(&self.items, self.applied_discount_percent, pricing)?;
        Ok(CartSummary {
            items: self.items.clone(),
            applied_coupon_code: self.applied_coupon_code.clone(),
            totals,
        })
    }
}

/// Item list plus freshly computed totals, returned by every cart
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    pub applied_coupon_code: Option<String>,
    pub totals: Totals,
}

/// Owns every session's cart and serializes mutations per session.
///
/// Cheap to share: clone an `Arc<CartStore>` into each handler. The outer
/// map lock is held only long enough to find or create a cart handle; the
/// per-cart async lock is what serializes operations, including across the
/// collaborator awaits inside them (FIFO per session).
pub struct CartStore {
    catalog: Arc<dyn Catalog>,
    coupons: Arc<dyn CouponRegistry>,
    pricing: PricingConfig,
    call_timeout: Duration,
    carts: Mutex<HashMap<SessionKey, Arc<tokio::sync::Mutex<Cart>>>>,
}

impl CartStore {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn Catalog>,
        coupons: Arc<dyn CouponRegistry>,
        pricing: PricingConfig,
        call_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            coupons,
            pricing,
            call_timeout,
            carts: Mutex::new(HashMap::new()),
        }
    }

    /// The pricing rules this store recomputes totals with.
    #[must_use]
    pub const fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Find or create the cart handle for a session.
    ///
    /// The map lock is never held across an await.
    fn cart_handle(&self, session: &SessionKey) -> Arc<tokio::sync::Mutex<Cart>> {
        let mut carts = self.carts.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(
            carts
                .entry(session.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Cart::new(session.clone())))),
        )
    }

    /// Current items and totals without mutating anything.
    ///
    /// # Errors
    ///
    /// Only [`CommerceError::InvalidLineItem`], and only if a cart invariant
    /// was somehow broken.
    pub async fn summary(&self, session: &SessionKey) -> Result<CartSummary> {
        let handle = self.cart_handle(session);
        let cart = handle.lock().await;
        cart.summary(&self.pricing)
    }

    /// Add a product to the cart, merging quantities if it is already
    /// present. New lines are appended with the catalog's current price
    /// snapshotted.
    ///
    /// # Errors
    ///
    /// - [`CommerceError::InvalidQuantity`] if `quantity` is 0.
    /// - [`CommerceError::ProductUnavailable`] if the catalog cannot price
    ///   the product.
    /// - [`CommerceError::Transient`] if the catalog call fails or times
    ///   out; the cart is unchanged.
    #[instrument(skip(self), fields(session = %session))]
    pub async fn add_item(
        &self,
        session: &SessionKey,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartSummary> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity {
                product_id,
                quantity,
            });
        }

        let handle = self.cart_handle(session);
        let mut cart = handle.lock().await;

        // Resolve the price before touching cart state.
        let quote = with_timeout(self.call_timeout, self.catalog.unit_price(product_id))
            .await?
            .ok_or(CommerceError::ProductUnavailable(product_id))?;

        if let Some(line) = cart.items.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            cart.items.push(LineItem {
                product_id,
                product_name: quote.name,
                product_image: quote.image,
                unit_price: quote.unit_price,
                quantity,
            });
        }

        tracing::debug!(%product_id, quantity, "item added to cart");
        cart.summary(&self.pricing)
    }

    /// Replace a line item's quantity.
    ///
    /// # Errors
    ///
    /// - [`CommerceError::InvalidQuantity`] if `quantity` is 0 - removal is
    ///   an explicit operation, never an update side effect.
    /// - [`CommerceError::ItemNotFound`] if the product is not in the cart.
    #[instrument(skip(self), fields(session = %session))]
    pub async fn update_quantity(
        &self,
        session: &SessionKey,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartSummary> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity {
                product_id,
                quantity,
            });
        }

        let handle = self.cart_handle(session);
        let mut cart = handle.lock().await;

        let line = cart
            .items
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CommerceError::ItemNotFound(product_id))?;
        line.quantity = quantity;

        cart.summary(&self.pricing)
    }

    /// Remove a line item. Removing a product that is not in the cart is a
    /// successful no-op, which keeps retry-after-timeout simple.
    #[instrument(skip(self), fields(session = %session))]
    pub async fn remove_item(
        &self,
        session: &SessionKey,
        product_id: ProductId,
    ) -> Result<CartSummary> {
        let handle = self.cart_handle(session);
        let mut cart = handle.lock().await;
        cart.items.retain(|l| l.product_id != product_id);
        cart.summary(&self.pricing)
    }

    /// Empty the cart and reset the discount. Idempotent.
    #[instrument(skip(self), fields(session = %session))]
    pub async fn clear(&self, session: &SessionKey) -> Result<CartSummary> {
        let handle = self.cart_handle(session);
        let mut cart = handle.lock().await;
        cart.items.clear();
        cart.applied_discount_percent = 0;
        cart.applied_coupon_code = None;
        cart.summary(&self.pricing)
    }

    /// Resolve a coupon code and apply its discount, replacing any
    /// previously applied one. On failure the cart is left unchanged and
    /// the specific failure (not found vs. inactive) is surfaced.
    ///
    /// # Errors
    ///
    /// - [`CommerceError::CouponNotFound`] / [`CommerceError::CouponInactive`]
    ///   from resolution.
    /// - [`CommerceError::Transient`] if the registry call fails or times
    ///   out.
    #[instrument(skip(self), fields(session = %session))]
    pub async fn apply_coupon(&self, session: &SessionKey, code: &str) -> Result<CartSummary> {
        let handle = self.cart_handle(session);
        let mut cart = handle.lock().await;

        let rule = with_timeout(self.call_timeout, async {
            Ok(resolve_coupon(self.coupons.as_ref(), code).await)
        })
        .await??;

        tracing::debug!(code = %rule.code, percent = rule.discount_percent, "coupon applied");
        cart.applied_discount_percent = rule.discount_percent.min(100);
        cart.applied_coupon_code = Some(rule.code);
        cart.summary(&self.pricing)
    }
}
