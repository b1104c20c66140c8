//! Cart route handlers.
//!
//! Each mutation returns the full updated cart so the client can re-render
//! without a second request. The session cookie scopes the cart; the
//! handlers pass the session key explicitly into every store call.

use axum::{Json, extract::Path, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use bugstore_core::ProductId;
use bugstore_commerce::{CartSummary, LineItem, Totals};

use crate::error::Result;
use crate::middleware::session_key;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: Option<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_subtotal: Decimal,
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            product_image: line.product_image.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_subtotal: line.line_subtotal(),
        }
    }
}

/// Cart response: items plus authoritative totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemView>,
    pub applied_coupon_code: Option<String>,
    pub totals: Totals,
}

impl From<CartSummary> for CartResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            items: summary.items.iter().map(CartItemView::from).collect(),
            applied_coupon_code: summary.applied_coupon_code,
            totals: summary.totals,
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    pub quantity: Option<u32>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: i64,
    pub quantity: u32,
}

/// Apply coupon request body.
#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// Current cart contents and totals.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let key = session_key(&session).await?;
    let summary = state.carts().summary(&key).await?;
    Ok(Json(summary.into()))
}

/// Add a product to the cart, merging quantities if already present.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let key = session_key(&session).await?;
    let summary = state
        .carts()
        .add_item(&key, ProductId::new(body.product_id), body.quantity.unwrap_or(1))
        .await?;
    Ok(Json(summary.into()))
}

/// Replace a line item's quantity.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    let key = session_key(&session).await?;
    let summary = state
        .carts()
        .update_quantity(&key, ProductId::new(body.product_id), body.quantity)
        .await?;
    Ok(Json(summary.into()))
}

/// Remove a line item. Removing an absent product succeeds unchanged.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i64>,
) -> Result<Json<CartResponse>> {
    let key = session_key(&session).await?;
    let summary = state
        .carts()
        .remove_item(&key, ProductId::new(product_id))
        .await?;
    Ok(Json(summary.into()))
}

/// Empty the cart and reset any applied discount.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let key = session_key(&session).await?;
    let summary = state.carts().clear(&key).await?;
    Ok(Json(summary.into()))
}

/// Resolve a coupon code and apply its discount to this cart.
#[instrument(skip(state, session))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ApplyCouponRequest>,
) -> Result<Json<CartResponse>> {
    let key = session_key(&session).await?;
    let summary = state.carts().apply_coupon(&key, &body.code).await?;
    Ok(Json(summary.into()))
}
