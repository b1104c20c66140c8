//! Checkout route handlers.
//!
//! The checkout session lives server-side, keyed by the shopper's session;
//! handlers load it, drive the orchestrator one transition, and return the
//! new state. Payment details are accepted but never echoed back.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use bugstore_core::OrderId;
use bugstore_commerce::{
    CheckoutSession, CheckoutStep, PaymentDetails, ShippingAddress, Totals,
};

use crate::error::{AppError, Result};
use crate::middleware::session_key;
use crate::routes::cart::CartItemView;
use crate::state::AppState;

/// Checkout state returned by every checkout endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub shipping_address: Option<ShippingAddress>,
    /// The frozen review snapshot, present from Review on.
    pub reviewed_items: Option<Vec<CartItemView>>,
    pub reviewed_totals: Option<Totals>,
    pub order_id: Option<OrderId>,
}

impl From<&CheckoutSession> for CheckoutView {
    fn from(checkout: &CheckoutSession) -> Self {
        Self {
            step: checkout.step(),
            shipping_address: checkout.shipping_address().cloned(),
            reviewed_items: checkout
                .cart_snapshot()
                .map(|s| s.items.iter().map(CartItemView::from).collect()),
            reviewed_totals: checkout.cart_snapshot().map(|s| s.totals.clone()),
            order_id: checkout.placed_order().map(|o| o.id),
        }
    }
}

/// Shipping address request body.
#[derive(Debug, Deserialize)]
pub struct ShippingRequest {
    pub name: String,
    pub address_line: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<ShippingRequest> for ShippingAddress {
    fn from(body: ShippingRequest) -> Self {
        Self {
            name: body.name,
            address_line: body.address_line,
            city: body.city,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

/// Simulated payment request body. Sandbox only - nothing is charged.
#[derive(Deserialize)]
pub struct PaymentRequest {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

// Payment fields stay out of logs and error output.
impl std::fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("card_number", &"[REDACTED]")
            .field("expiry", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Order confirmation returned by a successful submit.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub message: String,
    pub order_id: OrderId,
    pub status: String,
    pub total_paid: rust_decimal::Decimal,
}

/// Start (or restart) a checkout for this session.
#[instrument(skip(state, session))]
pub async fn begin(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    let key = session_key(&session).await?;
    let handle = state.begin_checkout(&key);
    let checkout = handle.lock().await;
    Ok(Json(CheckoutView::from(&*checkout)))
}

/// Current checkout state.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    let key = session_key(&session).await?;
    let handle = state
        .checkout(&key)
        .ok_or_else(|| AppError::NotFound("no checkout in progress".to_string()))?;
    let checkout = handle.lock().await;
    Ok(Json(CheckoutView::from(&*checkout)))
}

/// Submit the shipping address and advance to Payment.
#[instrument(skip(state, session, body))]
pub async fn shipping(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ShippingRequest>,
) -> Result<Json<CheckoutView>> {
    let key = session_key(&session).await?;
    let handle = state
        .checkout(&key)
        .ok_or_else(|| AppError::NotFound("no checkout in progress".to_string()))?;
    let mut checkout = handle.lock().await;
    state
        .orchestrator()
        .submit_shipping(&mut checkout, body.into())?;
    Ok(Json(CheckoutView::from(&*checkout)))
}

/// Submit simulated payment details and advance to Review, freezing the
/// cart snapshot.
#[instrument(skip(state, session, body))]
pub async fn payment(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<PaymentRequest>,
) -> Result<Json<CheckoutView>> {
    let key = session_key(&session).await?;
    let handle = state
        .checkout(&key)
        .ok_or_else(|| AppError::NotFound("no checkout in progress".to_string()))?;
    let mut checkout = handle.lock().await;
    let details = PaymentDetails {
        card_number: body.card_number,
        expiry: body.expiry,
        cvv: body.cvv,
    };
    state
        .orchestrator()
        .submit_payment(&mut checkout, details)
        .await?;
    Ok(Json(CheckoutView::from(&*checkout)))
}

/// Step backward one step without discarding entered data.
#[instrument(skip(state, session))]
pub async fn back(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    let key = session_key(&session).await?;
    let handle = state
        .checkout(&key)
        .ok_or_else(|| AppError::NotFound("no checkout in progress".to_string()))?;
    let mut checkout = handle.lock().await;
    state.orchestrator().step_back(&mut checkout)?;
    Ok(Json(CheckoutView::from(&*checkout)))
}

/// Place the order from the reviewed snapshot.
#[instrument(skip(state, session))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<OrderConfirmation>> {
    let key = session_key(&session).await?;
    let handle = state
        .checkout(&key)
        .ok_or_else(|| AppError::NotFound("no checkout in progress".to_string()))?;
    let mut checkout = handle.lock().await;
    let order = state.orchestrator().submit_order(&mut checkout).await?;
    drop(checkout);
    state.end_checkout(&key);

    Ok(Json(OrderConfirmation {
        message: "Deployment successful! Your bugs are on the way.".to_string(),
        order_id: order.id,
        status: order.status.to_string(),
        total_paid: order.totals.total,
    }))
}
