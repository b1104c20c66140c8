//! HTTP route handlers for the BugStore JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Health check
//!
//! # Cart
//! GET    /cart                    - Current items and totals
//! POST   /cart/add                - Add a product (merges quantities)
//! POST   /cart/update             - Replace a line's quantity
//! DELETE /cart/remove/{product_id} - Remove a line (idempotent)
//! DELETE /cart/clear              - Empty cart and reset discount
//! POST   /cart/apply-coupon       - Resolve and apply a coupon code
//!
//! # Checkout
//! POST   /checkout/begin          - Start (or restart) checkout
//! GET    /checkout                - Current checkout state
//! POST   /checkout/shipping       - Submit shipping address (→ payment)
//! POST   /checkout/payment        - Submit simulated payment (→ review)
//! POST   /checkout/back           - Step backward, keeping entered data
//! POST   /checkout/submit         - Place the order (→ confirmed)
//! ```
//!
//! Every cart mutation responds with the updated item list plus freshly
//! computed totals; clients never compute totals themselves.

pub mod cart;
pub mod checkout;
pub mod health;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove/{product_id}", delete(cart::remove))
        .route("/clear", delete(cart::clear))
        .route("/apply-coupon", post(cart::apply_coupon))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/begin", post(checkout::begin))
        .route("/shipping", post(checkout::shipping))
        .route("/payment", post(checkout::payment))
        .route("/back", post(checkout::back))
        .route("/submit", post(checkout::submit))
}

/// Assemble the full application router (without layers).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::check))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
