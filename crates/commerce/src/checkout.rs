//! Checkout state machine and order submission.
//!
//! A checkout session walks Shipping → Payment → Review → Confirmed, one
//! step at a time. Going back is always allowed and never discards entered
//! data; going forward requires the prior step's fields. Entering Review
//! freezes a snapshot of the cart's items and totals - that snapshot, not a
//! live recomputation, is what gets submitted, so the cart cannot drift
//! between what the shopper reviewed and what they are charged without the
//! gateway noticing.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use bugstore_core::SessionKey;

use crate::cart::{CartStore, CartSummary};
use crate::collaborators::{OrderGateway, with_timeout};
use crate::error::{CommerceError, Result};
use crate::order::{Order, OrderOutcome, PlaceOrderRequest};

/// Where a checkout session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
    Confirmed,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Payment => write!(f, "payment"),
            Self::Review => write!(f, "review"),
            Self::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Destination address collected at the Shipping step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub address_line: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Syntactic completeness check: every field non-blank.
    ///
    /// # Errors
    ///
    /// [`CommerceError::IncompleteAddress`] naming each missing field.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("name", &self.name),
            ("address_line", &self.address_line),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::IncompleteAddress { missing })
        }
    }
}

/// Simulated payment data collected at the Payment step. Format-checked
/// only - this is a sandbox layer, nothing is charged and nothing is
/// persisted beyond the checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl PaymentDetails {
    /// Format validation: card number 12-19 digits (separators allowed),
    /// expiry `MM/YY`, CVV 3-4 digits.
    ///
    /// # Errors
    ///
    /// [`CommerceError::InvalidPayment`] naming each bad field.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let digits: String = self
            .card_number
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        if !(12..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            problems.push("card_number must be 12-19 digits");
        }

        let expiry_ok = matches!(
            self.expiry.split_once('/'),
            Some((month, year))
                if month.len() == 2
                    && year.len() == 2
                    && month.chars().all(|c| c.is_ascii_digit())
                    && year.chars().all(|c| c.is_ascii_digit())
                    && (1..=12).contains(&month.parse::<u8>().unwrap_or(0))
        );
        if !expiry_ok {
            problems.push("expiry must be MM/YY");
        }

        if !(3..=4).contains(&self.cvv.len()) || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            problems.push("cvv must be 3-4 digits");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::InvalidPayment { problems })
        }
    }
}

/// One shopper's in-flight checkout. Created when checkout begins and
/// dropped on confirmation or abandonment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    session_owner: SessionKey,
    step: CheckoutStep,
    shipping_address: Option<ShippingAddress>,
    payment_details: Option<PaymentDetails>,
    /// Frozen at Review entry; refreshed only by re-entering Review or by a
    /// `CartChanged` response.
    cart_snapshot: Option<CartSummary>,
    /// One token per checkout session, so a retried submission has at most
    /// one effect.
    idempotency_token: Uuid,
    /// Set once submission succeeds.
    placed_order: Option<Order>,
}

impl CheckoutSession {
    fn new(session_owner: SessionKey) -> Self {
        Self {
            session_owner,
            step: CheckoutStep::Shipping,
            shipping_address: None,
            payment_details: None,
            cart_snapshot: None,
            idempotency_token: Uuid::new_v4(),
            placed_order: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub fn shipping_address(&self) -> Option<&ShippingAddress> {
        self.shipping_address.as_ref()
    }

    #[must_use]
    pub fn cart_snapshot(&self) -> Option<&CartSummary> {
        self.cart_snapshot.as_ref()
    }

    #[must_use]
    pub const fn idempotency_token(&self) -> Uuid {
        self.idempotency_token
    }

    #[must_use]
    pub fn placed_order(&self) -> Option<&Order> {
        self.placed_order.as_ref()
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CommerceError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}

/// Drives checkout sessions against the cart store and order gateway.
///
/// The orchestrator reads the cart read-only until the final submission,
/// where it hands the frozen snapshot to order placement; the gateway
/// revalidates the live cart against that snapshot before creating
/// anything.
pub struct CheckoutOrchestrator {
    store: Arc<CartStore>,
    orders: Arc<dyn OrderGateway>,
    call_timeout: Duration,
}

impl CheckoutOrchestrator {
    #[must_use]
    pub fn new(store: Arc<CartStore>, orders: Arc<dyn OrderGateway>, call_timeout: Duration) -> Self {
        Self {
            store,
            orders,
            call_timeout,
        }
    }

    /// Begin a fresh checkout at the Shipping step.
    #[must_use]
    pub fn begin(&self, session: &SessionKey) -> CheckoutSession {
        CheckoutSession::new(session.clone())
    }

    /// Shipping → Payment. Requires a syntactically complete address.
    ///
    /// # Errors
    ///
    /// [`CommerceError::IncompleteAddress`] or [`CommerceError::WrongStep`].
    #[instrument(skip_all, fields(session = %checkout.session_owner))]
    pub fn submit_shipping(
        &self,
        checkout: &mut CheckoutSession,
        address: ShippingAddress,
    ) -> Result<CheckoutStep> {
        checkout.expect_step(CheckoutStep::Shipping)?;
        address.validate()?;
        checkout.shipping_address = Some(address);
        checkout.step = CheckoutStep::Payment;
        Ok(checkout.step)
    }

    /// Payment → Review. Requires well-formed simulated payment fields; on
    /// success the current cart items and totals are frozen as the review
    /// snapshot.
    ///
    /// # Errors
    ///
    /// [`CommerceError::InvalidPayment`], [`CommerceError::WrongStep`], or
    /// any failure recomputing the cart summary.
    #[instrument(skip_all, fields(session = %checkout.session_owner))]
    pub async fn submit_payment(
        &self,
        checkout: &mut CheckoutSession,
        payment: PaymentDetails,
    ) -> Result<CheckoutStep> {
        checkout.expect_step(CheckoutStep::Payment)?;
        payment.validate()?;

        let snapshot = self.store.summary(&checkout.session_owner).await?;
        checkout.payment_details = Some(payment);
        checkout.cart_snapshot = Some(snapshot);
        checkout.step = CheckoutStep::Review;
        Ok(checkout.step)
    }

    /// Step backward one step. Always permitted before confirmation, and
    /// never discards entered data; a stale review snapshot is dropped so
    /// re-entering Review freezes a fresh one.
    ///
    /// # Errors
    ///
    /// [`CommerceError::WrongStep`] once the checkout is confirmed.
    pub fn step_back(&self, checkout: &mut CheckoutSession) -> Result<CheckoutStep> {
        checkout.step = match checkout.step {
            CheckoutStep::Shipping => CheckoutStep::Shipping,
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Review => {
                checkout.cart_snapshot = None;
                CheckoutStep::Payment
            }
            CheckoutStep::Confirmed => {
                return Err(CommerceError::WrongStep {
                    expected: CheckoutStep::Review,
                    actual: CheckoutStep::Confirmed,
                });
            }
        };
        Ok(checkout.step)
    }

    /// Review → Confirmed: one idempotent order placement call with the
    /// frozen snapshot.
    ///
    /// On success the checkout is confirmed and the cart is cleared. If the
    /// gateway reports the live cart no longer matches the snapshot, the
    /// checkout stays at Review with the snapshot refreshed to the current
    /// cart, and the refreshed totals are surfaced in the error. A
    /// transient failure leaves the token unchanged, so the caller can
    /// retry the same submission safely.
    ///
    /// # Errors
    ///
    /// [`CommerceError::WrongStep`], [`CommerceError::CartChanged`],
    /// [`CommerceError::Rejected`], or [`CommerceError::Transient`].
    #[instrument(skip_all, fields(session = %checkout.session_owner, token = %checkout.idempotency_token))]
    pub async fn submit_order(&self, checkout: &mut CheckoutSession) -> Result<Order> {
        checkout.expect_step(CheckoutStep::Review)?;

        // These are set on the way to Review; expect_step makes missing ones
        // unreachable.
        let (Some(address), Some(payment), Some(snapshot)) = (
            checkout.shipping_address.clone(),
            checkout.payment_details.clone(),
            checkout.cart_snapshot.clone(),
        ) else {
            return Err(CommerceError::WrongStep {
                expected: CheckoutStep::Review,
                actual: checkout.step,
            });
        };

        let request = PlaceOrderRequest {
            session_owner: checkout.session_owner.clone(),
            shipping_address: address,
            snapshot,
            payment,
            idempotency_token: checkout.idempotency_token,
        };

        let outcome = with_timeout(self.call_timeout, self.orders.place_order(request)).await?;

        match outcome {
            OrderOutcome::Placed(order) => {
                checkout.step = CheckoutStep::Confirmed;
                checkout.placed_order = Some(order.clone());
                self.store.clear(&checkout.session_owner).await?;
                tracing::info!(order_id = %order.id, "order placed");
                Ok(order)
            }
            OrderOutcome::CartChanged { current } => {
                // Stay at Review, but show the shopper what the cart looks
                // like now.
                checkout.cart_snapshot =
                    Some(self.store.summary(&checkout.session_owner).await?);
                tracing::warn!("cart changed between review and submission");
                Err(CommerceError::CartChanged { current })
            }
            OrderOutcome::Rejected { reason } => {
                tracing::warn!(%reason, "order placement rejected");
                Err(CommerceError::Rejected { reason })
            }
        }
    }
}
