//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bugstore_core::SessionKey;
use bugstore_commerce::{CartStore, CheckoutOrchestrator, CheckoutSession};

use crate::config::ServerConfig;
use crate::services::{InMemoryCouponRegistry, OrderService, SeededCatalog};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// cart store, checkout orchestrator, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    cart_store: Arc<CartStore>,
    orders: Arc<OrderService>,
    orchestrator: CheckoutOrchestrator,
    /// In-flight checkout sessions, one per shopper session. The map lock
    /// is held only to find or create a handle; the per-session async lock
    /// serializes the checkout operations themselves.
    checkouts: Mutex<HashMap<SessionKey, Arc<tokio::sync::Mutex<CheckoutSession>>>>,
}

impl AppState {
    /// Wire the engine together from configuration: seeded catalog and
    /// coupon registry, the cart store over them, and the order service
    /// closing the loop back onto the live carts.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let cart_store = Arc::new(CartStore::new(
            Arc::new(SeededCatalog::new()),
            Arc::new(InMemoryCouponRegistry::new()),
            config.pricing(),
            config.collaborator_timeout,
        ));
        let orders = Arc::new(OrderService::new(Arc::clone(&cart_store)));
        let orchestrator = CheckoutOrchestrator::new(
            Arc::clone(&cart_store),
            Arc::clone(&orders) as _,
            config.collaborator_timeout,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart_store,
                orders,
                orchestrator,
                checkouts: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.cart_store
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the checkout orchestrator.
    #[must_use]
    pub fn orchestrator(&self) -> &CheckoutOrchestrator {
        &self.inner.orchestrator
    }

    /// Start (or restart) a checkout for this session, replacing any
    /// in-flight one.
    pub fn begin_checkout(&self, session: &SessionKey) -> Arc<tokio::sync::Mutex<CheckoutSession>> {
        let checkout = Arc::new(tokio::sync::Mutex::new(
            self.inner.orchestrator.begin(session),
        ));
        self.inner
            .checkouts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(session.clone(), Arc::clone(&checkout));
        checkout
    }

    /// The in-flight checkout for this session, if one was begun.
    #[must_use]
    pub fn checkout(&self, session: &SessionKey) -> Option<Arc<tokio::sync::Mutex<CheckoutSession>>> {
        self.inner
            .checkouts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(session)
            .cloned()
    }

    /// Drop a finished or abandoned checkout session.
    pub fn end_checkout(&self, session: &SessionKey) {
        self.inner
            .checkouts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(session);
    }
}
