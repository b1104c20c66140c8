//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session supplies
//! the opaque key that scopes a shopper's cart; authentication is an
//! external concern and not handled here.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use bugstore_core::SessionKey;

use crate::error::{AppError, Result};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bugstore_session";

/// Session key under which the cart owner key is stored.
const CART_SESSION_KEY: &str = "cart_session_key";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Get the cart session key, creating one on first access.
///
/// # Errors
///
/// Returns an internal error if the session store is unreachable.
pub async fn session_key(session: &Session) -> Result<SessionKey> {
    if let Some(existing) = session
        .get::<SessionKey>(CART_SESSION_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("session load failed: {e}")))?
    {
        return Ok(existing);
    }

    let fresh = SessionKey::generate();
    session
        .insert(CART_SESSION_KEY, fresh.clone())
        .await
        .map_err(|e| AppError::Internal(format!("session save failed: {e}")))?;
    Ok(fresh)
}
