//! Opaque session ownership key.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque key scoping a cart to one shopper session.
///
/// The key is issued by the session layer (an external collaborator); the
/// commerce engine only ever compares and hashes it. Every cart operation
/// takes the key explicitly - there is no ambient "current session".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Wrap an externally issued session identifier.
    #[must_use]
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    /// Generate a fresh random key (used when a shopper has no session yet).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
