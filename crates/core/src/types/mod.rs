//! Core types for BugStore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod session;
pub mod status;

pub use id::*;
pub use money::round_to_cents;
pub use session::SessionKey;
pub use status::OrderStatus;
