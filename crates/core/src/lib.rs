//! BugStore Core - Shared types library.
//!
//! This crate provides common types used across all BugStore components:
//! - `commerce` - Cart and checkout pricing engine
//! - `server` - Public JSON API binary
//!
//! # Architecture
//!
//! The core crate contains only types and small pure helpers - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, session keys, money
//!   rounding, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
