//! BugStore Server library.
//!
//! This crate provides the JSON API server as a library, allowing it to be
//! tested and reused. The binary in `main.rs` wires configuration, Sentry,
//! and tracing around [`routes::router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
