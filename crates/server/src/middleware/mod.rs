//! Middleware for the BugStore server.

pub mod session;

pub use session::{create_session_layer, session_key};
