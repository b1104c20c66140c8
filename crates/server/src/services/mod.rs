//! In-process implementations of the engine's collaborators.
//!
//! The demo shop runs self-contained: the catalog, coupon registry, and
//! order placement service live in this process, seeded with the BugStore
//! demo data. Each implements the corresponding `bugstore-commerce` trait,
//! so swapping in remote services later is a wiring change, not an engine
//! change.

pub mod catalog;
pub mod coupons;
pub mod orders;

pub use catalog::SeededCatalog;
pub use coupons::InMemoryCouponRegistry;
pub use orders::OrderService;
