//! Seeded in-memory coupon registry.
//!
//! The registry owns coupon state; the engine only reads it. Codes are
//! stored upper-cased, matching the resolver's normalization.

use std::collections::HashMap;

use async_trait::async_trait;

use bugstore_commerce::{CollaboratorError, CouponRegistry, CouponRule};

/// Demo coupon codes: `(code, discount_percent, active)`.
const SEED_COUPONS: &[(&str, u8, bool)] = &[
    ("SAVE10", 10, true),
    ("BUGFRIEND10", 10, true),
    ("SWARM20", 20, true),
    ("FIRSTBUG", 15, true),
    ("EXPIRED99", 99, false),
];

/// In-memory coupon registry seeded with the demo codes.
pub struct InMemoryCouponRegistry {
    rules: HashMap<String, CouponRule>,
}

impl InMemoryCouponRegistry {
    /// Build the registry from the demo seed data.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: SEED_COUPONS
                .iter()
                .map(|(code, discount_percent, active)| {
                    (
                        (*code).to_string(),
                        CouponRule {
                            code: (*code).to_string(),
                            discount_percent: *discount_percent,
                            active: *active,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl Default for InMemoryCouponRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CouponRegistry for InMemoryCouponRegistry {
    async fn lookup(&self, code: &str) -> Result<Option<CouponRule>, CollaboratorError> {
        Ok(self.rules.get(code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_code_found() {
        let registry = InMemoryCouponRegistry::new();
        let rule = registry
            .lookup("SWARM20")
            .await
            .expect("registry ok")
            .expect("issued");
        assert_eq!(rule.discount_percent, 20);
        assert!(rule.active);
    }

    #[tokio::test]
    async fn test_retired_code_present_but_inactive() {
        let registry = InMemoryCouponRegistry::new();
        let rule = registry
            .lookup("EXPIRED99")
            .await
            .expect("registry ok")
            .expect("issued");
        assert!(!rule.active);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let registry = InMemoryCouponRegistry::new();
        // Normalization is the resolver's job; the registry stores
        // upper-cased codes and matches exactly.
        assert!(registry.lookup("save10").await.expect("registry ok").is_none());
    }
}
