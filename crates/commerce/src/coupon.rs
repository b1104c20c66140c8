//! Coupon code resolution.
//!
//! Codes match exactly after upper-casing; a code that exists but is
//! disabled resolves differently from one that was never issued, so the
//! caller can tell the shopper which it was. Rate limiting and single-use
//! enforcement, if required, belong to the registry, not this resolver.

use serde::{Deserialize, Serialize};

use crate::collaborators::CouponRegistry;
use crate::error::{CommerceError, Result};

/// An issued discount code. Immutable once issued; not composable - a newly
/// applied coupon replaces any previously applied discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRule {
    /// Upper-cased code as issued.
    pub code: String,
    /// Whole-number percentage in `[0, 100]`, applied to the pre-tax
    /// subtotal.
    pub discount_percent: u8,
    /// Disabled codes resolve as [`CommerceError::CouponInactive`].
    pub active: bool,
}

/// Resolve a coupon code against the registry.
///
/// # Errors
///
/// - [`CommerceError::CouponNotFound`] if no code matches.
/// - [`CommerceError::CouponInactive`] if the code exists but is disabled.
/// - [`CommerceError::Transient`] if the registry call fails or times out.
pub async fn resolve_coupon(registry: &dyn CouponRegistry, code: &str) -> Result<CouponRule> {
    let normalized = code.trim().to_uppercase();
    match registry.lookup(&normalized).await? {
        None => Err(CommerceError::CouponNotFound(normalized)),
        Some(rule) if !rule.active => Err(CommerceError::CouponInactive(normalized)),
        Some(rule) => Ok(rule),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::collaborators::CollaboratorError;

    use super::*;

    struct FixedRegistry {
        rules: HashMap<String, CouponRule>,
    }

    impl FixedRegistry {
        fn with(rules: &[(&str, u8, bool)]) -> Self {
            Self {
                rules: rules
                    .iter()
                    .map(|(code, percent, active)| {
                        (
                            (*code).to_string(),
                            CouponRule {
                                code: (*code).to_string(),
                                discount_percent: *percent,
                                active: *active,
                            },
                        )
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl CouponRegistry for FixedRegistry {
        // `Result` here is shadowed by the crate alias, so spell it out.
        async fn lookup(
            &self,
            code: &str,
        ) -> std::result::Result<Option<CouponRule>, CollaboratorError> {
            Ok(self.rules.get(code).cloned())
        }
    }

    #[tokio::test]
    async fn test_resolve_is_case_insensitive() {
        let registry = FixedRegistry::with(&[("SAVE10", 10, true)]);
        let rule = resolve_coupon(&registry, "save10").await.expect("resolves");
        assert_eq!(rule.code, "SAVE10");
        assert_eq!(rule.discount_percent, 10);
    }

    #[tokio::test]
    async fn test_resolve_trims_whitespace() {
        let registry = FixedRegistry::with(&[("SAVE10", 10, true)]);
        let rule = resolve_coupon(&registry, "  Save10 ").await.expect("resolves");
        assert_eq!(rule.code, "SAVE10");
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let registry = FixedRegistry::with(&[("SAVE10", 10, true)]);
        let err = resolve_coupon(&registry, "NOPE").await.expect_err("fails");
        assert!(matches!(err, CommerceError::CouponNotFound(code) if code == "NOPE"));
    }

    #[tokio::test]
    async fn test_disabled_code_is_inactive_not_missing() {
        let registry = FixedRegistry::with(&[("EXPIRED99", 99, false)]);
        let err = resolve_coupon(&registry, "expired99")
            .await
            .expect_err("fails");
        assert!(matches!(err, CommerceError::CouponInactive(code) if code == "EXPIRED99"));
    }
}
