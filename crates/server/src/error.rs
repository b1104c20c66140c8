//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that maps the commerce error taxonomy
//! to HTTP statuses and structured JSON bodies. Server-side faults are
//! captured to Sentry before responding. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use bugstore_commerce::CommerceError;

/// Application-level error type for the BugStore server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart or checkout operation failed.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side faults to Sentry. Validation failures are the
        // shopper's business, not ours.
        if matches!(
            self,
            Self::Internal(_)
                | Self::Commerce(
                    CommerceError::InvalidLineItem { .. } | CommerceError::Transient { .. }
                )
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Commerce(err) => match err {
                CommerceError::InvalidQuantity { .. }
                | CommerceError::IncompleteAddress { .. }
                | CommerceError::InvalidPayment { .. }
                | CommerceError::WrongStep { .. } => StatusCode::BAD_REQUEST,
                CommerceError::ItemNotFound(_) | CommerceError::CouponNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                CommerceError::CouponInactive(_) => StatusCode::GONE,
                CommerceError::ProductUnavailable(_) | CommerceError::CartChanged { .. } => {
                    StatusCode::CONFLICT
                }
                CommerceError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CommerceError::Transient { .. } => StatusCode::SERVICE_UNAVAILABLE,
                CommerceError::InvalidLineItem { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Self::Commerce(err) => {
                let mut body = json!({
                    "error": err.kind(),
                    "message": err.to_string(),
                });
                // Give the presentation layer the refreshed totals so it can
                // re-render Review without another round trip.
                if let CommerceError::CartChanged { current } = err
                    && let Ok(totals) = serde_json::to_value(current)
                {
                    body["current_totals"] = totals;
                }
                body
            }
            // Don't expose internal error details to clients
            Self::Internal(_) => json!({
                "error": "internal",
                "message": "Internal server error",
            }),
            Self::BadRequest(msg) => json!({
                "error": "bad_request",
                "message": msg,
            }),
            Self::NotFound(msg) => json!({
                "error": "not_found",
                "message": msg,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use bugstore_core::ProductId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_validation_failures_are_bad_request() {
        assert_eq!(
            get_status(AppError::Commerce(CommerceError::InvalidQuantity {
                product_id: ProductId::new(1),
                quantity: 0,
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Commerce(CommerceError::IncompleteAddress {
                missing: vec!["city"],
            })),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_coupon_failures_are_distinct() {
        assert_eq!(
            get_status(AppError::Commerce(CommerceError::CouponNotFound(
                "NOPE".to_string()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Commerce(CommerceError::CouponInactive(
                "EXPIRED99".to_string()
            ))),
            StatusCode::GONE
        );
    }

    #[test]
    fn test_transient_is_service_unavailable() {
        let err = AppError::Commerce(CommerceError::Transient {
            source: "timeout".into(),
        });
        assert_eq!(get_status(err), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_cart_changed_is_conflict() {
        let err = AppError::Commerce(CommerceError::CartChanged {
            current: bugstore_commerce::Totals::zero(),
        });
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }
}
