//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! The purchase-path taxonomy maps onto HTTP statuses as follows:
//! validation 400, missing catalog entries 404, inactive product/campaign
//! 403, stock shortfalls 409 (with the remaining count in the body), store
//! failures 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request failed validation (empty cart, missing contact fields).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced product or campaign does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Product or campaign exists but is not open for purchase.
    #[error("Not available: {0}")]
    Unavailable(String),

    /// Requested quantity exceeds currently available stock.
    #[error("Insufficient stock: only {remaining} left")]
    InsufficientStock {
        /// Units still purchasable, so the client can offer a corrected quantity.
        remaining: u32,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::FORBIDDEN,
            Self::InsufficientStock { .. } => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Database(_) | Self::Internal(_) => serde_json::json!({
                "error": "Internal server error",
            }),
            Self::InsufficientStock { remaining } => serde_json::json!({
                "error": self.to_string(),
                "remaining": remaining,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::InsufficientStock { remaining: 2 };
        assert_eq!(err.to_string(), "Insufficient stock: only 2 left");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::Validation("cart is empty".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unavailable("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::InsufficientStock { remaining: 1 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
