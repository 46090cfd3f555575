//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::magento::MagentoError;
use crate::wishlist::WishlistError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Magento API operation failed.
    #[error("Magento error: {0}")]
    Magento(#[from] MagentoError),

    /// Wishlist operation failed.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Customer is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Session(_) | Self::Internal(_) => true,
            Self::Magento(err) => magento_is_server_error(err),
            Self::Wishlist(WishlistError::Backend(err)) => magento_is_server_error(err),
            Self::Wishlist(WishlistError::Busy)
            | Self::NotFound(_)
            | Self::Unauthorized(_)
            | Self::BadRequest(_) => false,
        }
    }
}

fn magento_is_server_error(err: &MagentoError) -> bool {
    !matches!(
        err,
        MagentoError::NotFound(_) | MagentoError::RateLimited(_) | MagentoError::UserError(_)
    )
}

fn magento_status(err: &MagentoError) -> StatusCode {
    match err {
        MagentoError::NotFound(_) => StatusCode::NOT_FOUND,
        MagentoError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        MagentoError::UserError(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Magento(err) => magento_status(err),
            Self::Wishlist(WishlistError::Backend(err)) => magento_status(err),
            Self::Wishlist(WishlistError::Busy) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Magento(err) | Self::Wishlist(WishlistError::Backend(err)) => match err {
                MagentoError::NotFound(_) => "Not found".to_string(),
                MagentoError::RateLimited(_) => "Too many requests, please retry".to_string(),
                MagentoError::UserError(msg) => msg.clone(),
                _ => "External service error".to_string(),
            },
            Self::Wishlist(WishlistError::Busy) => {
                "A wishlist update is already in progress".to_string()
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful authentication to associate errors with customers.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_magento_error_status_codes() {
        assert_eq!(
            get_status(AppError::Magento(MagentoError::NotFound("x".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Magento(MagentoError::RateLimited(5))),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Magento(MagentoError::UserError(
                "Invalid login".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Magento(MagentoError::GraphQL(vec![]))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_busy_wishlist_is_conflict() {
        assert_eq!(
            get_status(AppError::Wishlist(WishlistError::Busy)),
            StatusCode::CONFLICT
        );
    }
}
