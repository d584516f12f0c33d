//! Unified error handling for the API.
//!
//! Provides a unified `ApiError` type mapping every failure category to
//! the status code the API contract promises. All route handlers return
//! `Result<T, ApiError>`. Bodies are JSON: `{"msg": "..."}`, with
//! `removed_items` added on checkout conflicts.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bad request from client (missing/invalid fields).
    #[error("Validation: {0}")]
    Validation(String),

    /// Missing or invalid bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Caller lacks the role or ownership required.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cart items went stale between add-to-cart and checkout.
    #[error("Stale cart items removed")]
    StaleCartItems {
        /// Names of the products removed from the cart.
        removed_items: Vec<String>,
    },

    /// Store-level constraint failure (duplicate email, duplicate cart
    /// item) surfaced as 412.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors with full detail before redacting
        if matches!(self, Self::Repository(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::PRECONDITION_FAILED,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::PRECONDITION_FAILED,
                AuthError::InvalidEmail(_)
                | AuthError::InvalidRole(_)
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash(_) | AuthError::Token(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StaleCartItems { .. } => StatusCode::CONFLICT,
            Self::Precondition(_) => StatusCode::PRECONDITION_FAILED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let msg = match &self {
            Self::Repository(err) => match err {
                RepositoryError::NotFound => "not found".to_string(),
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "internal server error".to_string()
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "invalid credentials".to_string(),
                AuthError::EmailTaken => "an account with this email already exists".to_string(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::InvalidRole(msg) | AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::Repository(_) | AuthError::PasswordHash(_) | AuthError::Token(_) => {
                    "internal server error".to_string()
                }
            },
            Self::Validation(msg) | Self::Forbidden(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Unauthorized => "unauthorized".to_string(),
            Self::StaleCartItems { .. } => {
                "some items in your cart were sold by someone else and have been removed"
                    .to_string()
            }
            Self::Precondition(msg) => msg.clone(),
            Self::Internal(_) => "internal server error".to_string(),
        };

        let body = match &self {
            Self::StaleCartItems { removed_items } => {
                json!({ "msg": msg, "removed_items": removed_items })
            }
            _ => json!({ "msg": msg }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(ApiError::Validation("missing productId".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(ApiError::Forbidden("sellers only".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(ApiError::NotFound("product not found".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::StaleCartItems {
                removed_items: vec!["Old Lamp".to_string()],
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ApiError::Precondition("email already exists".to_string())),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            get_status(ApiError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            get_status(ApiError::Repository(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Repository(RepositoryError::Conflict(
                "email already exists".to_string()
            ))),
            StatusCode::PRECONDITION_FAILED
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            get_status(ApiError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::Auth(AuthError::EmailTaken)),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            get_status(ApiError::Auth(AuthError::InvalidRole(
                "invalid role, use 'customer' or 'seller'".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
    }
}
