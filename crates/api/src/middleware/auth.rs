//! Bearer token authentication extractor.
//!
//! Every protected handler takes [`RequireAuth`], which validates the
//! `Authorization: Bearer <token>` header and loads the account. Any
//! failure, from a missing header to a soft-deleted account, is the
//! same 401 so callers learn nothing about which check tripped.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use bazaar_core::UserId;

use crate::db::users::UserRepository;
use crate::models::User;
use crate::services::auth::decode_token;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Rejection returned when the bearer token is missing or invalid.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "unauthorized" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthRejection)?;

        let token = header.strip_prefix("Bearer ").ok_or(AuthRejection)?;

        let claims =
            decode_token(token, &state.config().jwt_secret).map_err(|_| AuthRejection)?;

        let user_id = claims
            .sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| AuthRejection)?;

        // Excludes soft-deleted accounts: a deleted customer's token
        // stops working immediately.
        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await
            .map_err(|_| AuthRejection)?
            .ok_or(AuthRejection)?;

        Ok(Self(user))
    }
}
