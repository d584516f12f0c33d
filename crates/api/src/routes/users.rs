//! Account routes: registration, profile, and account closing.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// `POST /users` - Register a new account.
///
/// # Errors
///
/// Returns 400 for a bad email, role, or password; 412 if the email is
/// already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response> {
    let auth = AuthService::new(
        state.pool(),
        &state.config().jwt_secret,
        state.config().token_ttl_secs,
    );

    let user = auth
        .register(&body.name, &body.email, &body.password, &body.role)
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
        })),
    )
        .into_response())
}

/// `GET /user` - The authenticated account.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<serde_json::Value> {
    Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "is_active": user.is_active,
    }))
}

/// `DELETE /user` - Close the authenticated account.
///
/// Customers are soft-deleted (their order history stays readable by
/// sellers who sold to them); sellers are deactivated, which hides
/// their listings from the public catalog.
///
/// # Errors
///
/// Returns 404 if the account vanished between auth and delete.
pub async fn close_account(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let users = UserRepository::new(state.pool());

    if user.is_seller() {
        users.deactivate(user.id).await?;
        tracing::info!(user_id = %user.id, "Seller account deactivated");
        return Ok((
            StatusCode::OK,
            Json(json!({ "msg": "account deactivated, your listings are no longer visible" })),
        )
            .into_response());
    }

    users.soft_delete(user.id).await?;
    tracing::info!(user_id = %user.id, "Customer account deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}
