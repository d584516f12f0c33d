//! Login route: exchange credentials for a bearer token.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /token` - Login with email and password.
///
/// # Errors
///
/// Returns 401 for unknown email, wrong password, or a closed account.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(
        state.pool(),
        &state.config().jwt_secret,
        state.config().token_ttl_secs,
    );

    let (user, token) = auth.login(&body.email, &body.password).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(json!({ "token": token })))
}
