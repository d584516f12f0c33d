//! Order routes: purchase history.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use bazaar_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// `GET /orders` - The customer's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(user.id)
        .await?;

    Ok(Json(json!(orders)))
}

/// `GET /orders/{id}` - One of the customer's orders.
///
/// # Errors
///
/// Returns 404 if the order doesn't exist or belongs to someone else.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let order = OrderRepository::new(state.pool())
        .get_for_customer(user.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("order not found".to_owned()))?;

    Ok(Json(json!(order)))
}
