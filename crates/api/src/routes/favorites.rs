//! Favorite routes: bookmark products for later.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use bazaar_core::ProductId;

use crate::db::{FavoriteRepository, ProductRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// `GET /favorites` - The user's favorited products.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    let favorites = FavoriteRepository::new(state.pool()).list(user.id).await?;

    Ok(Json(json!(favorites)))
}

/// `POST /favorites/{productId}` - Favorite a product. Idempotent.
///
/// # Errors
///
/// Returns 404 for an unknown product.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Response> {
    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    FavoriteRepository::new(state.pool())
        .add(user.id, product_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "product favorited" })),
    )
        .into_response())
}

/// `DELETE /favorites/{productId}` - Remove a favorite.
///
/// Removing a product that was never favorited still succeeds.
///
/// # Errors
///
/// Returns 404 for an unknown product.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    FavoriteRepository::new(state.pool())
        .remove(user.id, product_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
