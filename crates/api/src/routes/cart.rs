//! Cart routes: view, add, remove, and checkout.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use bazaar_core::ProductId;

use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::services::{CartService, CheckoutService};
use crate::state::AppState;

/// `GET /cart` - The customer's active cart.
///
/// A customer with no active cart gets `{"items": [], "total": "0.00"}`.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    let view = CartService::new(state.pool()).show(user.id).await?;

    Ok(Json(json!({
        "id": view.id,
        "items": view.items,
        "total": view.total,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    // Optional so a missing field is a 400 rather than a body rejection.
    #[serde(rename = "productId")]
    pub product_id: Option<ProductId>,
}

/// `POST /cart` - Add a product to the cart.
///
/// # Errors
///
/// Returns 404 for an unknown product; 400 when `productId` is missing,
/// the product is sold, belongs to the buyer, or is already in the cart.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddToCartRequest>,
) -> Result<Response> {
    let product_id = body
        .product_id
        .ok_or_else(|| ApiError::Validation("productId is required".to_owned()))?;

    CartService::new(state.pool())
        .add(user.id, product_id)
        .await?;

    tracing::info!(user_id = %user.id, product_id = %product_id, "Product added to cart");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "product added to cart" })),
    )
        .into_response())
}

/// `DELETE /cart/{productId}` - Remove a product from the cart.
///
/// # Errors
///
/// Returns 404 if there is no active cart or the product isn't in it.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    CartService::new(state.pool())
        .remove(user.id, product_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /cart/checkout` - Turn the active cart into an order.
///
/// # Errors
///
/// Returns 400 for an empty cart and 409 when items went stale (the
/// stale items are removed and their names returned in
/// `removed_items`; the rest of the cart is kept for a retry).
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    let receipt = CheckoutService::new(state.pool()).checkout(user.id).await?;

    tracing::info!(
        user_id = %user.id,
        order_id = %receipt.order_id,
        total = %receipt.total,
        "Checkout completed"
    );

    Ok(Json(json!({
        "msg": "order placed",
        "order_id": receipt.order_id,
        "total": receipt.total,
    })))
}
