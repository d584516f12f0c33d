//! Seller dashboard route.

use axum::{Json, extract::State};
use serde_json::json;

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// `GET /dashboard` - Sales aggregates for the authenticated seller.
///
/// # Errors
///
/// Returns 403 for non-sellers.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    if !user.is_seller() {
        return Err(ApiError::Forbidden(
            "only sellers have a dashboard".to_owned(),
        ));
    }

    let stats = ProductRepository::new(state.pool())
        .seller_stats(user.id)
        .await?;

    Ok(Json(json!({
        "total_products": stats.total_products,
        "total_sold": stats.total_sold,
        "total_revenue": stats.total_revenue,
        "best_selling_product": stats.best_selling_product.unwrap_or_else(|| "none".to_owned()),
    })))
}
