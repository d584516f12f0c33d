//! Product routes: public catalog, seller CRUD, and CSV bulk import.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use bazaar_core::{Price, ProductId};

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewProduct, ProductUpdate, User};
use crate::services::import::parse_products_csv;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// `GET /products` - Public catalog, paginated and searchable.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = page_offset(page, limit);
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

    let (total, data) = ProductRepository::new(state.pool())
        .list(search, limit, offset)
        .await?;

    Ok(Json(json!({
        "total": total,
        "total_pages": total.cast_unsigned().div_ceil(limit.cast_unsigned()),
        "current_page": page,
        "data": data,
    })))
}

/// `GET /products/{id}` - Product detail with seller.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let product = ProductRepository::new(state.pool())
        .get_with_seller(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    Ok(Json(json!(product)))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub url: String,
}

/// `POST /products` - Create a listing.
///
/// # Errors
///
/// Returns 403 for non-sellers and 400 for an empty name or
/// non-positive price.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateProductRequest>,
) -> Result<Response> {
    require_seller(&user, "only sellers can list products")?;

    let new = NewProduct {
        name: body.name.trim().to_owned(),
        description: body.description.trim().to_owned(),
        price: body.price,
        url: body.url.trim().to_owned(),
    };
    validate_listing(&new)?;

    let product = ProductRepository::new(state.pool())
        .create(user.id, &new)
        .await?;

    tracing::info!(product_id = %product.id, seller_id = %user.id, "Product listed");

    Ok((StatusCode::CREATED, Json(json!(product))).into_response())
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub url: Option<String>,
}

/// `PUT /products/{id}` - Update one of the seller's own listings.
///
/// # Errors
///
/// Returns 404 for a missing product and 403 when it belongs to
/// another seller.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<serde_json::Value>> {
    let products = ProductRepository::new(state.pool());

    let product = products
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    if product.seller_id != user.id {
        return Err(ApiError::Forbidden(
            "you do not have permission to change this product".to_owned(),
        ));
    }

    if let Some(price) = body.price
        && price <= Price::ZERO
    {
        return Err(ApiError::Validation("price must be positive".to_owned()));
    }

    let updated = products
        .update(
            id,
            &ProductUpdate {
                name: body.name,
                description: body.description,
                price: body.price,
                url: body.url,
            },
        )
        .await?;

    Ok(Json(json!(updated)))
}

/// `DELETE /products/{id}` - Remove one of the seller's own listings.
///
/// # Errors
///
/// Returns 404 for a missing product and 403 when it belongs to
/// another seller.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let products = ProductRepository::new(state.pool());

    let product = products
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    if product.seller_id != user.id {
        return Err(ApiError::Forbidden(
            "you do not have permission to delete this product".to_owned(),
        ));
    }

    products.delete(id).await?;

    tracing::info!(product_id = %id, seller_id = %user.id, "Product removed");

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /products/upload` - Bulk import listings from a CSV file.
///
/// Expects a multipart form with a `file` field containing a
/// semicolon-separated CSV with `name`, `price`, and optional
/// `description`/`url` columns.
///
/// # Errors
///
/// Returns 403 for non-sellers and 400 when the upload contains no
/// usable product rows.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Response> {
    require_seller(&user, "only sellers can import products")?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() == Some("file") {
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?,
            );
            break;
        }
    }

    let data = data.ok_or_else(|| ApiError::Validation("send a CSV file".to_owned()))?;

    let products = parse_products_csv(&data)
        .map_err(|_| ApiError::Validation("could not read the CSV file".to_owned()))?;

    if products.is_empty() {
        return Err(ApiError::Validation(
            "no valid products found, check that the CSV uses semicolons (;)".to_owned(),
        ));
    }

    let imported = ProductRepository::new(state.pool())
        .create_many(user.id, &products)
        .await?;

    tracing::info!(seller_id = %user.id, count = imported, "CSV import completed");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": format!("{imported} products imported") })),
    )
        .into_response())
}

// Saturating so an absurd ?page= cannot overflow into a negative OFFSET.
const fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

fn require_seller(user: &User, msg: &str) -> Result<()> {
    if user.is_seller() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(msg.to_owned()))
    }
}

fn validate_listing(new: &NewProduct) -> Result<()> {
    if new.name.is_empty() {
        return Err(ApiError::Validation("name is required".to_owned()));
    }
    if new.price <= Price::ZERO {
        return Err(ApiError::Validation("price must be positive".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_starts_at_zero() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn test_page_offset_saturates_on_huge_pages() {
        assert_eq!(page_offset(i64::MAX, MAX_PAGE_SIZE), i64::MAX);
        assert!(page_offset(i64::MAX, 1) >= 0);
    }
}
