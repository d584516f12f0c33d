//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{Email, Price, ProductId, UserId};

/// A second-hand product listed by a seller.
///
/// Each product is a unique physical item: it is sold at most once, and
/// `customer_id` records the buyer once `sold` flips to true.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Image URL for the listing.
    pub url: String,
    pub sold: bool,
    pub seller_id: UserId,
    /// Buyer, set at checkout.
    pub customer_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Seller identity embedded in product responses.
#[derive(Debug, Clone, Serialize)]
pub struct SellerSummary {
    pub name: String,
    pub email: Email,
}

/// A product joined with its seller, as returned by listings and detail.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithSeller {
    #[serde(flatten)]
    pub product: Product,
    pub seller: SellerSummary,
}

/// The abbreviated product shape used by favorites listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub url: String,
    pub sold: bool,
}

/// Input for creating a product (direct create or CSV import row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub url: String,
}

/// Partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub url: Option<String>,
}
