//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{OrderId, Price, ProductId, UserId};

/// A completed purchase.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub total_amount: Price,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A product linked to an order, with the price captured at purchase time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderProduct {
    pub id: ProductId,
    pub name: String,
    /// Price at purchase time (from the order_items link).
    pub price: Price,
    pub url: String,
    pub quantity: i32,
}

/// An order together with its purchased products.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithProducts {
    #[serde(flatten)]
    pub order: Order,
    pub products: Vec<OrderProduct>,
}
