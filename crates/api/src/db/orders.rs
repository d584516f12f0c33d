//! Order repository: purchase history reads.
//!
//! Order creation happens inside the checkout transaction and lives with
//! the checkout service; this repository only reads completed orders.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{OrderId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderProduct, OrderWithProducts};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: UserId,
    total_amount: Price,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Self {
            id: r.id,
            customer_id: r.customer_id,
            total_amount: r.total_amount,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    product_id: ProductId,
    name: String,
    price: Price,
    url: String,
    quantity: i32,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a customer's orders with their products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: UserId,
    ) -> Result<Vec<OrderWithProducts>, RepositoryError> {
        let orders: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, customer_id, total_amount, status, created_at
             FROM orders
             WHERE customer_id = $1
             ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let items: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT oi.order_id, oi.product_id, p.name, oi.price, p.url, oi.quantity
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = ANY($1)",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderProduct>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(OrderProduct {
                id: item.product_id,
                name: item.name,
                price: item.price,
                url: item.url,
                quantity: item.quantity,
            });
        }

        Ok(orders
            .into_iter()
            .map(|row| {
                let products = by_order.remove(&row.id).unwrap_or_default();
                OrderWithProducts {
                    order: row.into(),
                    products,
                }
            })
            .collect())
    }

    /// Get one of the customer's orders with its products.
    ///
    /// Scoped by customer so one customer can never read another's order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_customer(
        &self,
        customer_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<OrderWithProducts>, RepositoryError> {
        let order: Option<OrderRow> = sqlx::query_as(
            "SELECT id, customer_id, total_amount, status, created_at
             FROM orders
             WHERE id = $1 AND customer_id = $2",
        )
        .bind(order_id)
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT oi.order_id, oi.product_id, p.name, oi.price, p.url, oi.quantity
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = $1",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithProducts {
            order: order.into(),
            products: items
                .into_iter()
                .map(|item| OrderProduct {
                    id: item.product_id,
                    name: item.name,
                    price: item.price,
                    url: item.url,
                    quantity: item.quantity,
                })
                .collect(),
        }))
    }
}
