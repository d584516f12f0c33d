//! Checkout: turn the active cart into an order.
//!
//! The whole sequence runs inside one transaction with the cart's
//! products locked (`FOR UPDATE`), so two customers checking out the
//! same product serialize and exactly one of them gets it. Items whose
//! product sold in the meantime are removed from the cart and reported;
//! nothing is ordered in that case.

use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use bazaar_core::{CartId, OrderId, Price, ProductId, UserId};

use crate::db::RepositoryError;
use crate::error::ApiError;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No active cart, or the cart has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// Some cart items were sold in the meantime and were removed.
    #[error("stale items removed from cart")]
    Stale(Vec<String>),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

impl From<CheckoutError> for ApiError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart => Self::Validation("your cart is empty".to_owned()),
            CheckoutError::Stale(removed_items) => Self::StaleCartItems { removed_items },
            CheckoutError::Repository(err) => Self::Repository(err),
        }
    }
}

/// A completed checkout.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub total: Price,
}

#[derive(sqlx::FromRow)]
struct LockedItem {
    product_id: ProductId,
    name: String,
    price: Price,
    sold: bool,
    quantity: i32,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check out the customer's active cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to buy and
    /// `CheckoutError::Stale` if any item's product sold in the meantime
    /// (those items are removed from the cart before returning).
    pub async fn checkout(&self, customer_id: UserId) -> Result<CheckoutReceipt, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<CartId> = sqlx::query_scalar(
            "SELECT id FROM carts WHERE customer_id = $1 AND status = 'active'",
        )
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(cart_id) = cart_id else {
            return Err(CheckoutError::EmptyCart);
        };

        // Lock the products so a concurrent checkout of the same product
        // waits here and then sees sold = TRUE.
        let items: Vec<LockedItem> = sqlx::query_as(
            "SELECT p.id AS product_id, p.name, p.price, p.sold, ci.quantity
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY p.id
             FOR UPDATE OF p",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let stale: Vec<&LockedItem> = items.iter().filter(|i| i.sold).collect();
        if !stale.is_empty() {
            let removed = remove_stale_items(&mut tx, cart_id, &stale).await?;
            tx.commit().await?;
            return Err(CheckoutError::Stale(removed));
        }

        let total: Price = items.iter().map(|i| i.price.times(i.quantity)).sum();

        let order_id: OrderId = sqlx::query_scalar(
            "INSERT INTO orders (customer_id, total_amount, status)
             VALUES ($1, $2, 'completed')
             RETURNING id",
        )
        .bind(customer_id)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, price, quantity)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE products SET sold = TRUE, customer_id = $2, updated_at = now()
                 WHERE id = $1",
            )
            .bind(item.product_id)
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;
        }

        // The cart stays active and is simply emptied for reuse.
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(CheckoutReceipt { order_id, total })
    }
}

/// Remove the stale line items, returning the product names removed.
async fn remove_stale_items(
    tx: &mut Transaction<'_, Postgres>,
    cart_id: CartId,
    stale: &[&LockedItem],
) -> Result<Vec<String>, sqlx::Error> {
    let mut removed = Vec::with_capacity(stale.len());

    for item in stale {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(item.product_id)
            .execute(&mut **tx)
            .await?;
        removed.push(item.name.clone());
    }

    Ok(removed)
}
