//! Cart repository: the one-active-cart-per-customer invariant lives here.
//!
//! A partial unique index on `carts (customer_id) WHERE status = 'active'`
//! backs `get_or_create_active`, and `UNIQUE (cart_id, product_id)` on
//! `cart_items` backs the duplicate-add rejection.

use sqlx::PgPool;

use bazaar_core::{CartId, CartItemId, CartStatus, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItemDetail, CartProduct};

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    customer_id: UserId,
    status: CartStatus,
}

impl From<CartRow> for Cart {
    fn from(r: CartRow) -> Self {
        Self {
            id: r.id,
            customer_id: r.customer_id,
            status: r.status,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemDetailRow {
    id: CartItemId,
    quantity: i32,
    price: Price,
    product_id: ProductId,
    product_name: String,
    product_price: Price,
    product_url: String,
    product_sold: bool,
}

impl From<ItemDetailRow> for CartItemDetail {
    fn from(r: ItemDetailRow) -> Self {
        Self {
            id: r.id,
            quantity: r.quantity,
            price: r.price,
            product: CartProduct {
                id: r.product_id,
                name: r.product_name,
                price: r.product_price,
                url: r.product_url,
                sold: r.product_sold,
            },
        }
    }
}

/// Repository for cart and cart-item database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the customer's active cart, creating one if none exists.
    ///
    /// The insert races safely against concurrent requests: `ON CONFLICT
    /// DO NOTHING` against the partial unique index means at most one
    /// row wins, and the losing request falls through to the select.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if the cart vanished between
    /// the insert and the select.
    pub async fn get_or_create_active(&self, customer_id: UserId) -> Result<Cart, RepositoryError> {
        let inserted = sqlx::query_as::<_, CartRow>(
            "INSERT INTO carts (customer_id, status)
             VALUES ($1, 'active')
             ON CONFLICT (customer_id) WHERE status = 'active' DO NOTHING
             RETURNING id, customer_id, status",
        )
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(row.into());
        }

        self.get_active(customer_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "active cart for customer {customer_id} disappeared during upsert"
            ))
        })
    }

    /// Get the customer's active cart, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(&self, customer_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, customer_id, status
             FROM carts
             WHERE customer_id = $1 AND status = 'active'",
        )
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// List the cart's line items joined with each product's current state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_with_products(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartItemDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemDetailRow>(
            "SELECT ci.id, ci.quantity, ci.price,
                    p.id AS product_id, p.name AS product_name,
                    p.price AS product_price, p.url AS product_url,
                    p.sold AS product_sold
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.created_at",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a product to the cart, capturing its current price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already in
    /// the cart. The `UNIQUE (cart_id, product_id)` constraint decides;
    /// there is no separate read that could race.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        price: Price,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity, price)
             VALUES ($1, $2, 1, $3)
             ON CONFLICT (cart_id, product_id) DO NOTHING",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(price)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(
                "this product is already in your cart".to_owned(),
            ));
        }

        Ok(())
    }

    /// Remove a product from the cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if an item was removed, `false` if the product
    /// was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
