//! Cart service: reads and the add/remove rules.
//!
//! Adding enforces, in order: the product exists, is not sold, and does
//! not belong to the buyer. Duplicate adds are rejected by the
//! `UNIQUE (cart_id, product_id)` constraint underneath.

use sqlx::PgPool;

use bazaar_core::{CartId, Price, ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::error::ApiError;
use crate::models::{CartItemDetail, cart_total};

/// A customer's cart as returned by the API.
#[derive(Debug)]
pub struct CartView {
    /// `None` when the customer has no active cart yet.
    pub id: Option<CartId>,
    pub items: Vec<CartItemDetail>,
    pub total: Price,
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// The customer's active cart with items and total. A customer with
    /// no active cart gets an empty view rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Repository` if a query fails.
    pub async fn show(&self, customer_id: UserId) -> Result<CartView, ApiError> {
        let Some(cart) = self.carts.get_active(customer_id).await? else {
            return Ok(CartView {
                id: None,
                items: Vec::new(),
                total: Price::ZERO,
            });
        };

        let items = self.carts.items_with_products(cart.id).await?;
        let total = cart_total(&items);

        Ok(CartView {
            id: Some(cart.id),
            items,
            total,
        })
    }

    /// Add a product to the customer's active cart, creating the cart
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product doesn't exist,
    /// `ApiError::Validation` if it is sold, belongs to the buyer, or is
    /// already in the cart.
    pub async fn add(&self, customer_id: UserId, product_id: ProductId) -> Result<(), ApiError> {
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

        if product.sold {
            return Err(ApiError::Validation(
                "this product has already been sold".to_owned(),
            ));
        }
        if product.seller_id == customer_id {
            return Err(ApiError::Validation(
                "you cannot buy your own product".to_owned(),
            ));
        }

        let cart = self.carts.get_or_create_active(customer_id).await?;

        self.carts
            .add_item(cart.id, product_id, product.price)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => ApiError::Validation(msg),
                other => ApiError::Repository(other),
            })?;

        Ok(())
    }

    /// Remove a product from the customer's active cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the customer has no active cart
    /// or the product is not in it.
    pub async fn remove(&self, customer_id: UserId, product_id: ProductId) -> Result<(), ApiError> {
        let cart = self
            .carts
            .get_active(customer_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("cart not found".to_owned()))?;

        let removed = self.carts.remove_item(cart.id, product_id).await?;
        if !removed {
            return Err(ApiError::NotFound("item not found in cart".to_owned()));
        }

        Ok(())
    }
}
