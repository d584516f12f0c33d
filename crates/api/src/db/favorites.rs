//! Favorite repository: user-product bookmarks.

use sqlx::PgPool;

use bazaar_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::ProductSummary;

/// Repository for favorite database operations.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the user's favorited products, most recently favorited
    /// first. Sold products stay listed so the `sold` flag can be shown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<ProductSummary>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct FavoriteRow {
            id: ProductId,
            name: String,
            price: bazaar_core::Price,
            url: String,
            sold: bool,
        }

        let rows: Vec<FavoriteRow> = sqlx::query_as(
            "SELECT p.id, p.name, p.price, p.url, p.sold
             FROM user_favorites f
             JOIN products p ON p.id = f.product_id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProductSummary {
                id: r.id,
                name: r.name,
                price: r.price,
                url: r.url,
                sold: r.sold,
            })
            .collect())
    }

    /// Favorite a product. Favoriting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (e.g.
    /// the product doesn't exist, via the foreign key).
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_favorites (user_id, product_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, product_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a favorite.
    ///
    /// # Returns
    ///
    /// Returns `true` if a favorite was removed, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
