//! Product repository: listings, CRUD, bulk import, and seller stats.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{Email, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductUpdate, ProductWithSeller, SellerSummary};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, url, sold, seller_id, customer_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    url: String,
    sold: bool,
    seller_id: UserId,
    customer_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            url: r.url,
            sold: r.sold,
            seller_id: r.seller_id,
            customer_id: r.customer_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductSellerRow {
    #[sqlx(flatten)]
    product: ProductRow,
    seller_name: String,
    seller_email: Email,
}

impl From<ProductSellerRow> for ProductWithSeller {
    fn from(r: ProductSellerRow) -> Self {
        Self {
            product: r.product.into(),
            seller: SellerSummary {
                name: r.seller_name,
                email: r.seller_email,
            },
        }
    }
}

/// Seller dashboard aggregates.
#[derive(Debug, Clone)]
pub struct SellerStats {
    pub total_products: i64,
    pub total_sold: i64,
    pub total_revenue: Price,
    pub best_selling_product: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Public listing: unsold products from active sellers, newest first,
    /// optionally filtered by a case-insensitive name search.
    ///
    /// Returns the total match count (for pagination) and the requested page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<ProductWithSeller>), RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM products p
             JOIN users u ON u.id = p.seller_id
             WHERE p.sold = FALSE
               AND u.is_active = TRUE
               AND ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProductSellerRow>(&format!(
            "SELECT p.{}, u.name AS seller_name, u.email AS seller_email
             FROM products p
             JOIN users u ON u.id = p.seller_id
             WHERE p.sold = FALSE
               AND u.is_active = TRUE
               AND ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
             ORDER BY p.created_at DESC
             LIMIT $2 OFFSET $3",
            PRODUCT_COLUMNS.replace(", ", ", p.")
        ))
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Get a product with its seller embedded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_seller(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithSeller>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductSellerRow>(&format!(
            "SELECT p.{}, u.name AS seller_name, u.email AS seller_email
             FROM products p
             JOIN users u ON u.id = p.seller_id
             WHERE p.id = $1",
            PRODUCT_COLUMNS.replace(", ", ", p.")
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product for a seller. New products are never sold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        seller_id: UserId,
        new: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, description, price, url, seller_id, sold)
             VALUES ($1, $2, $3, $4, $5, FALSE)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.url)
        .bind(seller_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Bulk-insert products for a seller (CSV import). All rows are
    /// inserted in one transaction; a failure inserts nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create_many(
        &self,
        seller_id: UserId,
        products: &[NewProduct],
    ) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for new in products {
            sqlx::query(
                "INSERT INTO products (name, description, price, url, seller_id, sold)
                 VALUES ($1, $2, $3, $4, $5, FALSE)",
            )
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.price)
            .bind(&new.url)
            .bind(seller_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(products.len() as u64)
    }

    /// Apply a partial update; `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 url = COALESCE($5, url),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.price)
        .bind(changes.url.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate dashboard stats for a seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn seller_stats(&self, seller_id: UserId) -> Result<SellerStats, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct StatsRow {
            total_products: i64,
            total_sold: i64,
            total_revenue: Price,
        }

        let stats = sqlx::query_as::<_, StatsRow>(
            "SELECT COUNT(*) AS total_products,
                    COUNT(*) FILTER (WHERE sold) AS total_sold,
                    COALESCE(SUM(price) FILTER (WHERE sold), 0) AS total_revenue
             FROM products
             WHERE seller_id = $1",
        )
        .bind(seller_id)
        .fetch_one(self.pool)
        .await?;

        let best_selling_product: Option<String> = sqlx::query_scalar(
            "SELECT name
             FROM products
             WHERE seller_id = $1 AND sold = TRUE
             GROUP BY name
             ORDER BY COUNT(*) DESC
             LIMIT 1",
        )
        .bind(seller_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(SellerStats {
            total_products: stats.total_products,
            total_sold: stats.total_sold,
            total_revenue: stats.total_revenue,
            best_selling_product,
        })
    }
}
