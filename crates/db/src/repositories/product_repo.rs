//! Repository for the `products` table.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::product::{CreateProduct, Product, ProductWithOwner, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, price, stock, image_url, user_id, \
                       created_at, updated_at";

/// Product columns (qualified) plus the owner's public columns.
const JOINED_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.stock, p.image_url, \
                              p.user_id, p.created_at, p.updated_at, \
                              u.id AS owner_id, u.email AS owner_email, \
                              u.user_name AS owner_user_name, \
                              u.first_name AS owner_first_name, \
                              u.last_name AS owner_last_name";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, description, price, stock, image_url, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image_url)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a product by ID without joining its owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by ID together with its owner's public fields.
    pub async fn find_with_owner(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             JOIN users u ON u.id = p.user_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProductWithOwner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of products with owners, newest first.
    pub async fn list_with_owner(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             JOIN users u ON u.id = p.user_id
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ProductWithOwner>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of products.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await
    }

    /// All products owned by `user_id`, newest first.
    pub async fn list_by_owner(pool: &PgPool, user_id: DbId) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a product owned by `owner_id`. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row matches both `id` and `owner_id`.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                stock = COALESCE($6, stock),
                image_url = COALESCE($7, image_url)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product owned by `owner_id`. Returns `true` if a row was deleted.
    pub async fn delete_owned(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
