//! Product CRUD with ownership checks.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use storefront_core::error::CoreError;
use storefront_core::ownership::assert_owner;
use storefront_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use storefront_core::types::DbId;
use storefront_core::validation::{
    trimmed, validate_price, validate_product_description, validate_product_name, validate_stock,
};
use storefront_db::models::product::{CreateProduct, Product, ProductWithOwner, UpdateProduct};
use storefront_db::repositories::ProductRepo;

use crate::error::AppError;
use crate::services::log_failure;

const ENTITY: &str = "Product";

/// Fields accepted when creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Defaults to 0 when absent.
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// One page of the public catalogue.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub products: Vec<ProductWithOwner>,
    /// Total number of products, independent of the page bounds.
    pub total: i64,
}

/// Product operations. Updates and deletes are restricted to the owner.
#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: CreateProductInput,
        owner_id: DbId,
    ) -> Result<Product, AppError> {
        self.create_inner(input, owner_id)
            .await
            .inspect_err(|e| log_failure("create_product", e))
    }

    async fn create_inner(
        &self,
        input: CreateProductInput,
        owner_id: DbId,
    ) -> Result<Product, AppError> {
        validate_product_name(&input.name)?;
        if let Some(description) = input.description.as_deref() {
            validate_product_description(description)?;
        }
        validate_price(input.price)?;
        let stock = input.stock.unwrap_or(0);
        validate_stock(stock)?;

        let create = CreateProduct {
            name: input.name.trim().to_string(),
            description: trimmed(input.description.as_deref()),
            price: input.price,
            stock,
            image_url: trimmed(input.image_url.as_deref()),
            user_id: owner_id,
        };
        let product = ProductRepo::create(&self.pool, &create).await?;

        tracing::info!(product_id = product.id, owner_id, "Product created");
        Ok(product)
    }

    /// A product joined with its owner's public fields.
    pub async fn get_by_id(&self, id: DbId) -> Result<Option<ProductWithOwner>, AppError> {
        ProductRepo::find_with_owner(&self.pool, id)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("get_product", e))
    }

    /// Newest first. `limit` defaults to 10 and is capped at 100.
    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<ProductPage, AppError> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);

        let page = async {
            let products = ProductRepo::list_with_owner(&self.pool, limit, offset).await?;
            let total = ProductRepo::count(&self.pool).await?;
            Ok::<_, AppError>(ProductPage { products, total })
        };
        page.await.inspect_err(|e| log_failure("list_products", e))
    }

    pub async fn list_by_owner(&self, owner_id: DbId) -> Result<Vec<Product>, AppError> {
        ProductRepo::list_by_owner(&self.pool, owner_id)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("list_owner_products", e))
    }

    /// Apply a partial update on behalf of `acting_user_id`.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateProduct,
        acting_user_id: DbId,
    ) -> Result<Product, AppError> {
        self.update_inner(id, input, acting_user_id)
            .await
            .inspect_err(|e| log_failure("update_product", e))
    }

    async fn update_inner(
        &self,
        id: DbId,
        input: UpdateProduct,
        acting_user_id: DbId,
    ) -> Result<Product, AppError> {
        let existing = ProductRepo::find_by_id(&self.pool, id).await?;
        assert_owner(existing, ENTITY, id, acting_user_id)?;

        if let Some(name) = input.name.as_deref() {
            validate_product_name(name)?;
        }
        if let Some(description) = input.description.as_deref() {
            validate_product_description(description)?;
        }
        if let Some(price) = input.price {
            validate_price(price)?;
        }
        if let Some(stock) = input.stock {
            validate_stock(stock)?;
        }

        let input = UpdateProduct {
            name: input.name.map(|n| n.trim().to_string()),
            description: input.description.map(|d| d.trim().to_string()),
            image_url: input.image_url.map(|u| u.trim().to_string()),
            ..input
        };

        // The owner predicate is repeated in the statement; a row that
        // vanished or changed hands since the check reads as not found.
        let product = ProductRepo::update_owned(&self.pool, id, acting_user_id, &input)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: DbId, acting_user_id: DbId) -> Result<(), AppError> {
        self.delete_inner(id, acting_user_id)
            .await
            .inspect_err(|e| log_failure("delete_product", e))
    }

    async fn delete_inner(&self, id: DbId, acting_user_id: DbId) -> Result<(), AppError> {
        let existing = ProductRepo::find_by_id(&self.pool, id).await?;
        assert_owner(existing, ENTITY, id, acting_user_id)?;

        if !ProductRepo::delete_owned(&self.pool, id, acting_user_id).await? {
            return Err(CoreError::NotFound { entity: ENTITY, id }.into());
        }

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}
