//! Handlers for the `/products` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_core::error::CoreError;
use storefront_db::models::product::{Product, ProductWithOwner, UpdateProduct};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{rules, ValidId, ValidQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::services::product::{CreateProductInput, ProductPage};
use crate::state::AppState;

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(custom(function = "rules::product_name"))]
    pub name: String,
    #[validate(custom(function = "rules::product_description"))]
    pub description: Option<String>,
    #[validate(custom(function = "rules::price"))]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock must be a non-negative integer"))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// Request body for `PUT /products/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(custom(function = "rules::product_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "rules::product_description"))]
    pub description: Option<String>,
    #[validate(custom(function = "rules::price"))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock must be a non-negative integer"))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state
        .products
        .create(
            CreateProductInput {
                name: input.name,
                description: input.description,
                price: input.price,
                stock: input.stock,
                image_url: input.image_url,
            },
            auth.user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(product, "Product created successfully"),
    ))
}

/// GET /api/products?limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> AppResult<Json<ApiResponse<ProductPage>>> {
    let page = state.products.list(params.limit, params.offset).await?;
    Ok(ApiResponse::success(page, "Products retrieved successfully"))
}

/// GET /api/products/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.products.list_by_owner(auth.user_id).await?;
    Ok(ApiResponse::success(
        products,
        "Products retrieved successfully",
    ))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> AppResult<Json<ApiResponse<ProductWithOwner>>> {
    let product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(ApiResponse::success(product, "Product retrieved successfully"))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidId(id): ValidId,
    ValidatedJson(input): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let update = UpdateProduct {
        name: input.name,
        description: input.description,
        price: input.price,
        stock: input.stock,
        image_url: input.image_url,
    };
    let product = state.products.update(id, update, auth.user_id).await?;
    Ok(ApiResponse::success(product, "Product updated successfully"))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidId(id): ValidId,
) -> AppResult<Json<ApiResponse<()>>> {
    state.products.delete(id, auth.user_id).await?;
    Ok(ApiResponse::message_only("Product deleted successfully"))
}
