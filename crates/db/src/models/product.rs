//! Product entity model and DTOs.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use storefront_core::ownership::Owned;
use storefront_core::types::{DbId, Timestamp};

/// A product row from the `products` table. `user_id` is the owner.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Product {
    fn owner_id(&self) -> DbId {
        self.user_id
    }
}

/// Public fields of a product's owner, selected by an explicit join.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOwner {
    #[sqlx(rename = "owner_id")]
    pub id: DbId,
    #[sqlx(rename = "owner_email")]
    pub email: String,
    #[sqlx(rename = "owner_user_name")]
    pub user_name: Option<String>,
    #[sqlx(rename = "owner_first_name")]
    pub first_name: Option<String>,
    #[sqlx(rename = "owner_last_name")]
    pub last_name: Option<String>,
}

/// A product together with its owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    #[sqlx(flatten)]
    pub owner: ProductOwner,
}

/// DTO for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub user_id: DbId,
}

/// DTO for a partial product update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}
