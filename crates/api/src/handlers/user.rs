//! Handlers for the `/users` resource.
//!
//! Reads are public. Updates and deletes act only on the caller's own
//! account; any other id is answered with 403.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_core::validation::parse_iso_date;
use storefront_db::models::user::{PublicUser, UpdateUser};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{rules, ValidId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(custom(function = "rules::first_name"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "rules::last_name"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "rules::user_name"))]
    pub user_name: Option<String>,
    #[validate(custom(function = "rules::gender"))]
    pub gender: Option<String>,
    #[validate(custom(function = "rules::date_of_birth"))]
    pub dob: Option<String>,
    #[validate(custom(function = "rules::phone"))]
    pub phone: Option<String>,
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let user = state
        .accounts
        .get_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(ApiResponse::success(user, "User retrieved successfully"))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidId(id): ValidId,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    ensure_self(&auth, id)?;

    let update = UpdateUser {
        email: input.email,
        user_name: input.user_name,
        first_name: input.first_name,
        last_name: input.last_name,
        gender: input.gender,
        dob: input.dob.as_deref().map(parse_iso_date).transpose()?,
        phone: input.phone,
    };
    let user = state.accounts.update(id, update).await?;
    Ok(ApiResponse::success(user, "User updated successfully"))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidId(id): ValidId,
) -> AppResult<Json<ApiResponse<()>>> {
    ensure_self(&auth, id)?;

    state.accounts.delete(id).await?;
    Ok(ApiResponse::message_only("User deleted successfully"))
}

fn ensure_self(auth: &AuthUser, id: DbId) -> Result<(), AppError> {
    if auth.user_id != id {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You can only modify your own account".into(),
        )));
    }
    Ok(())
}
