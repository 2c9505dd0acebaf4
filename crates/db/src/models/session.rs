//! Login session model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use storefront_core::session::SessionStatus;
use storefront_core::types::{DbId, Timestamp};

/// A login session row from the `user_sessions` table.
///
/// `token_id` equals the `jti` claim of the bearer token issued at login.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_id: String,
    #[sqlx(try_from = "String")]
    pub status: SessionStatus,
    pub login_at: Timestamp,
    pub logout_at: Option<Timestamp>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a login.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub token_id: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
