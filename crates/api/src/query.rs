//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the service layer via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Which sessions `GET /auth/sessions` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionFilter {
    /// Only sessions that have not been logged out.
    #[default]
    Active,
    /// Full login history, newest first.
    All,
}

/// Query parameters for `GET /auth/sessions` (`?status=active|all&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct SessionListParams {
    #[serde(default)]
    pub status: SessionFilter,
    pub limit: Option<i64>,
}
