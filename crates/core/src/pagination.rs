//! Clamping for user-supplied `limit` / `offset` query parameters.

/// Default page size for product listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Upper bound for product listings.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default number of rows returned by session history.
pub const DEFAULT_SESSION_HISTORY_LIMIT: i64 = 50;

/// Upper bound for session history.
pub const MAX_SESSION_HISTORY_LIMIT: i64 = 200;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
