//! Repository for the `user_sessions` table.

use sqlx::PgPool;
use storefront_core::session::SessionStatus;
use storefront_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_id, status, login_at, logout_at, ip, user_agent, \
                       created_at, updated_at";

/// Provides the login/logout ledger operations.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new `active` session stamped with the current time.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, token_id, status, login_at, ip, user_agent)
             VALUES ($1, $2, $3, NOW(), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.token_id)
            .bind(SessionStatus::Active.as_str())
            .bind(&input.ip)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Flip the active session for `token_id` to `logged_out`.
    ///
    /// The status predicate makes this a single atomic transition: a
    /// second call finds no active row and returns `None`.
    pub async fn mark_logged_out(
        pool: &PgPool,
        token_id: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions
             SET status = $2, logout_at = NOW()
             WHERE token_id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_id)
            .bind(SessionStatus::LoggedOut.as_str())
            .bind(SessionStatus::Active.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_token_id(
        pool: &PgPool,
        token_id: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE token_id = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `token_id` belongs to a session that has not logged out.
    pub async fn is_active(pool: &PgPool, token_id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM user_sessions WHERE token_id = $1 AND status = $2)",
        )
        .bind(token_id)
        .bind(SessionStatus::Active.as_str())
        .fetch_one(pool)
        .await
    }

    /// Active sessions for a user, newest login first.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND status = $2
             ORDER BY login_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .bind(SessionStatus::Active.as_str())
            .fetch_all(pool)
            .await
    }

    /// All sessions for a user regardless of status, newest login first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1
             ORDER BY login_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
