//! Login/logout bookkeeping keyed by token id.

use sqlx::PgPool;
use storefront_core::pagination::{
    clamp_limit, DEFAULT_SESSION_HISTORY_LIMIT, MAX_SESSION_HISTORY_LIMIT,
};
use storefront_core::types::DbId;
use storefront_db::models::session::{CreateSession, UserSession};
use storefront_db::repositories::SessionRepo;

use crate::error::AppError;
use crate::services::log_failure;

/// Records one row per login and marks it on logout.
///
/// The ledger does not affect whether a token verifies; it only records
/// which token ids have been logged out.
#[derive(Clone)]
pub struct SessionLedger {
    pool: PgPool,
}

impl SessionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Always inserts a new `active` row; a user may hold many.
    pub async fn record_login(
        &self,
        user_id: DbId,
        token_id: &str,
        ip: Option<String>,
        user_agent: Option<String>,
    ) -> Result<UserSession, AppError> {
        let input = CreateSession {
            user_id,
            token_id: token_id.to_string(),
            ip,
            user_agent,
        };
        let session = SessionRepo::create(&self.pool, &input)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("record_login", e))?;

        tracing::debug!(user_id, session_id = session.id, "Session recorded");
        Ok(session)
    }

    /// Mark the session `logged_out`. Returns `None` when there is no active
    /// session for `token_id`, including when it was already logged out.
    pub async fn record_logout(&self, token_id: &str) -> Result<Option<UserSession>, AppError> {
        let session = SessionRepo::mark_logged_out(&self.pool, token_id)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("record_logout", e))?;

        match &session {
            Some(s) => tracing::debug!(user_id = s.user_id, session_id = s.id, "Session closed"),
            None => match SessionRepo::find_by_token_id(&self.pool, token_id).await {
                Ok(Some(existing)) => tracing::debug!(
                    session_id = existing.id,
                    status = %existing.status,
                    "Logout for already closed session"
                ),
                Ok(None) => tracing::debug!("Logout for unknown session"),
                Err(e) => tracing::warn!(error = %e, "Session lookup after logout failed"),
            },
        }
        Ok(session)
    }

    pub async fn list_active(&self, user_id: DbId) -> Result<Vec<UserSession>, AppError> {
        SessionRepo::list_active_for_user(&self.pool, user_id)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("list_active_sessions", e))
    }

    /// Login history, newest first, at most `limit` rows (default 50, max 200).
    pub async fn list_all(
        &self,
        user_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<UserSession>, AppError> {
        let limit = clamp_limit(
            limit,
            DEFAULT_SESSION_HISTORY_LIMIT,
            MAX_SESSION_HISTORY_LIMIT,
        );
        SessionRepo::list_for_user(&self.pool, user_id, limit)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("list_sessions", e))
    }

    pub async fn is_active(&self, token_id: &str) -> Result<bool, AppError> {
        SessionRepo::is_active(&self.pool, token_id)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("check_session", e))
    }
}
