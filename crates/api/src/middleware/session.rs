//! Extractor for endpoints that must reject logged-out tokens.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use storefront_core::error::CoreError;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// An [`AuthUser`] whose token id maps to an `active` session row.
///
/// Tokens without a `jti`, or whose session was logged out, are rejected
/// with 401 even though their signature is still valid.
#[derive(Debug, Clone)]
pub struct RequireActiveSession(pub AuthUser);

impl FromRequestParts<AppState> for RequireActiveSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let active = match user.token_id.as_deref() {
            Some(token_id) => state.sessions.is_active(token_id).await?,
            None => false,
        };
        if !active {
            return Err(AppError::Core(CoreError::InvalidToken(
                "Session has ended".into(),
            )));
        }

        Ok(RequireActiveSession(user))
    }
}
