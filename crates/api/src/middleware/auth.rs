//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use storefront_core::error::CoreError;
use storefront_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Checks signature and expiry only. A token whose session was logged out
/// still passes; use [`RequireActiveSession`](super::session::RequireActiveSession)
/// where that matters.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.userId`).
    pub user_id: DbId,
    pub email: String,
    /// The token's `jti`, if it carried one.
    pub token_id: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.ok_or_else(|| {
            AppError::Core(CoreError::InvalidToken(
                "Missing Authorization header".into(),
            ))
        })?;

        let claims = state.tokens.verify(token)?;

        Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.email,
            token_id: claims.jti,
        })
    }
}

/// The token from an `Authorization: Bearer <token>` header.
///
/// `Ok(None)` when the header is absent; an error when it is present but
/// not a bearer credential.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get("authorization") else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Some)
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidToken(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })
}
