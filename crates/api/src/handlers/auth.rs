//! Handlers for the `/auth` resource (register, login, logout, profile, sessions).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use storefront_core::error::CoreError;
use storefront_core::validation::parse_iso_date;
use storefront_db::models::session::UserSession;
use storefront_db::models::user::PublicUser;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{rules, ValidQuery, ValidatedJson};
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::middleware::client::ClientMeta;
use crate::middleware::session::RequireActiveSession;
use crate::query::{SessionFilter, SessionListParams};
use crate::response::ApiResponse;
use crate::services::account::{AuthOutcome, RegisterInput};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(custom(function = "rules::password_complexity"))]
    pub password: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Confirm password is required"),
        must_match(other = "password", message = "Passwords do not match")
    )]
    pub confirm_password: String,
    #[validate(custom(function = "rules::first_name"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "rules::last_name"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "rules::user_name"))]
    pub user_name: Option<String>,
    #[validate(custom(function = "rules::gender"))]
    pub gender: Option<String>,
    #[validate(custom(function = "rules::date_of_birth"))]
    pub dob: Option<String>,
    #[validate(custom(function = "rules::phone"))]
    pub phone: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Returned by register and login. The token id stays server-side.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: PublicUser,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an account, record its first session, and return a token.
pub async fn register(
    State(state): State<AppState>,
    client: ClientMeta,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    let dob = input.dob.as_deref().map(parse_iso_date).transpose()?;

    let outcome = state
        .accounts
        .register(RegisterInput {
            email: input.email,
            password: input.password,
            user_name: input.user_name,
            first_name: input.first_name,
            last_name: input.last_name,
            gender: input.gender,
            dob,
            phone: input.phone,
        })
        .await?;

    let payload = start_session(&state, outcome, client).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(payload, "User registered successfully"),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientMeta,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthPayload>>> {
    let outcome = state.accounts.login(&input.email, &input.password).await?;

    let payload = start_session(&state, outcome, client).await?;
    Ok(ApiResponse::success(payload, "Login successful"))
}

/// POST /api/auth/logout
///
/// Always succeeds. When a correctly signed bearer token is present (even an
/// expired one) its session is marked `logged_out`; repeating the call is a
/// no-op. Forged or unreadable tokens are ignored.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<()>>> {
    let token = bearer_token(&headers).ok().flatten();

    let token_id = token
        .and_then(|t| state.tokens.verify_ignoring_expiry(t).ok())
        .and_then(|claims| claims.jti);

    if let Some(token_id) = token_id {
        state.sessions.record_logout(&token_id).await?;
    }

    Ok(ApiResponse::message_only("Logged out"))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let user = state
        .accounts
        .get_by_id(auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(ApiResponse::success(user, "Profile retrieved successfully"))
}

/// GET /api/auth/sessions?status=active|all&limit=
///
/// The caller's own sessions. Requires a session that is still active.
pub async fn sessions(
    State(state): State<AppState>,
    RequireActiveSession(auth): RequireActiveSession,
    ValidQuery(params): ValidQuery<SessionListParams>,
) -> AppResult<Json<ApiResponse<Vec<UserSession>>>> {
    let sessions = match params.status {
        SessionFilter::Active => state.sessions.list_active(auth.user_id).await?,
        SessionFilter::All => state.sessions.list_all(auth.user_id, params.limit).await?,
    };

    Ok(ApiResponse::success(
        sessions,
        "Sessions retrieved successfully",
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Record the login in the session ledger and build the response payload.
async fn start_session(
    state: &AppState,
    outcome: AuthOutcome,
    client: ClientMeta,
) -> AppResult<AuthPayload> {
    state
        .sessions
        .record_login(
            outcome.user.id,
            &outcome.token_id,
            client.ip,
            client.user_agent,
        )
        .await?;

    Ok(AuthPayload {
        user: outcome.user,
        token: outcome.token,
    })
}
