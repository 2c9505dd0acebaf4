//! HTTP-level integration tests for the `/api/auth` endpoints.
//!
//! Tests cover registration, login, logout idempotency, profile access, and
//! the session listing that rejects logged-out tokens.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, get, get_auth, post_auth, post_json, register_user, TEST_JWT_SECRET,
};
use sqlx::PgPool;
use storefront_api::auth::jwt::{JwtConfig, TokenIssuer};
use storefront_api::services::session_ledger::SessionLedger;
use storefront_db::repositories::{SessionRepo, UserRepo};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn register_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "password": "Passw0rd",
        "confirmPassword": "Passw0rd",
        "userName": "shopper",
        "gender": "other",
        "dob": "1990-04-12",
        "phone": "+1 555 1234567",
    })
}

async fn login(pool: &PgPool, email: &str, password: &str) -> axum::http::Response<Body> {
    let body = serde_json::json!({ "email": email, "password": password });
    post_json(common::build_test_app(pool.clone()), "/api/auth/login", body).await
}

fn jti_of(token: &str) -> String {
    TokenIssuer::decode(token)
        .and_then(|claims| claims.jti)
        .expect("issued tokens carry a jti")
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration returns 201 with the public user and a token, and records a session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/auth/register", register_body("New@Example.com")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "User registered successfully");

    let user = &json["data"]["user"];
    assert_eq!(user["email"], "new@example.com");
    assert_eq!(user["userName"], "shopper");
    assert_eq!(user["dob"], "1990-04-12");
    assert_eq!(user["isActive"], true);
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());

    let token = json["data"]["token"].as_str().unwrap();
    let session = SessionRepo::find_by_token_id(&pool, &jti_of(token))
        .await
        .unwrap()
        .expect("registration records a session");
    assert_eq!(session.user_id, user["id"].as_i64().unwrap());
}

/// A second registration with the same email fails with 409 and leaves one row.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    register_user(&pool, "dup@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/auth/register", register_body("DUP@example.com")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "User with this email already exists");
    assert_eq!(json["error"], "CONFLICT");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind("dup@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/auth/register", register_body("one@example.com")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/register", register_body("two@example.com")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Username already taken");
}

/// Rule failures come back as one joined message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_validation_failure(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "not-an-email",
        "password": "Passw0rd",
        "confirmPassword": "Different1",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(
        json["error"],
        "Passwords do not match, Please provide a valid email address"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_weak_password_and_future_dob(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "weak@example.com",
        "password": "password",
        "confirmPassword": "password",
        "dob": "2999-01-01",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("Date of birth cannot be in the future"), "{error}");
    assert!(error.contains("one uppercase letter"), "{error}");
}

/// A body that is not JSON is a 400 BAD_REQUEST.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_json_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success_records_new_session(pool: PgPool) {
    let (user_id, _) = register_user(&pool, "login@example.com").await;

    let response = login(&pool, "LOGIN@example.com", "Passw0rd").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Login successful");
    assert_eq!(json["data"]["user"]["id"], user_id);

    let active = SessionRepo::list_active_for_user(&pool, user_id)
        .await
        .unwrap();
    assert_eq!(active.len(), 2, "register and login each record a session");
}

/// Unknown email and wrong password are indistinguishable.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_failures_are_indistinguishable(pool: PgPool) {
    register_user(&pool, "known@example.com").await;

    let wrong_password = login(&pool, "known@example.com", "Wrong0ne").await;
    let unknown_email = login(&pool, "ghost@example.com", "Passw0rd").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
    assert_eq!(a["message"], "Invalid email or password");
    assert_eq!(a["error"], "INVALID_CREDENTIALS");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_deactivated_account(pool: PgPool) {
    let (user_id, _) = register_user(&pool, "off@example.com").await;
    UserRepo::deactivate(&pool, user_id).await.unwrap();

    let response = login(&pool, "off@example.com", "Passw0rd").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "ACCOUNT_DEACTIVATED");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// register -> logout -> logout: both calls succeed, the session closes once.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_end_to_end_is_idempotent(pool: PgPool) {
    let (_, token) = register_user(&pool, "out@example.com").await;
    let jti = jti_of(&token);

    let response = post_auth(common::build_test_app(pool.clone()), "/api/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logged out");

    let first = SessionRepo::find_by_token_id(&pool, &jti).await.unwrap().unwrap();
    assert_eq!(first.status.as_str(), "logged_out");

    let response = post_auth(common::build_test_app(pool.clone()), "/api/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let second = SessionRepo::find_by_token_id(&pool, &jti).await.unwrap().unwrap();
    assert_eq!(second.status.as_str(), "logged_out");
    assert_eq!(second.logout_at, first.logout_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_without_token_succeeds(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/logout", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// An expired but correctly signed token still closes its session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_accepts_expired_token(pool: PgPool) {
    let (user_id, _) = register_user(&pool, "late@example.com").await;

    let expired_issuer = TokenIssuer::new(&JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        expires_in_secs: -600,
    });
    let jti = TokenIssuer::mint_token_id();
    let expired = expired_issuer
        .issue(user_id, "late@example.com", Some(&jti))
        .unwrap();
    SessionLedger::new(pool.clone())
        .record_login(user_id, &jti, None, None)
        .await
        .unwrap();

    let response = post_auth(common::build_test_app(pool.clone()), "/api/auth/logout", &expired).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!SessionRepo::is_active(&pool, &jti).await.unwrap());
}

/// A token signed with another secret cannot close anyone's session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_ignores_forged_token(pool: PgPool) {
    let (user_id, token) = register_user(&pool, "victim@example.com").await;
    let jti = jti_of(&token);

    let forger = TokenIssuer::new(&JwtConfig {
        secret: "not-the-server-secret".to_string(),
        expires_in_secs: 3600,
    });
    let forged = forger
        .issue(user_id, "victim@example.com", Some(&jti))
        .unwrap();

    let response = post_auth(common::build_test_app(pool.clone()), "/api/auth/logout", &forged).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(SessionRepo::is_active(&pool, &jti).await.unwrap());
}

// ---------------------------------------------------------------------------
// Profile and sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_requires_token(pool: PgPool) {
    let response = get(common::build_test_app(pool.clone()), "/api/auth/profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "INVALID_TOKEN");

    let response = get_auth(common::build_test_app(pool), "/api/auth/profile", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_returns_caller(pool: PgPool) {
    let (user_id, token) = register_user(&pool, "me@example.com").await;

    let response = get_auth(common::build_test_app(pool), "/api/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Profile retrieved successfully");
    assert_eq!(json["data"]["id"], user_id);
    assert_eq!(json["data"]["email"], "me@example.com");
}

/// Listing sessions needs an active session; logging out revokes access.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sessions_listing_and_revocation(pool: PgPool) {
    let (_, token) = register_user(&pool, "sess@example.com").await;
    let second = body_json(login(&pool, "sess@example.com", "Passw0rd").await).await;
    let second_token = second["data"]["token"].as_str().unwrap().to_string();

    let response = get_auth(common::build_test_app(pool.clone()), "/api/auth/sessions", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let sessions = json["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["tokenId"], jti_of(&second_token));
    assert_eq!(sessions[0]["status"], "active");

    post_auth(common::build_test_app(pool.clone()), "/api/auth/logout", &token).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/auth/sessions", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The signature is still valid, so plain authenticated endpoints accept it.
    let response = get_auth(common::build_test_app(pool.clone()), "/api/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/auth/sessions?status=all&limit=1",
        &second_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
