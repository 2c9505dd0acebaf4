pub mod auth;
pub mod health;
pub mod product;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/logout                   logout (bearer optional)
/// /auth/profile                  caller's profile (auth)
/// /auth/sessions                 caller's sessions (auth + active session)
///
/// /products                      list (public), create (auth)
/// /products/mine                 caller's products (auth)
/// /products/{id}                 get (public), update, delete (owner)
///
/// /users/{id}                    get (public), update, delete (self)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", product::router())
        .nest("/users", user::router())
}
