//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update (self only)
/// DELETE /{id}  -> delete (self only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(user::get_by_id).put(user::update).delete(user::delete),
    )
}
