//! Route definitions for the `/products` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create (requires auth)
/// GET    /mine    -> list_mine (requires auth)
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update (owner only)
/// DELETE /{id}    -> delete (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list).post(product::create))
        .route("/mine", get(product::list_mine))
        .route(
            "/{id}",
            get(product::get_by_id)
                .put(product::update)
                .delete(product::delete),
        )
}
