//! Route definitions for the `/updates` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::update;
use crate::state::AppState;

/// Routes mounted at `/updates`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(update::list).post(update::create))
        .route("/{id}", get(update::get_by_id))
}
