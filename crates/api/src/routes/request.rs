//! Route definitions for the `/requests` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::request;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// GET    /               -> list
/// POST   /completion     -> create_completion
/// POST   /extension      -> create_extension
/// PATCH  /{id}/approve   -> approve
/// PATCH  /{id}/reject    -> reject
/// DELETE /{id}           -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(request::list))
        .route("/completion", post(request::create_completion))
        .route("/extension", post(request::create_extension))
        .route("/{id}/approve", patch(request::approve))
        .route("/{id}/reject", patch(request::reject))
        .route("/{id}", axum::routing::delete(request::cancel))
}
