//! Route definitions for team membership management.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::team;
use crate::state::AppState;

/// Membership routes mounted at the API root.
///
/// ```text
/// POST   /teams/{id}/members            -> add_member
/// DELETE /teams/{id}/members/{user_id}  -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams/{id}/members", post(team::add_member))
        .route(
            "/teams/{id}/members/{user_id}",
            delete(team::remove_member),
        )
}
