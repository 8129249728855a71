//! Route definitions for the `/attendance` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// GET /   -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(attendance::list))
}
