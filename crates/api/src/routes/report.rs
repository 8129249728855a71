//! Route definitions for the `/reports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /projects/{id}?start_date=&end_date=   -> project_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/projects/{id}", get(report::project_report))
}
