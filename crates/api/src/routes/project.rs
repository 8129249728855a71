//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped team routes under `/projects/{project_id}/teams`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{project, team};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// POST   /{id}/assign               -> assign_contractor
/// PATCH  /{id}/status               -> set_status
///
/// GET    /{project_id}/teams        -> list_by_project
/// POST   /{project_id}/teams        -> create
/// ```
pub fn router() -> Router<AppState> {
    let team_routes = Router::new().route("/", get(team::list_by_project).post(team::create));

    Router::new()
        .route("/projects", get(project::list).post(project::create))
        .route(
            "/projects/{id}",
            get(project::get_by_id).put(project::update),
        )
        .route("/projects/{id}/assign", post(project::assign_contractor))
        .route("/projects/{id}/status", patch(project::set_status))
        .nest("/projects/{project_id}/teams", team_routes)
}
