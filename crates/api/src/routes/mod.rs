pub mod admin;
pub mod attendance;
pub mod auth;
pub mod health;
pub mod project;
pub mod report;
pub mod request;
pub mod team;
pub mod update;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout (requires auth)
///
/// /admin/users                             list, create (admin only)
/// /admin/users/{id}                        get, update, deactivate
///
/// /projects                                list (scoped), create (admin)
/// /projects/{id}                           get (scoped), update (admin)
/// /projects/{id}/assign                    assign contractor (admin)
/// /projects/{id}/status                    status transition (admin)
/// /projects/{project_id}/teams             list (scoped), create
///
/// /teams/{id}/members                      add member
/// /teams/{id}/members/{user_id}            remove member
///
/// /updates                                 list (scoped), create
/// /updates/{id}                            get (scoped)
///
/// /attendance                              list (scoped)
///
/// /requests                                list (role-dependent)
/// /requests/completion                     file completion (contractor)
/// /requests/extension                      file extension (contractor)
/// /requests/{id}/approve                   approve (admin)
/// /requests/{id}/reject                    reject (admin)
/// /requests/{id}                           cancel (requester)
///
/// /reports/projects/{id}                   date-by-member grid (admin/accounts)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .merge(project::router())
        .merge(team::router())
        .nest("/updates", update::router())
        .nest("/attendance", attendance::router())
        .nest("/requests", request::router())
        .nest("/reports", report::router())
}
