//! Handlers for derived attendance records.

use axum::extract::{Query, State};
use axum::Json;
use sitelog_db::models::attendance::Attendance;
use sitelog_db::repositories::AttendanceRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::AttendanceListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance
///
/// List attendance rows visible to the caller, optionally filtered by
/// user, project, and inclusive day range.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AttendanceListParams>,
) -> AppResult<Json<DataResponse<Vec<Attendance>>>> {
    let scope = auth.scope(&state.pool).await?;
    let rows = AttendanceRepo::list(
        &state.pool,
        &scope,
        params.user_id,
        params.project_id,
        params.start_date,
        params.end_date,
    )
    .await?;
    Ok(Json(DataResponse { data: rows }))
}
