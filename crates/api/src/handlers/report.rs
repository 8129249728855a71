//! Read-only project report handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use sitelog_core::error::CoreError;
use sitelog_core::report::{build_grid, validate_range, DayRow};
use sitelog_core::types::{DayDate, DbId};
use sitelog_db::repositories::{ProjectRepo, ReportRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::query::ReportRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// The assembled date-by-member report for one project.
#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub project_id: DbId,
    pub start_date: DayDate,
    pub end_date: DayDate,
    /// Everyone the grid covers, sorted by user id.
    pub member_ids: Vec<DbId>,
    /// One row per calendar day in the inclusive range.
    pub days: Vec<DayRow>,
}

/// GET /api/v1/reports/projects/{id}?start_date=&end_date=
///
/// Build the date-by-member update grid for the project over an inclusive
/// UTC day range. Admin and accounts only.
pub async fn project_report(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(range): Query<ReportRangeParams>,
) -> AppResult<Json<DataResponse<ProjectReport>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    validate_range(
        range.start_date,
        range.end_date,
        project.start_date,
        project.end_date,
    )
    .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let member_ids = ReportRepo::member_ids(&state.pool, id, project.contractor_id).await?;
    let cells = ReportRepo::update_cells(&state.pool, id, range.start_date, range.end_date).await?;
    let days = build_grid(range.start_date, range.end_date, &member_ids, &cells);

    tracing::debug!(
        staff_id = staff.user_id,
        project_id = id,
        members = member_ids.len(),
        days = days.len(),
        "Project report assembled"
    );

    Ok(Json(DataResponse {
        data: ProjectReport {
            project_id: id,
            start_date: range.start_date,
            end_date: range.end_date,
            member_ids,
            days,
        },
    }))
}
