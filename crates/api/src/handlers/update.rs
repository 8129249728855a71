//! Handlers for half-day site updates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitelog_core::attendance::validate_update_type;
use sitelog_core::error::CoreError;
use sitelog_core::project_status::accepts_updates;
use sitelog_core::types::{DayDate, DbId};
use sitelog_db::models::update::{CreateDocument, CreateUpdate, SiteUpdate, UpdateWithDocuments};
use sitelog_db::repositories::{TeamRepo, UpdateRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::ensure_project_visible;
use crate::middleware::auth::AuthUser;
use crate::query::UpdateListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /updates`.
#[derive(Debug, Deserialize)]
pub struct CreateUpdateRequest {
    pub project_id: DbId,
    pub update_type: String,
    /// UTC calendar day. Defaults to today (UTC) when omitted.
    pub update_date: Option<DayDate>,
    #[serde(default)]
    pub status_note: String,
    /// Attachment descriptors produced by the storage collaborator.
    pub documents: Vec<CreateDocument>,
}

/// POST /api/v1/updates
///
/// Post a half-day field update with at least one attached document.
/// Allowed for the project's team members and its assigned contractor,
/// only while the project is in progress. A duplicate
/// (poster, project, day, half) posting fails with 409.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUpdateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UpdateWithDocuments>>)> {
    validate_update_type(&input.update_type)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    if input.documents.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "An update requires at least one attached document".into(),
        )));
    }

    // Visibility first: an out-of-scope project answers 404, not 403.
    let project = ensure_project_visible(&state, &auth, input.project_id).await?;

    let is_contractor = project.contractor_id == Some(auth.user_id);
    let is_team_member =
        TeamRepo::is_project_member(&state.pool, project.id, auth.user_id).await?;
    if !is_contractor && !is_team_member {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only team members and the assigned contractor may post updates".into(),
        )));
    }

    if !accepts_updates(&project.status) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Updates require an in-progress project (current status: '{}')",
            project.status
        ))));
    }

    let update_date = input
        .update_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let created = UpdateRepo::create(
        &state.pool,
        &CreateUpdate {
            project_id: project.id,
            contractor_id: project.contractor_id,
            posted_by: auth.user_id,
            update_type: input.update_type,
            update_date,
            status_note: input.status_note,
            documents: input.documents,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        project_id = project.id,
        update_id = created.update.id,
        update_type = %created.update.update_type,
        date = %created.update.update_date,
        "Update posted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/updates
///
/// List updates visible to the caller, optionally filtered by project and
/// day, paginated.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<UpdateListParams>,
) -> AppResult<Json<DataResponse<Vec<SiteUpdate>>>> {
    let scope = auth.scope(&state.pool).await?;
    let updates = UpdateRepo::list(
        &state.pool,
        &scope,
        params.project_id,
        params.date,
        params.limit,
        params.offset,
    )
    .await?;
    Ok(Json(DataResponse { data: updates }))
}

/// GET /api/v1/updates/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UpdateWithDocuments>>> {
    let found = UpdateRepo::find_by_id(&state.pool, id).await?;
    let scope = auth.scope(&state.pool).await?;
    match found {
        Some(found) if scope.allows(found.update.project_id) => {
            Ok(Json(DataResponse { data: found }))
        }
        _ => Err(AppError::Core(CoreError::NotFound {
            entity: "Update",
            id,
        })),
    }
}
