//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitelog_core::error::CoreError;
use sitelog_core::project_status::validate_transition;
use sitelog_core::roles::ROLE_CONTRACTOR;
use sitelog_core::types::{DayDate, DbId};
use sitelog_db::models::project::{CreateProject, Project, UpdateProject};
use sitelog_db::repositories::{ProjectRepo, ProjectRequestRepo, RoleRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DayDate>,
    pub end_date: Option<DayDate>,
    #[validate(range(min = 0))]
    pub budget: Option<i64>,
}

/// Request body for `POST /projects/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignContractorRequest {
    pub contractor_id: DbId,
}

/// Request body for `PATCH /projects/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Fetch a project and enforce the caller's visibility scope.
///
/// An existing project outside the caller's scope answers exactly like a
/// missing one, so callers cannot probe for ids.
pub async fn ensure_project_visible(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, id).await?;
    let scope = auth.scope(&state.pool).await?;
    match project {
        Some(project) if scope.allows(project.id) => Ok(project),
        _ => Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        })),
    }
}

/// POST /api/v1/projects
///
/// Create a project in `planning` status. Admin only; the creating admin
/// becomes the owner.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if start > end {
            return Err(AppError::Core(CoreError::Validation(
                "start_date must not be after end_date".into(),
            )));
        }
    }

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            name: input.name,
            description: input.description,
            admin_id: admin.user_id,
            start_date: input.start_date,
            end_date: input.end_date,
            budget: input.budget,
        },
    )
    .await?;

    tracing::info!(admin_id = admin.user_id, project_id = project.id, "Project created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
///
/// List projects visible to the caller.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let scope = auth.scope(&state.pool).await?;
    let projects = ProjectRepo::list(&state.pool, &scope).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ensure_project_visible(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
///
/// Update project metadata (never status). Admin only.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    if let Some(budget) = input.budget {
        if budget < 0 {
            return Err(AppError::Core(CoreError::Validation(
                "budget must not be negative".into(),
            )));
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(admin_id = admin.user_id, project_id = id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/assign
///
/// Assign a contractor to the project. Admin only; the assignee must hold
/// the contractor role.
pub async fn assign_contractor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignContractorRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let contractor = UserRepo::find_by_id(&state.pool, input.contractor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.contractor_id,
        }))?;

    let role = RoleRepo::resolve_name(&state.pool, contractor.role_id).await?;
    if role != ROLE_CONTRACTOR {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {} does not hold the contractor role",
            contractor.id
        ))));
    }
    if !contractor.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {} is deactivated",
            contractor.id
        ))));
    }

    let project = ProjectRepo::set_contractor(&state.pool, id, contractor.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(
        admin_id = admin.user_id,
        project_id = id,
        contractor_id = contractor.id,
        "Contractor assigned"
    );

    Ok(Json(DataResponse { data: project }))
}

/// PATCH /api/v1/projects/{id}/status
///
/// Direct status write through the lifecycle state machine. Admin only.
/// Refused while any completion/extension request is pending.
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let has_pending = ProjectRequestRepo::has_pending_for_project(&state.pool, id).await?;
    validate_transition(&project.status, &input.status, has_pending)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let project = ProjectRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(
        admin_id = admin.user_id,
        project_id = id,
        status = %input.status,
        "Project status changed"
    );

    Ok(Json(DataResponse { data: project }))
}
