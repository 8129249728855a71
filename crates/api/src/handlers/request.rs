//! Handlers for the completion/extension request workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitelog_core::error::CoreError;
use sitelog_core::request::{
    validate_extension_date, validate_request_creation, validate_resolvable, REQUEST_COMPLETION,
    REQUEST_EXTENSION,
};
use sitelog_core::roles::{ROLE_ACCOUNTS, ROLE_ADMIN};
use sitelog_core::types::{DayDate, DbId};
use sitelog_db::models::project::Project;
use sitelog_db::models::project_request::{ApproveRequestBody, CreateRequest, ProjectRequest};
use sitelog_db::repositories::{ProjectRepo, ProjectRequestRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireContractor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /requests/completion`.
#[derive(Debug, Deserialize)]
pub struct CompletionRequestBody {
    pub project_id: DbId,
}

/// Request body for `POST /requests/extension`.
#[derive(Debug, Deserialize)]
pub struct ExtensionRequestBody {
    pub project_id: DbId,
    pub requested_end_date: DayDate,
}

/// Query filters for `GET /requests`.
#[derive(Debug, Deserialize)]
pub struct RequestListParams {
    pub project_id: Option<DbId>,
}

/// Resolution result: the terminal request and the mutated project.
#[derive(Debug, serde::Serialize)]
pub struct ResolvedRequest {
    pub request: ProjectRequest,
    pub project: Project,
}

// ---------------------------------------------------------------------------
// Creation (contractor)
// ---------------------------------------------------------------------------

/// Fetch the project and run the shared request-creation preconditions.
async fn validated_project(
    state: &AppState,
    requested_by: DbId,
    project_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    // A contractor not assigned to this project learns nothing about it.
    if project.contractor_id != Some(requested_by) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }));
    }

    validate_request_creation(requested_by, project.contractor_id, &project.status)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    Ok(project)
}

/// POST /api/v1/requests/completion
///
/// File a completion request. Assigned contractor only; one pending
/// completion request per project (409 on the duplicate).
pub async fn create_completion(
    RequireContractor(auth): RequireContractor,
    State(state): State<AppState>,
    Json(input): Json<CompletionRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRequest>>)> {
    let project = validated_project(&state, auth.user_id, input.project_id).await?;

    let request = ProjectRequestRepo::create(
        &state.pool,
        &CreateRequest {
            project_id: project.id,
            requested_by: auth.user_id,
            request_type: REQUEST_COMPLETION.to_string(),
            requested_end_date: None,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        project_id = project.id,
        request_id = request.id,
        "Completion request filed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// POST /api/v1/requests/extension
///
/// File an extension request. The requested end date must be strictly
/// after the project's current end date.
pub async fn create_extension(
    RequireContractor(auth): RequireContractor,
    State(state): State<AppState>,
    Json(input): Json<ExtensionRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRequest>>)> {
    let project = validated_project(&state, auth.user_id, input.project_id).await?;

    validate_extension_date(input.requested_end_date, project.end_date)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let request = ProjectRequestRepo::create(
        &state.pool,
        &CreateRequest {
            project_id: project.id,
            requested_by: auth.user_id,
            request_type: REQUEST_EXTENSION.to_string(),
            requested_end_date: Some(input.requested_end_date),
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        project_id = project.id,
        request_id = request.id,
        requested_end_date = %input.requested_end_date,
        "Extension request filed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/v1/requests
///
/// Admin and accounts see every request; a contractor sees their own.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RequestListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectRequest>>>> {
    let requested_by = if auth.role == ROLE_ADMIN || auth.role == ROLE_ACCOUNTS {
        None
    } else if auth.role == sitelog_core::roles::ROLE_CONTRACTOR {
        Some(auth.user_id)
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requests are visible to admin, accounts, and contractors".into(),
        )));
    };

    let requests = ProjectRequestRepo::list(&state.pool, requested_by, params.project_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

// ---------------------------------------------------------------------------
// Resolution (admin)
// ---------------------------------------------------------------------------

/// PATCH /api/v1/requests/{id}/approve
///
/// Approve a pending request. Completion completes the project; extension
/// moves its end date. The request update and project mutation commit
/// together.
pub async fn approve(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveRequestBody>,
) -> AppResult<Json<DataResponse<ResolvedRequest>>> {
    let request = ProjectRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }))?;
    validate_resolvable(&request.status)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    // For extensions, settle the effective date up front so the project
    // mutation inside the transaction is already validated.
    let effective_end_date = if request.request_type == REQUEST_EXTENSION {
        let project = ProjectRepo::find_by_id(&state.pool, request.project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: request.project_id,
            }))?;
        let effective = input
            .approved_end_date
            .or(request.requested_end_date)
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "Extension request has no end date to apply".into(),
                ))
            })?;
        validate_extension_date(effective, project.end_date)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
        Some(effective)
    } else {
        None
    };

    let (request, project) =
        ProjectRequestRepo::approve(&state.pool, id, admin.user_id, effective_end_date)
            .await?
            .ok_or_else(|| {
                // Lost a race with another resolution.
                AppError::Core(CoreError::Conflict(
                    "Request has already been resolved".into(),
                ))
            })?;

    tracing::info!(
        admin_id = admin.user_id,
        request_id = id,
        project_id = project.id,
        request_type = %request.request_type,
        "Request approved"
    );

    Ok(Json(DataResponse {
        data: ResolvedRequest { request, project },
    }))
}

/// PATCH /api/v1/requests/{id}/reject
///
/// Reject a pending request. Rejecting a completion request restores the
/// project to in-progress if its status had drifted.
pub async fn reject(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ResolvedRequest>>> {
    let request = ProjectRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }))?;
    validate_resolvable(&request.status)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let (request, project) = ProjectRequestRepo::reject(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Request has already been resolved".into(),
            ))
        })?;

    tracing::info!(
        admin_id = admin.user_id,
        request_id = id,
        project_id = project.id,
        request_type = %request.request_type,
        "Request rejected"
    );

    Ok(Json(DataResponse {
        data: ResolvedRequest { request, project },
    }))
}

/// DELETE /api/v1/requests/{id}
///
/// Withdraw a pending request. Only the original requester may cancel.
pub async fn cancel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let cancelled = ProjectRequestRepo::cancel(&state.pool, id, auth.user_id).await?;
    if !cancelled {
        // Missing, resolved, or someone else's request: all the same 404.
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }));
    }

    tracing::info!(user_id = auth.user_id, request_id = id, "Request cancelled");

    Ok(StatusCode::NO_CONTENT)
}
