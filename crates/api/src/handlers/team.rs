//! Handlers for teams and team membership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitelog_core::error::CoreError;
use sitelog_core::roles::{ROLE_ADMIN, TEAM_MEMBER_ROLES};
use sitelog_core::types::DbId;
use sitelog_db::models::team::{CreateTeam, Team, TeamMember, TeamWithMembers};
use sitelog_db::repositories::{ProjectRepo, RoleRepo, TeamRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::ensure_project_visible;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /teams/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
}

/// Admins manage any team; a contractor manages teams on projects assigned
/// to them.
async fn ensure_can_manage(
    state: &AppState,
    auth: &AuthUser,
    project_contractor_id: Option<DbId>,
    project_id: DbId,
) -> AppResult<()> {
    if auth.role == ROLE_ADMIN {
        return Ok(());
    }
    if project_contractor_id == Some(auth.user_id) {
        return Ok(());
    }
    // Everyone else gets the same answer as for an unknown project.
    let scope = auth.scope(&state.pool).await?;
    if scope.allows(project_id) {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the admin or the assigned contractor may manage teams".into(),
        )))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
    }
}

/// GET /api/v1/projects/{project_id}/teams
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TeamWithMembers>>>> {
    ensure_project_visible(&state, &auth, project_id).await?;
    let teams = TeamRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: teams }))
}

/// POST /api/v1/projects/{project_id}/teams
///
/// Create a team under the project. Admin or the assigned contractor.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTeam>,
) -> AppResult<(StatusCode, Json<DataResponse<Team>>)> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    ensure_can_manage(&state, &auth, project.contractor_id, project_id).await?;

    let team = TeamRepo::create(&state.pool, project_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        project_id = project_id,
        team_id = team.id,
        "Team created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: team })))
}

/// POST /api/v1/teams/{id}/members
///
/// Add a user to the team. The user must hold an allowed team role; the
/// unique constraint rejects duplicates with 409.
pub async fn add_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamMember>>)> {
    let team = TeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Team",
            id: team_id,
        }))?;
    let project = ProjectRepo::find_by_id(&state.pool, team.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: team.project_id,
        }))?;

    ensure_can_manage(&state, &auth, project.contractor_id, project.id).await?;

    let user = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    if !TEAM_MEMBER_ROLES.contains(&role.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Role '{role}' cannot be added to a team"
        ))));
    }
    if !user.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {} is deactivated",
            user.id
        ))));
    }

    let member = TeamRepo::add_member(&state.pool, team_id, user.id).await?;

    tracing::info!(
        user_id = auth.user_id,
        team_id = team_id,
        member_id = user.id,
        "Team member added"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// DELETE /api/v1/teams/{id}/members/{user_id}
pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let team = TeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Team",
            id: team_id,
        }))?;
    let project = ProjectRepo::find_by_id(&state.pool, team.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: team.project_id,
        }))?;

    ensure_can_manage(&state, &auth, project.contractor_id, project.id).await?;

    let removed = TeamRepo::remove_member(&state.pool, team_id, user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TeamMember",
            id: user_id,
        }));
    }

    tracing::info!(
        user_id = auth.user_id,
        team_id = team_id,
        member_id = user_id,
        "Team member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
