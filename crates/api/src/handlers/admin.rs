//! Admin-only user management handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitelog_core::error::CoreError;
use sitelog_core::types::DbId;
use sitelog_db::models::user::{CreateUser, UpdateUser, UserResponse};
use sitelog_db::repositories::{RoleRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub role_id: DbId,
}

/// POST /api/v1/admin/users
///
/// Create a user of any role. Admin only.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let role = RoleRepo::find_by_id(&state.pool, input.role_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Role",
            id: input.role_id,
        }))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            full_name: input.full_name,
            email: input.email,
            password_hash,
            role_id: role.id,
        },
    )
    .await?;

    tracing::info!(admin_id = admin.user_id, user_id = user.id, role = %role.name, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from_user(user, role.name),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let roles = RoleRepo::list(&state.pool).await?;

    let data = users
        .into_iter()
        .map(|user| {
            let role = roles
                .iter()
                .find(|r| r.id == user.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "unknown".to_string());
            UserResponse::from_user(user, role)
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(user, role),
    }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(role_id) = input.role_id {
        RoleRepo::find_by_id(&state.pool, role_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Role",
                id: role_id,
            }))?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "User updated");

    Ok(Json(DataResponse {
        data: UserResponse::from_user(user, role),
    }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate: the row stays for audit, the account can no longer log in.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    tracing::info!(admin_id = admin.user_id, user_id = id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
