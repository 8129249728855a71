//! Repository for the `projects` table, including visibility scoping.

use sitelog_core::types::DbId;
use sitelog_core::visibility::AccessScope;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, admin_id, contractor_id, status, \
                        start_date, end_date, budget, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in `planning` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, admin_id, start_date, end_date, budget)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.admin_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.budget)
            .fetch_one(pool)
            .await
    }

    /// Find a project by internal ID, without visibility filtering.
    ///
    /// Callers outside the admin surface must check the caller's
    /// [`AccessScope`] before exposing the row.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects visible in the given scope, most recently created first.
    pub async fn list(pool: &PgPool, scope: &AccessScope) -> Result<Vec<Project>, sqlx::Error> {
        match scope.filter_ids() {
            None => {
                let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
                sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
            }
            Some(ids) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM projects WHERE id = ANY($1) ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Project>(&query)
                    .bind(ids)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Update project metadata. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                budget = COALESCE($6, budget)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.budget)
            .fetch_optional(pool)
            .await
    }

    /// Assign a contractor. Returns the updated row, or `None` if not found.
    pub async fn set_contractor(
        pool: &PgPool,
        id: DbId,
        contractor_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET contractor_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(contractor_id)
            .fetch_optional(pool)
            .await
    }

    /// Write a new status. Transition legality is validated upstream via
    /// `sitelog_core::project_status::validate_transition`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("UPDATE projects SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Compute the caller's project scope from role and memberships.
    ///
    /// Contractors see directly assigned projects only; members see
    /// projects reachable through team membership; office roles
    /// (admin/accounts/developer) are unrestricted.
    pub async fn scope_for(
        pool: &PgPool,
        user_id: DbId,
        role: &str,
    ) -> Result<AccessScope, sqlx::Error> {
        if AccessScope::role_is_unrestricted(role) {
            return Ok(AccessScope::Unrestricted);
        }
        let ids: Vec<DbId> = if role == sitelog_core::roles::ROLE_CONTRACTOR {
            sqlx::query_scalar("SELECT id FROM projects WHERE contractor_id = $1")
                .bind(user_id)
                .fetch_all(pool)
                .await?
        } else {
            sqlx::query_scalar(
                "SELECT DISTINCT t.project_id
                 FROM team_members tm
                 JOIN teams t ON t.id = tm.team_id
                 WHERE tm.user_id = $1",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        };
        Ok(AccessScope::restricted(ids))
    }
}
