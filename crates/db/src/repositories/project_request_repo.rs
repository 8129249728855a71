//! Repository for the `project_requests` table.
//!
//! Approve and reject mutate the request and the referenced project inside
//! one transaction: the request's terminal state and the project side
//! effect land together or not at all.

use sitelog_core::request::{REQUEST_COMPLETION, REQUEST_STATUS_PENDING};
use sitelog_core::project_status::{STATUS_COMPLETED, STATUS_IN_PROGRESS};
use sitelog_core::types::{DayDate, DbId};
use sqlx::PgPool;

use crate::models::project::Project;
use crate::models::project_request::{CreateRequest, ProjectRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, requested_by, request_type, status, \
                        requested_end_date, approved_end_date, reviewed_by, reviewed_at, \
                        created_at, updated_at";

const PROJECT_COLUMNS: &str = "id, name, description, admin_id, contractor_id, status, \
                                start_date, end_date, budget, created_at, updated_at";

/// Provides the contractor request workflow operations.
pub struct ProjectRequestRepo;

impl ProjectRequestRepo {
    /// Insert a new pending request, returning the created row.
    ///
    /// The partial unique index on (project_id, request_type) for pending
    /// rows rejects a second pending request of the same type.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRequest,
    ) -> Result<ProjectRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_requests
                (project_id, requested_by, request_type, requested_end_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(input.project_id)
            .bind(input.requested_by)
            .bind(&input.request_type)
            .bind(input.requested_end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a request by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_requests WHERE id = $1");
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests, newest first, optionally filtered by requester
    /// and/or project.
    pub async fn list(
        pool: &PgPool,
        requested_by: Option<DbId>,
        project_id: Option<DbId>,
    ) -> Result<Vec<ProjectRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_requests
             WHERE ($1::bigint IS NULL OR requested_by = $1)
               AND ($2::bigint IS NULL OR project_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(requested_by)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any request is pending for the project. Gates every direct
    /// project status write.
    pub async fn has_pending_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM project_requests WHERE project_id = $1 AND status = 'pending'",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Approve a pending request and apply its project side effect in one
    /// transaction.
    ///
    /// For completion requests the project is completed; for extension
    /// requests `effective_end_date` (already validated against the
    /// current end date) becomes the project's new end date. Returns
    /// `None` when the request does not exist or is no longer pending --
    /// the `status = 'pending'` guard in the UPDATE makes concurrent
    /// resolutions lose cleanly.
    pub async fn approve(
        pool: &PgPool,
        request_id: DbId,
        reviewer_id: DbId,
        effective_end_date: Option<DayDate>,
    ) -> Result<Option<(ProjectRequest, Project)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE project_requests
             SET status = 'approved',
                 reviewed_by = $2,
                 reviewed_at = NOW(),
                 approved_end_date = $3
             WHERE id = $1 AND status = '{REQUEST_STATUS_PENDING}'
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(request_id)
            .bind(reviewer_id)
            .bind(effective_end_date)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let project = if request.request_type == REQUEST_COMPLETION {
            sqlx::query_as::<_, Project>(&format!(
                "UPDATE projects SET status = '{STATUS_COMPLETED}'
                 WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
            ))
            .bind(request.project_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, Project>(&format!(
                "UPDATE projects SET end_date = $2 WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
            ))
            .bind(request.project_id)
            .bind(request.approved_end_date.or(request.requested_end_date))
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(Some((request, project)))
    }

    /// Reject a pending request.
    ///
    /// Rejecting a completion request restores the project to in_progress
    /// if its status had drifted; extension rejection leaves the project
    /// untouched. Returns `None` when the request does not exist or is no
    /// longer pending.
    pub async fn reject(
        pool: &PgPool,
        request_id: DbId,
        reviewer_id: DbId,
    ) -> Result<Option<(ProjectRequest, Project)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE project_requests
             SET status = 'rejected',
                 reviewed_by = $2,
                 reviewed_at = NOW()
             WHERE id = $1 AND status = '{REQUEST_STATUS_PENDING}'
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(request_id)
            .bind(reviewer_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let project = if request.request_type == REQUEST_COMPLETION {
            sqlx::query_as::<_, Project>(&format!(
                "UPDATE projects SET status = '{STATUS_IN_PROGRESS}'
                 WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
            ))
            .bind(request.project_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, Project>(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
            ))
            .bind(request.project_id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(Some((request, project)))
    }

    /// Delete a pending request, permitted only for its original requester.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn cancel(
        pool: &PgPool,
        request_id: DbId,
        requested_by: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_requests
             WHERE id = $1 AND requested_by = $2 AND status = 'pending'",
        )
        .bind(request_id)
        .bind(requested_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
