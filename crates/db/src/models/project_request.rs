//! Completion/extension request model and DTOs.

use serde::{Deserialize, Serialize};
use sitelog_core::types::{DayDate, DbId, Timestamp};
use sqlx::FromRow;

/// A request row from the `project_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRequest {
    pub id: DbId,
    pub project_id: DbId,
    pub requested_by: DbId,
    pub request_type: String,
    pub status: String,
    pub requested_end_date: Option<DayDate>,
    pub approved_end_date: Option<DayDate>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new request. `requested_end_date` is set for
/// extension requests only.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub project_id: DbId,
    pub requested_by: DbId,
    pub request_type: String,
    pub requested_end_date: Option<DayDate>,
}

/// Request body for the approve endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequestBody {
    /// Overrides the requested end date for extension requests; must still
    /// be after the project's current end date.
    pub approved_end_date: Option<DayDate>,
}
