//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sitelog_core::types::{DayDate, DbId, Timestamp};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: DbId,
    pub contractor_id: Option<DbId>,
    pub status: String,
    pub start_date: Option<DayDate>,
    pub end_date: Option<DayDate>,
    /// Whole currency units, never negative.
    pub budget: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. Status always starts at `planning`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub admin_id: DbId,
    pub start_date: Option<DayDate>,
    pub end_date: Option<DayDate>,
    pub budget: Option<i64>,
}

/// DTO for updating project metadata. Status changes go through the
/// dedicated status endpoint, never through this DTO.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DayDate>,
    pub end_date: Option<DayDate>,
    pub budget: Option<i64>,
}
