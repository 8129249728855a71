//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;
use sitelog_core::types::{DayDate, DbId};

/// Filters for the update list endpoint. Pagination values are clamped in
/// the repository layer.
#[derive(Debug, Deserialize)]
pub struct UpdateListParams {
    pub project_id: Option<DbId>,
    pub date: Option<DayDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Filters for the attendance list endpoint.
#[derive(Debug, Deserialize)]
pub struct AttendanceListParams {
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub start_date: Option<DayDate>,
    pub end_date: Option<DayDate>,
}

/// Inclusive day range for the project report endpoint.
#[derive(Debug, Deserialize)]
pub struct ReportRangeParams {
    pub start_date: DayDate,
    pub end_date: DayDate,
}
