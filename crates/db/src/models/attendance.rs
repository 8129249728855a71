//! Derived attendance model.

use serde::Serialize;
use sitelog_core::types::{DayDate, DbId, Timestamp};
use sqlx::FromRow;

/// An attendance row from the `attendance` table.
///
/// `is_present` is derived: true exactly when both half-day update ids are
/// set. Rows are only ever written through
/// `AttendanceRepo::record_half_day`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attendance {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub day: DayDate,
    pub morning_update_id: Option<DbId>,
    pub evening_update_id: Option<DbId>,
    pub is_present: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
