//! Repository for the derived `attendance` table.

use sitelog_core::attendance::UPDATE_MORNING;
use sitelog_core::types::{DayDate, DbId};
use sitelog_core::visibility::AccessScope;
use sqlx::PgPool;

use crate::models::attendance::Attendance;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, project_id, day, morning_update_id, evening_update_id, \
                        is_present, created_at, updated_at";

/// Provides the attendance derivation upsert and read queries.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Upsert the attendance row for (user, project, day) with one half-day
    /// update id, recomputing `is_present` in the same statement.
    ///
    /// A half that is already set is kept (`COALESCE(old, new)`), so
    /// re-deriving the same update is a no-op and concurrent writers
    /// serialize on the `uq_attendance_day` index. Takes any executor so it
    /// can run inside the update-creation transaction.
    ///
    /// `update_type` must already be validated against the morning/evening
    /// vocabulary; rows read back from `site_updates` always are.
    pub async fn record_half_day<'e, E>(
        executor: E,
        user_id: DbId,
        project_id: DbId,
        day: DayDate,
        update_type: &str,
        update_id: DbId,
    ) -> Result<Attendance, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let (morning_id, evening_id): (Option<DbId>, Option<DbId>) =
            if update_type == UPDATE_MORNING {
                (Some(update_id), None)
            } else {
                (None, Some(update_id))
            };

        let query = format!(
            "INSERT INTO attendance
                (user_id, project_id, day, morning_update_id, evening_update_id, is_present)
             VALUES ($1, $2, $3, $4, $5, $4 IS NOT NULL AND $5 IS NOT NULL)
             ON CONFLICT (user_id, project_id, day) DO UPDATE SET
                morning_update_id =
                    COALESCE(attendance.morning_update_id, EXCLUDED.morning_update_id),
                evening_update_id =
                    COALESCE(attendance.evening_update_id, EXCLUDED.evening_update_id),
                is_present =
                    COALESCE(attendance.morning_update_id, EXCLUDED.morning_update_id) IS NOT NULL
                    AND COALESCE(attendance.evening_update_id, EXCLUDED.evening_update_id) IS NOT NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(user_id)
            .bind(project_id)
            .bind(day)
            .bind(morning_id)
            .bind(evening_id)
            .fetch_one(executor)
            .await
    }

    /// Find the attendance row for one (user, project, day) triple.
    pub async fn find_for_day(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
        day: DayDate,
    ) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance
             WHERE user_id = $1 AND project_id = $2 AND day = $3"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(user_id)
            .bind(project_id)
            .bind(day)
            .fetch_optional(pool)
            .await
    }

    /// List attendance rows visible in the given scope, with optional user,
    /// project, and inclusive day-range filters.
    pub async fn list(
        pool: &PgPool,
        scope: &AccessScope,
        user_id: Option<DbId>,
        project_id: Option<DbId>,
        from: Option<DayDate>,
        to: Option<DayDate>,
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance
             WHERE ($1::bigint[] IS NULL OR project_id = ANY($1))
               AND ($2::bigint IS NULL OR user_id = $2)
               AND ($3::bigint IS NULL OR project_id = $3)
               AND ($4::date IS NULL OR day >= $4)
               AND ($5::date IS NULL OR day <= $5)
             ORDER BY day DESC, user_id ASC"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(scope.filter_ids())
            .bind(user_id)
            .bind(project_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }
}
