//! Read-only queries backing the project report aggregator.

use sitelog_core::report::UpdateCell;
use sitelog_core::types::{DayDate, DbId};
use sqlx::PgPool;

use crate::repositories::{TeamRepo, UpdateRepo};

/// Provides the flat inputs the report grid is assembled from.
pub struct ReportRepo;

impl ReportRepo {
    /// Every user the report covers: team members, the assigned
    /// contractor, and anyone who ever posted an update for the project.
    pub async fn member_ids(
        pool: &PgPool,
        project_id: DbId,
        contractor_id: Option<DbId>,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let mut ids = TeamRepo::member_ids_for_project(pool, project_id).await?;
        ids.extend(UpdateRepo::poster_ids_for_project(pool, project_id).await?);
        if let Some(contractor_id) = contractor_id {
            ids.push(contractor_id);
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Flat update cells for the inclusive day range, ready for
    /// `sitelog_core::report::build_grid`.
    pub async fn update_cells(
        pool: &PgPool,
        project_id: DbId,
        start: DayDate,
        end: DayDate,
    ) -> Result<Vec<UpdateCell>, sqlx::Error> {
        let rows: Vec<(DbId, DayDate, String, DbId)> = sqlx::query_as(
            "SELECT posted_by, update_date, update_type, id
             FROM site_updates
             WHERE project_id = $1 AND update_date BETWEEN $2 AND $3
             ORDER BY update_date ASC, id ASC",
        )
        .bind(project_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, day, update_type, update_id)| UpdateCell {
                user_id,
                day,
                update_type,
                update_id,
            })
            .collect())
    }
}
