//! Repository for the `site_updates` and `update_documents` tables.

use sitelog_core::types::{DayDate, DbId};
use sitelog_core::visibility::AccessScope;
use sqlx::PgPool;

use crate::models::update::{CreateUpdate, SiteUpdate, UpdateDocument, UpdateWithDocuments};
use crate::repositories::attendance_repo::AttendanceRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, contractor_id, posted_by, update_type, update_date, \
                        posted_at, status_note, created_at, updated_at";

const DOC_COLUMNS: &str =
    "id, update_id, position, file_name, url, content_type, size_bytes, created_at, updated_at";

/// Hard cap applied to list queries regardless of the requested limit.
const MAX_LIMIT: i64 = 200;
const DEFAULT_LIMIT: i64 = 50;

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Provides operations for site updates and their attached documents.
pub struct UpdateRepo;

impl UpdateRepo {
    /// Insert an update with its documents and derive the poster's
    /// attendance row, all in one transaction.
    ///
    /// The unique index on (posted_by, project_id, update_date, update_type)
    /// makes a duplicate posting fail here with a constraint violation;
    /// nothing is written in that case.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUpdate,
    ) -> Result<UpdateWithDocuments, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO site_updates
                (project_id, contractor_id, posted_by, update_type, update_date, status_note)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let update = sqlx::query_as::<_, SiteUpdate>(&query)
            .bind(input.project_id)
            .bind(input.contractor_id)
            .bind(input.posted_by)
            .bind(&input.update_type)
            .bind(input.update_date)
            .bind(&input.status_note)
            .fetch_one(&mut *tx)
            .await?;

        let doc_query = format!(
            "INSERT INTO update_documents
                (update_id, position, file_name, url, content_type, size_bytes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {DOC_COLUMNS}"
        );
        let mut documents = Vec::with_capacity(input.documents.len());
        for (position, doc) in input.documents.iter().enumerate() {
            let row = sqlx::query_as::<_, UpdateDocument>(&doc_query)
                .bind(update.id)
                .bind(position as i32)
                .bind(&doc.file_name)
                .bind(&doc.url)
                .bind(&doc.content_type)
                .bind(doc.size_bytes)
                .fetch_one(&mut *tx)
                .await?;
            documents.push(row);
        }

        AttendanceRepo::record_half_day(
            &mut *tx,
            update.posted_by,
            update.project_id,
            update.update_date,
            &update.update_type,
            update.id,
        )
        .await?;

        tx.commit().await?;
        Ok(UpdateWithDocuments { update, documents })
    }

    /// Find an update by internal ID with its documents resolved.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UpdateWithDocuments>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_updates WHERE id = $1");
        let Some(update) = sqlx::query_as::<_, SiteUpdate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let documents = Self::documents_for(pool, update.id).await?;
        Ok(Some(UpdateWithDocuments { update, documents }))
    }

    /// Documents of one update, in attachment order.
    pub async fn documents_for(
        pool: &PgPool,
        update_id: DbId,
    ) -> Result<Vec<UpdateDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {DOC_COLUMNS} FROM update_documents
             WHERE update_id = $1 ORDER BY position ASC"
        );
        sqlx::query_as::<_, UpdateDocument>(&query)
            .bind(update_id)
            .fetch_all(pool)
            .await
    }

    /// List updates visible in the given scope, newest day first, with
    /// optional project and day filters and pagination.
    pub async fn list(
        pool: &PgPool,
        scope: &AccessScope,
        project_id: Option<DbId>,
        day: Option<DayDate>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<SiteUpdate>, sqlx::Error> {
        // The scope filter always binds; Unrestricted binds NULL and the
        // predicate collapses to true.
        let query = format!(
            "SELECT {COLUMNS} FROM site_updates
             WHERE ($1::bigint[] IS NULL OR project_id = ANY($1))
               AND ($2::bigint IS NULL OR project_id = $2)
               AND ($3::date IS NULL OR update_date = $3)
             ORDER BY update_date DESC, posted_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, SiteUpdate>(&query)
            .bind(scope.filter_ids())
            .bind(project_id)
            .bind(day)
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Distinct user ids that ever posted an update for the project.
    pub async fn poster_ids_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT posted_by FROM site_updates WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
