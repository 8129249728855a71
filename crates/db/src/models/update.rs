//! Site update and attachment document models.

use serde::{Deserialize, Serialize};
use sitelog_core::types::{DayDate, DbId, Timestamp};
use sqlx::FromRow;

/// A half-day field update row from the `site_updates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteUpdate {
    pub id: DbId,
    pub project_id: DbId,
    pub contractor_id: Option<DbId>,
    pub posted_by: DbId,
    pub update_type: String,
    /// UTC calendar day the update belongs to; uniqueness is keyed on this,
    /// not on `posted_at`.
    pub update_date: DayDate,
    pub posted_at: Timestamp,
    pub status_note: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An attachment descriptor row from the `update_documents` table.
///
/// Only the descriptor is stored; bytes live with the attachment storage
/// collaborator that produced the URL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UpdateDocument {
    pub id: DbId,
    pub update_id: DbId,
    pub position: i32,
    pub file_name: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Attachment descriptor supplied at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub file_name: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: Option<i64>,
}

/// DTO for creating a site update together with its documents.
#[derive(Debug, Clone)]
pub struct CreateUpdate {
    pub project_id: DbId,
    pub contractor_id: Option<DbId>,
    pub posted_by: DbId,
    pub update_type: String,
    pub update_date: DayDate,
    pub status_note: String,
    pub documents: Vec<CreateDocument>,
}

/// An update with its resolved document list, for read-side composition.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateWithDocuments {
    #[serde(flatten)]
    pub update: SiteUpdate,
    pub documents: Vec<UpdateDocument>,
}
