//! Team and team membership models.

use serde::{Deserialize, Serialize};
use sitelog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A team row from the `teams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub project_id: DbId,
    pub contractor_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A membership row from the `team_members` relation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub team_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new team.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub contractor_id: DbId,
    pub name: String,
}

/// A team with its resolved member list, for read-side composition.
#[derive(Debug, Clone, Serialize)]
pub struct TeamWithMembers {
    #[serde(flatten)]
    pub team: Team,
    pub member_ids: Vec<DbId>,
}
