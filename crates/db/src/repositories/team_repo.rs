//! Repository for the `teams` and `team_members` tables.

use sitelog_core::types::DbId;
use sqlx::PgPool;

use crate::models::team::{CreateTeam, Team, TeamMember, TeamWithMembers};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, contractor_id, name, created_at, updated_at";

const MEMBER_COLUMNS: &str = "id, team_id, user_id, created_at, updated_at";

/// Provides CRUD operations for teams and their membership relation.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team under a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTeam,
    ) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (project_id, contractor_id, name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(project_id)
            .bind(input.contractor_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a team by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List teams under a project with their member id lists resolved.
    ///
    /// Read-side composition: fetch teams, then batch-fetch membership rows
    /// and assemble in memory.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TeamWithMembers>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE project_id = $1 ORDER BY name ASC");
        let teams = sqlx::query_as::<_, Team>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await?;

        let team_ids: Vec<DbId> = teams.iter().map(|t| t.id).collect();
        let members: Vec<TeamMember> = sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members WHERE team_id = ANY($1) ORDER BY id ASC"
        ))
        .bind(&team_ids)
        .fetch_all(pool)
        .await?;

        Ok(teams
            .into_iter()
            .map(|team| {
                let member_ids = members
                    .iter()
                    .filter(|m| m.team_id == team.id)
                    .map(|m| m.user_id)
                    .collect();
                TeamWithMembers { team, member_ids }
            })
            .collect())
    }

    /// Add a user to a team. The unique constraint rejects duplicates.
    pub async fn add_member(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members (team_id, user_id)
             VALUES ($1, $2)
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(team_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Remove a user from a team. Returns `true` if a row was deleted.
    pub async fn remove_member(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All user ids appearing in any team of the project.
    pub async fn member_ids_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT tm.user_id
             FROM team_members tm
             JOIN teams t ON t.id = tm.team_id
             WHERE t.project_id = $1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Whether a user appears in any team of the project.
    pub async fn is_project_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM team_members tm
             JOIN teams t ON t.id = tm.team_id
             WHERE t.project_id = $1 AND tm.user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}
