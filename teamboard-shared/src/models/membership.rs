/// Team membership (user ↔ team join table)
///
/// # Schema
///
/// ```sql
/// CREATE TABLE team_members (
///     team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```
///
/// The composite primary key makes membership a set: adding an existing
/// member is a no-op. Callers that need the membership cap enforced must
/// hold the team row lock (`Team::lock_for_update`) across the count and
/// the insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Maximum number of members a team may have
pub const MAX_TEAM_MEMBERS: usize = 50;

/// A single membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    pub team_id: i32,
    pub user_id: i32,

    /// When the user joined the team
    pub added_at: DateTime<Utc>,
}

impl TeamMember {
    /// Size the team would have after adding `user_ids`
    ///
    /// Counts the union of current members and `user_ids`, so IDs that are
    /// already members are not counted twice.
    pub async fn count_union<'e, E>(
        executor: E,
        team_id: i32,
        user_ids: &[i32],
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM (
                SELECT user_id FROM team_members WHERE team_id = $1
                UNION
                SELECT unnest($2::int4[])
            ) AS members
            "#,
        )
        .bind(team_id)
        .bind(user_ids)
        .fetch_one(executor)
        .await
    }

    /// Adds every ID in `user_ids` to the team, skipping existing members
    ///
    /// Returns the number of rows actually inserted.
    pub async fn add_many<'e, E>(
        executor: E,
        team_id: i32,
        user_ids: &[i32],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id)
            SELECT $1, unnest($2::int4[])
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(user_ids)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Removes every ID in `user_ids` from the team
    ///
    /// IDs that are not members are ignored. Returns the number of rows
    /// removed.
    pub async fn remove_many<'e, E>(
        executor: E,
        team_id: i32,
        user_ids: &[i32],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = ANY($2)")
            .bind(team_id)
            .bind(user_ids)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Number of members in a team
    pub async fn count_by_team<'e, E>(executor: E, team_id: i32) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
            .bind(team_id)
            .fetch_one(executor)
            .await
    }
}

/// Sorts and deduplicates requested user IDs
pub fn normalize_user_ids(user_ids: &[i32]) -> Vec<i32> {
    let mut ids = user_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
