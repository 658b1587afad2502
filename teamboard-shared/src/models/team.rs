/// Team model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(64) NOT NULL UNIQUE,
///     description VARCHAR(128) NOT NULL,
///     creation_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     admin VARCHAR(64) NOT NULL
/// );
/// ```
///
/// `admin` holds a user identifier as free text and is not a foreign key.
/// Membership is stored separately; see `membership`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

/// Team model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Generated team ID
    pub id: i32,

    /// Globally unique team name
    pub name: String,

    pub description: String,

    /// When the team was created
    pub creation_time: DateTime<Utc>,

    /// Identifier of the administering user
    pub admin: String,
}

/// Writable team fields, used for both create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamFields {
    pub name: String,
    pub description: String,
    pub admin: String,
}

impl Team {
    /// Inserts a new team
    ///
    /// # Errors
    ///
    /// Returns a unique violation if `name` is taken.
    pub async fn create<'e, E>(executor: E, data: &TeamFields) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, admin)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, creation_time, admin
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.admin)
        .fetch_one(executor)
        .await
    }

    /// Finds a team by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, creation_time, admin
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists every team, oldest id first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, creation_time, admin
            FROM teams
            ORDER BY id ASC
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Overwrites name, description and admin
    ///
    /// Returns the updated team, or `None` if no team has this ID.
    pub async fn update<'e, E>(
        executor: E,
        id: i32,
        data: &TeamFields,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET name = $2, description = $3, admin = $4
            WHERE id = $1
            RETURNING id, name, description, creation_time, admin
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.admin)
        .fetch_optional(executor)
        .await
    }

    /// Lists the teams a user belongs to, oldest id first
    pub async fn list_by_user<'e, E>(executor: E, user_id: i32) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.name, t.description, t.creation_time, t.admin
            FROM teams t
            JOIN team_members m ON m.team_id = t.id
            WHERE m.user_id = $1
            ORDER BY t.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Takes a row lock on the team for the rest of the transaction
    ///
    /// Membership changes hold this lock so that concurrent add/remove calls
    /// on the same team run one after another. Returns false if the team
    /// does not exist.
    pub async fn lock_for_update(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
        let locked: Option<i32> =
            sqlx::query_scalar("SELECT id FROM teams WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(locked.is_some())
    }

    /// Whether a team with this ID exists
    pub async fn exists<'e, E>(executor: E, id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }
}
