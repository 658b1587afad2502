/// User model and database operations
///
/// Users are identified by a generated integer id and a globally unique
/// `name`. Only `display_name` changes after creation. Users belong to any
/// number of teams through the `team_members` join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(64) NOT NULL UNIQUE,
///     display_name VARCHAR(64) NOT NULL,
///     creation_time TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, &CreateUser {
///     name: "ada".to_string(),
///     display_name: "Ada Lovelace".to_string(),
/// }).await?;
///
/// let found = User::find_by_id(&pool, user.id).await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Generated user ID
    pub id: i32,

    /// Unique login-style name, immutable after creation
    pub name: String,

    /// Human-friendly name shown in listings and exports
    pub display_name: String,

    /// When the user was created
    pub creation_time: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub display_name: String,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a unique violation if `name` is taken.
    pub async fn create<'e, E>(executor: E, data: &CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, display_name)
            VALUES ($1, $2)
            RETURNING id, name, display_name, creation_time
            "#,
        )
        .bind(&data.name)
        .bind(&data.display_name)
        .fetch_one(executor)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, display_name, creation_time
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists every user, oldest id first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, display_name, creation_time
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Sets a new display name
    ///
    /// Returns the updated user, or `None` if no user has this ID.
    pub async fn update_display_name<'e, E>(
        executor: E,
        id: i32,
        display_name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET display_name = $2
            WHERE id = $1
            RETURNING id, name, display_name, creation_time
            "#,
        )
        .bind(id)
        .bind(display_name)
        .fetch_optional(executor)
        .await
    }

    /// Lists the members of a team, oldest id first
    pub async fn list_by_team<'e, E>(executor: E, team_id: i32) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.display_name, u.creation_time
            FROM users u
            JOIN team_members m ON m.user_id = u.id
            WHERE m.team_id = $1
            ORDER BY u.id ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(executor)
        .await
    }

    /// Returns the IDs from `ids` that do not belong to any user
    pub async fn find_missing<'e, E>(executor: E, ids: &[i32]) -> Result<Vec<i32>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i32>(
            r#"
            SELECT requested.id
            FROM unnest($1::int4[]) AS requested(id)
            LEFT JOIN users u ON u.id = requested.id
            WHERE u.id IS NULL
            ORDER BY requested.id
            "#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await
    }

    /// Whether a user with this ID exists
    pub async fn exists<'e, E>(executor: E, id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }
}
