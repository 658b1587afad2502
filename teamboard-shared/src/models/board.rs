/// Project board model and database operations
///
/// A board is a unit of delivery for a team. It holds a set of tasks and
/// moves through a two-state lifecycle.
///
/// # State Machine
///
/// ```text
/// OPEN → CLOSED   (terminal; only when every task is COMPLETE)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE board_status AS ENUM ('OPEN', 'CLOSED');
///
/// CREATE TABLE project_boards (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(64) NOT NULL,
///     description VARCHAR(128) NOT NULL,
///     team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     creation_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     status board_status NOT NULL DEFAULT 'OPEN',
///     end_time TIMESTAMPTZ,
///     UNIQUE (team_id, name)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};
use std::fmt;

/// Board lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "board_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardStatus {
    /// Accepting tasks
    Open,

    /// Finished; no further changes
    Closed,
}

impl BoardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardStatus::Open => "OPEN",
            BoardStatus::Closed => "CLOSED",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, BoardStatus::Open)
    }
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project board model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Generated board ID
    pub id: i32,

    /// Board name, unique within its team
    pub name: String,

    pub description: String,

    /// Owning team
    pub team_id: i32,

    /// When the board was created
    pub creation_time: DateTime<Utc>,

    pub status: BoardStatus,

    /// When the board was closed (None while open)
    pub end_time: Option<DateTime<Utc>>,
}

/// Input for creating a new board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    pub name: String,
    pub description: String,
    pub team_id: i32,

    /// Creation timestamp; the store's clock is used when None
    pub creation_time: Option<DateTime<Utc>>,
}

impl Board {
    /// Inserts a new board in OPEN state
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the team already has a board with this
    /// name, or a foreign key violation if the team does not exist.
    pub async fn create<'e, E>(executor: E, data: &CreateBoard) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO project_boards (name, description, team_id, creation_time)
            VALUES ($1, $2, $3, COALESCE($4, NOW()))
            RETURNING id, name, description, team_id, creation_time, status, end_time
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.team_id)
        .bind(data.creation_time)
        .fetch_one(executor)
        .await
    }

    /// Finds a board by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, description, team_id, creation_time, status, end_time
            FROM project_boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists the OPEN boards of a team, oldest id first
    pub async fn list_open_by_team<'e, E>(
        executor: E,
        team_id: i32,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, description, team_id, creation_time, status, end_time
            FROM project_boards
            WHERE team_id = $1 AND status = 'OPEN'
            ORDER BY id ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(executor)
        .await
    }

    /// Reads the board status under an exclusive row lock
    ///
    /// Held by `close_board` so no task can be added or changed while the
    /// close precondition is checked. Returns None if the board is missing.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<BoardStatus>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM project_boards WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Reads the board status under a shared row lock
    ///
    /// Task writers hold this so they cannot interleave with a close.
    pub async fn lock_for_share(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<BoardStatus>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM project_boards WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Marks an OPEN board CLOSED and stamps `end_time`
    ///
    /// Returns None if the board is missing or not OPEN.
    pub async fn close<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Board>(
            r#"
            UPDATE project_boards
            SET status = 'CLOSED', end_time = NOW()
            WHERE id = $1 AND status = 'OPEN'
            RETURNING id, name, description, team_id, creation_time, status, end_time
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
