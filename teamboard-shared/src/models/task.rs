/// Task model and database operations
///
/// A task is a unit of work on a board, assigned to one user.
///
/// # State Machine
///
/// ```text
/// OPEN ⇄ IN_PROGRESS ⇄ COMPLETE   (any transition between the three)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('OPEN', 'IN_PROGRESS', 'COMPLETE');
///
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(64) NOT NULL,
///     description VARCHAR(128) NOT NULL,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     board_id INTEGER NOT NULL REFERENCES project_boards(id) ON DELETE CASCADE,
///     creation_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     status task_status NOT NULL DEFAULT 'OPEN',
///     UNIQUE (board_id, title)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use std::str::FromStr;

/// Task progress state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Complete,
}

impl TaskStatus {
    /// All states, in lifecycle order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Complete];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Complete => "COMPLETE",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Complete)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the task states
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a task status (expected OPEN, IN_PROGRESS or COMPLETE)")]
pub struct ParseTaskStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseTaskStatusError(s.to_string()))
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Generated task ID
    pub id: i32,

    /// Title, unique within the board
    pub title: String,

    pub description: String,

    /// Assignee
    pub user_id: i32,

    /// Board this task belongs to
    pub board_id: i32,

    /// When the task was created
    pub creation_time: DateTime<Utc>,

    pub status: TaskStatus,
}

/// A task joined with its assignee's display name, for exports
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TaskWithAssignee {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub user_id: i32,
    pub assignee: String,
    pub creation_time: DateTime<Utc>,
    pub status: TaskStatus,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub user_id: i32,
    pub board_id: i32,

    /// Creation timestamp; the store's clock is used when None
    pub creation_time: Option<DateTime<Utc>>,
}

impl Task {
    /// Inserts a new task in OPEN state
    ///
    /// Does not check the board's status; callers hold the board lock and
    /// check it first.
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the board already has a task with this
    /// title, or a foreign key violation if the user or board is missing.
    pub async fn create<'e, E>(executor: E, data: &CreateTask) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, user_id, board_id, creation_time)
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
            RETURNING id, title, description, user_id, board_id, creation_time, status
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.user_id)
        .bind(data.board_id)
        .bind(data.creation_time)
        .fetch_one(executor)
        .await
    }

    /// Finds a task by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, user_id, board_id, creation_time, status
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Sets the status of a task
    ///
    /// Returns false if no task has this ID.
    pub async fn update_status<'e, E>(
        executor: E,
        id: i32,
        status: TaskStatus,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE tasks SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of tasks on a board that are not COMPLETE
    pub async fn count_incomplete<'e, E>(executor: E, board_id: i32) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE board_id = $1 AND status <> 'COMPLETE'",
        )
        .bind(board_id)
        .fetch_one(executor)
        .await
    }

    /// Lists a board's tasks with assignee names, oldest id first
    pub async fn list_with_assignees<'e, E>(
        executor: E,
        board_id: i32,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TaskWithAssignee>(
            r#"
            SELECT t.id, t.title, t.description, t.user_id,
                   u.display_name AS assignee, t.creation_time, t.status
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            WHERE t.board_id = $1
            ORDER BY t.id ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(executor)
        .await
    }
}
