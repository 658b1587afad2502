/// Project board and task operations
///
/// # Locking
///
/// `close_board` holds the board row `FOR UPDATE` while it checks that every
/// task is COMPLETE. `add_task` and `update_task_status` hold the same row
/// `FOR SHARE`, so a close and a task write on one board are serialized and
/// the close precondition cannot be invalidated before it commits.

use super::{duplicate_or_store, validate_request, IdResponse};
use crate::error::{is_foreign_key_violation, ServiceError, ServiceResult};
use crate::export::{render_board, write_export};
use crate::models::board::{Board, BoardStatus, CreateBoard};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::team::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use validator::Validate;

/// Create board request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,

    #[validate(length(max = 128, message = "description must be at most 128 characters"))]
    pub description: String,

    pub team_id: i32,

    /// Defaults to now
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
}

/// Add task request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddTaskRequest {
    #[validate(length(min = 1, max = 64, message = "title must be 1-64 characters"))]
    pub title: String,

    #[validate(length(max = 128, message = "description must be at most 128 characters"))]
    pub description: String,

    /// Assignee
    pub user_id: i32,

    pub board_id: i32,

    /// Defaults to now
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
}

/// Update task status request
///
/// `status` is one of `OPEN`, `IN_PROGRESS` or `COMPLETE`, matched exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub id: i32,
    pub status: String,
}

/// Location of a written export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBoardResponse {
    pub out_file: String,
}

/// Board and task operations
#[derive(Clone)]
pub struct BoardService {
    pool: PgPool,
    export_dir: PathBuf,
}

impl BoardService {
    pub fn new(pool: PgPool, export_dir: PathBuf) -> Self {
        Self { pool, export_dir }
    }

    /// Directory that receives exports
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Creates an OPEN board for a team
    ///
    /// # Errors
    ///
    /// - `Validation` on length violations
    /// - `DuplicateEntity` if the team already has a board with this name
    /// - `NotFound` if the team does not exist
    pub async fn create_board(&self, request: CreateBoardRequest) -> ServiceResult<IdResponse> {
        validate_request("create_board", &request)?;

        let data = CreateBoard {
            name: request.name,
            description: request.description,
            team_id: request.team_id,
            creation_time: request.creation_time,
        };

        let board = Board::create(&self.pool, &data).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                ServiceError::not_found("team", data.team_id)
            } else {
                duplicate_or_store(e, "board", || {
                    format!("name '{}' in team {}", data.name, data.team_id)
                })
            }
        })?;

        info!(board_id = board.id, team_id = board.team_id, name = %board.name, "Created board");
        Ok(IdResponse { id: board.id })
    }

    /// Closes a board whose tasks are all COMPLETE
    ///
    /// A board without tasks can be closed. Sets `end_time` to now.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the board does not exist
    /// - `InvalidState` if the board is already CLOSED or has unfinished tasks
    pub async fn close_board(&self, id: i32) -> ServiceResult<IdResponse> {
        let mut tx = self.pool.begin().await?;

        let status = Board::lock_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("board", id))?;

        if status == BoardStatus::Closed {
            warn!(board_id = id, "Rejected close of closed board");
            return Err(ServiceError::InvalidState(format!("board {} is already closed", id)));
        }

        let incomplete = Task::count_incomplete(&mut *tx, id).await?;
        if incomplete > 0 {
            warn!(board_id = id, incomplete, "Rejected close of board with unfinished tasks");
            return Err(ServiceError::InvalidState(format!(
                "board {} has {} task(s) that are not COMPLETE",
                id, incomplete
            )));
        }

        let board = Board::close(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::InvalidState(format!("board {} is not open", id)))?;
        tx.commit().await?;

        info!(board_id = board.id, end_time = ?board.end_time, "Closed board");
        Ok(IdResponse { id: board.id })
    }

    /// Adds an OPEN task to an OPEN board
    ///
    /// # Errors
    ///
    /// - `Validation` on length violations
    /// - `NotFound` if the board or the assignee does not exist
    /// - `InvalidState` if the board is CLOSED
    /// - `DuplicateEntity` if the board already has a task with this title
    pub async fn add_task(&self, request: AddTaskRequest) -> ServiceResult<IdResponse> {
        validate_request("add_task", &request)?;

        let mut tx = self.pool.begin().await?;

        let status = Board::lock_for_share(&mut *tx, request.board_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("board", request.board_id))?;

        if !status.is_open() {
            warn!(board_id = request.board_id, "Rejected task on closed board");
            return Err(ServiceError::InvalidState(format!(
                "board {} is closed",
                request.board_id
            )));
        }

        let data = CreateTask {
            title: request.title,
            description: request.description,
            user_id: request.user_id,
            board_id: request.board_id,
            creation_time: request.creation_time,
        };

        // The board row is locked, so a foreign key failure can only be the user
        let task = Task::create(&mut *tx, &data).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                ServiceError::not_found("user", data.user_id)
            } else {
                duplicate_or_store(e, "task", || {
                    format!("title '{}' on board {}", data.title, data.board_id)
                })
            }
        })?;
        tx.commit().await?;

        info!(task_id = task.id, board_id = task.board_id, user_id = task.user_id, "Added task");
        Ok(IdResponse { id: task.id })
    }

    /// Moves a task to another status
    ///
    /// # Errors
    ///
    /// - `Validation` if `status` is not OPEN, IN_PROGRESS or COMPLETE
    /// - `NotFound` if the task does not exist
    /// - `InvalidState` if the task's board is CLOSED
    pub async fn update_task_status(&self, request: UpdateTaskStatusRequest) -> ServiceResult<()> {
        let status = request.status.parse::<TaskStatus>().map_err(|e| {
            warn!(operation = "update_task_status", task_id = request.id, error = %e, "Rejected invalid request");
            ServiceError::invalid("status", e.to_string())
        })?;

        let mut tx = self.pool.begin().await?;

        let task = Task::find_by_id(&mut *tx, request.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("task", request.id))?;

        let board_status = Board::lock_for_share(&mut *tx, task.board_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("board", task.board_id))?;

        if !board_status.is_open() {
            warn!(task_id = task.id, board_id = task.board_id, "Rejected status change on closed board");
            return Err(ServiceError::InvalidState(format!(
                "board {} is closed",
                task.board_id
            )));
        }

        if !Task::update_status(&mut *tx, task.id, status).await? {
            return Err(ServiceError::not_found("task", task.id));
        }
        tx.commit().await?;

        info!(task_id = task.id, from = %task.status, to = %status, "Updated task status");
        Ok(())
    }

    /// Lists a team's OPEN boards ordered by ID
    ///
    /// An unknown team yields an empty list.
    pub async fn list_boards(&self, team_id: i32) -> ServiceResult<Vec<Board>> {
        let boards = Board::list_open_by_team(&self.pool, team_id).await?;
        debug!(team_id, count = boards.len(), "Listed open boards");
        Ok(boards)
    }

    /// Writes a text report of a board to `<export_dir>/board-<id>.txt`
    ///
    /// The board, team and tasks are read from one snapshot.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the board does not exist; no file is written
    /// - `Export` if the report cannot be written
    pub async fn export_board(&self, id: i32) -> ServiceResult<ExportBoardResponse> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let board = Board::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("board", id))?;
        let team = Team::find_by_id(&mut *tx, board.team_id).await?;
        let tasks = Task::list_with_assignees(&mut *tx, id).await?;
        tx.commit().await?;

        let report = render_board(&board, team.as_ref(), &tasks, Utc::now());
        let path = write_export(&self.export_dir, board.id, &report)
            .await
            .map_err(|e| {
                warn!(board_id = id, error = %e, "Board export failed");
                ServiceError::Export(e)
            })?;

        info!(board_id = id, tasks = tasks.len(), path = %path.display(), "Exported board");
        Ok(ExportBoardResponse {
            out_file: path.display().to_string(),
        })
    }
}
