/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Add a task to an OPEN board
/// - `PUT /v1/tasks/:id/status` - Move a task to another status

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use teamboard_shared::services::{
    board::{AddTaskRequest, UpdateTaskStatusRequest},
    IdResponse,
};

/// Body of `PUT /v1/tasks/:id/status`
#[derive(Debug, Deserialize)]
pub struct TaskStatusBody {
    /// OPEN, IN_PROGRESS or COMPLETE
    pub status: String,
}

/// Add task
///
/// ```text
/// POST /v1/tasks
/// Content-Type: application/json
///
/// { "title": "Write docs", "description": "", "user_id": 1, "board_id": 7 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No such board or user
/// - `409 Conflict`: Title reused on the board, or the board is closed
/// - `422 Unprocessable Entity`: Validation failed
pub async fn add_task(
    State(state): State<AppState>,
    Json(req): Json<AddTaskRequest>,
) -> ApiResult<Json<IdResponse>> {
    Ok(Json(state.services.boards.add_task(req).await?))
}

/// Update task status
///
/// ```text
/// PUT /v1/tasks/12/status
/// Content-Type: application/json
///
/// { "status": "IN_PROGRESS" }
/// ```
///
/// Responds `204 No Content`.
///
/// # Errors
///
/// - `404 Not Found`: No such task
/// - `409 Conflict`: The task's board is closed (`invalid_state`)
/// - `422 Unprocessable Entity`: Unknown status
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<TaskStatusBody>,
) -> ApiResult<StatusCode> {
    let req = UpdateTaskStatusRequest {
        id,
        status: body.status,
    };
    state.services.boards.update_task_status(req).await?;
    Ok(StatusCode::NO_CONTENT)
}
