/// Board endpoints
///
/// # Endpoints
///
/// - `POST /v1/boards` - Create board
/// - `GET /v1/teams/:id/boards` - List a team's OPEN boards
/// - `POST /v1/boards/:id/close` - Close board
/// - `POST /v1/boards/:id/export` - Write a text report of the board

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use teamboard_shared::{
    models::board::Board,
    services::{
        board::{CreateBoardRequest, ExportBoardResponse},
        IdResponse,
    },
};

/// Create board
///
/// ```text
/// POST /v1/boards
/// Content-Type: application/json
///
/// {
///   "name": "Sprint 4",
///   "description": "Importer rewrite",
///   "team_id": 3,
///   "creation_time": "2025-03-14T09:00:00Z"
/// }
/// ```
///
/// `creation_time` is optional.
///
/// # Errors
///
/// - `404 Not Found`: No such team
/// - `409 Conflict`: The team already has a board with this name
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_board(
    State(state): State<AppState>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<Json<IdResponse>> {
    Ok(Json(state.services.boards.create_board(req).await?))
}

/// List a team's OPEN boards ordered by ID
pub async fn list_boards(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
) -> ApiResult<Json<Vec<Board>>> {
    Ok(Json(state.services.boards.list_boards(team_id).await?))
}

/// Close board
///
/// # Errors
///
/// - `404 Not Found`: No such board
/// - `409 Conflict`: Already closed, or a task is not COMPLETE (`invalid_state`)
pub async fn close_board(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<IdResponse>> {
    Ok(Json(state.services.boards.close_board(id).await?))
}

/// Export board
///
/// Response: `{ "out_file": "out/board-7.txt" }`
///
/// # Errors
///
/// - `404 Not Found`: No such board
/// - `500 Internal Server Error`: The report could not be written
pub async fn export_board(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ExportBoardResponse>> {
    Ok(Json(state.services.boards.export_board(id).await?))
}
