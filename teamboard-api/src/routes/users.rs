/// User endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Create user
/// - `GET /v1/users` - List users
/// - `GET /v1/users/:id` - Describe user
/// - `PUT /v1/users/:id` - Change display name
/// - `GET /v1/users/:id/teams` - Teams the user belongs to

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use teamboard_shared::{
    models::{team::Team, user::User},
    services::{
        user::{CreateUserRequest, UpdateUserRequest, UserChanges},
        IdResponse,
    },
};

/// Body of `PUT /v1/users/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    pub user: UserChanges,
}

/// Create user
///
/// ```text
/// POST /v1/users
/// Content-Type: application/json
///
/// { "name": "ada", "display_name": "Ada Lovelace" }
/// ```
///
/// Response: `{ "id": 1 }`
///
/// # Errors
///
/// - `409 Conflict`: Name already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<IdResponse>> {
    Ok(Json(state.services.users.create_user(req).await?))
}

/// List all users ordered by ID
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.list_users().await?))
}

/// Describe one user
///
/// # Errors
///
/// - `404 Not Found`: No such user
pub async fn describe_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.services.users.describe_user(id).await?))
}

/// Update user
///
/// ```text
/// PUT /v1/users/1
/// Content-Type: application/json
///
/// { "user": { "name": "ada", "display_name": "Countess Lovelace" } }
/// ```
///
/// `user.name` is optional; if given it must equal the current name.
///
/// # Errors
///
/// - `404 Not Found`: No such user
/// - `422 Unprocessable Entity`: Validation failed or rename attempted
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateUserBody>,
) -> ApiResult<Json<IdResponse>> {
    let req = UpdateUserRequest {
        id,
        user: body.user,
    };
    Ok(Json(state.services.users.update_user(req).await?))
}

/// Teams a user belongs to, ordered by team ID
///
/// # Errors
///
/// - `404 Not Found`: No such user
pub async fn get_user_teams(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.services.users.get_user_teams(id).await?))
}
