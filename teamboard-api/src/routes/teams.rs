/// Team endpoints
///
/// # Endpoints
///
/// - `POST /v1/teams` - Create team
/// - `GET /v1/teams` - List teams
/// - `GET /v1/teams/:id` - Describe team
/// - `PUT /v1/teams/:id` - Replace name, description and admin
/// - `POST /v1/teams/:id/users` - Add members
/// - `POST /v1/teams/:id/users/remove` - Remove members
/// - `GET /v1/teams/:id/users` - List members

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use teamboard_shared::{
    models::{team::Team, user::User},
    services::{
        team::{CreateTeamRequest, TeamUsersRequest, UpdateTeamRequest},
        IdResponse,
    },
};

/// Body of `PUT /v1/teams/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateTeamBody {
    pub team: CreateTeamRequest,
}

/// Body of the membership endpoints
#[derive(Debug, Deserialize)]
pub struct TeamUsersBody {
    pub users: Vec<i32>,
}

/// Create team
///
/// ```text
/// POST /v1/teams
/// Content-Type: application/json
///
/// { "name": "platform", "description": "Platform engineering", "admin": "1" }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Name already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_team(
    State(state): State<AppState>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<Json<IdResponse>> {
    Ok(Json(state.services.teams.create_team(req).await?))
}

/// List all teams ordered by ID
pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.services.teams.list_teams().await?))
}

/// Describe one team
pub async fn describe_team(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Team>> {
    Ok(Json(state.services.teams.describe_team(id).await?))
}

/// Update team
///
/// ```text
/// PUT /v1/teams/3
/// Content-Type: application/json
///
/// { "team": { "name": "platform", "description": "Infra and tooling", "admin": "2" } }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No such team
/// - `409 Conflict`: Name belongs to another team
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateTeamBody>,
) -> ApiResult<Json<IdResponse>> {
    let req = UpdateTeamRequest {
        id,
        team: body.team,
    };
    Ok(Json(state.services.teams.update_team(req).await?))
}

/// Add members
///
/// ```text
/// POST /v1/teams/3/users
/// Content-Type: application/json
///
/// { "users": [1, 2, 5] }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No such team, or an unknown user ID
/// - `422 Unprocessable Entity`: 0 or more than 50 IDs, or the team would
///   exceed 50 members (`capacity_exceeded`)
pub async fn add_users_to_team(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<TeamUsersBody>,
) -> ApiResult<Json<IdResponse>> {
    let req = TeamUsersRequest {
        id,
        users: body.users,
    };
    Ok(Json(state.services.teams.add_users_to_team(req).await?))
}

/// Remove members; IDs that are not members are ignored
pub async fn remove_users_from_team(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<TeamUsersBody>,
) -> ApiResult<Json<IdResponse>> {
    let req = TeamUsersRequest {
        id,
        users: body.users,
    };
    Ok(Json(state.services.teams.remove_users_from_team(req).await?))
}

/// List members ordered by user ID
pub async fn list_team_users(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.services.teams.list_team_users(id).await?))
}
