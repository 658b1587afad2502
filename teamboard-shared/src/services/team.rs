/// Team management and membership operations
///
/// Membership changes run in one transaction that holds the team row under
/// `FOR UPDATE`, so two concurrent adds cannot both pass the member cap and
/// a remove cannot be lost under an add.

use super::{duplicate_or_store, validate_request, IdResponse};
use crate::error::{ServiceError, ServiceResult};
use crate::models::membership::{normalize_user_ids, TeamMember, MAX_TEAM_MEMBERS};
use crate::models::team::{Team, TeamFields};
use crate::models::user::User;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use validator::Validate;

/// Create team request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,

    #[validate(length(max = 128, message = "description must be at most 128 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 64, message = "admin must be 1-64 characters"))]
    pub admin: String,
}

impl CreateTeamRequest {
    fn fields(&self) -> TeamFields {
        TeamFields {
            name: self.name.clone(),
            description: self.description.clone(),
            admin: self.admin.clone(),
        }
    }
}

/// Update team request
///
/// The replacement values live in the nested `team` object:
///
/// ```json
/// { "id": 3, "team": { "name": "platform", "description": "", "admin": "1" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    pub id: i32,

    #[validate(nested)]
    pub team: CreateTeamRequest,
}

/// Adds or removes a set of users
///
/// Repeated IDs count once: the 50-ID limit applies to the distinct set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeamUsersRequest {
    /// Team ID
    pub id: i32,

    #[validate(length(min = 1, message = "users must list 1-50 user ids"))]
    pub users: Vec<i32>,
}

impl TeamUsersRequest {
    /// Validates the request and returns the sorted, distinct user IDs
    fn distinct_users(&self, operation: &'static str) -> ServiceResult<Vec<i32>> {
        validate_request(operation, self)?;

        let user_ids = normalize_user_ids(&self.users);
        if user_ids.len() > MAX_TEAM_MEMBERS {
            let err = ServiceError::invalid("users", "users must list 1-50 user ids");
            warn!(operation, error = %err, "Rejected invalid request");
            return Err(err);
        }
        Ok(user_ids)
    }
}

/// Team operations
#[derive(Clone)]
pub struct TeamService {
    pool: PgPool,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a team and returns its ID
    ///
    /// # Errors
    ///
    /// - `Validation` on length violations
    /// - `DuplicateEntity` if the name is taken
    pub async fn create_team(&self, request: CreateTeamRequest) -> ServiceResult<IdResponse> {
        validate_request("create_team", &request)?;

        let team = Team::create(&self.pool, &request.fields())
            .await
            .map_err(|e| duplicate_or_store(e, "team", || format!("name '{}'", request.name)))?;

        info!(team_id = team.id, name = %team.name, admin = %team.admin, "Created team");
        Ok(IdResponse { id: team.id })
    }

    /// Lists all teams ordered by ID
    pub async fn list_teams(&self) -> ServiceResult<Vec<Team>> {
        let teams = Team::list(&self.pool).await?;
        debug!(count = teams.len(), "Listed teams");
        Ok(teams)
    }

    /// Fetches one team
    pub async fn describe_team(&self, id: i32) -> ServiceResult<Team> {
        Team::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("team", id))
    }

    /// Replaces a team's name, description and admin
    ///
    /// # Errors
    ///
    /// - `Validation` on length violations in `team`
    /// - `DuplicateEntity` if the new name belongs to another team
    /// - `NotFound` if the team does not exist
    pub async fn update_team(&self, request: UpdateTeamRequest) -> ServiceResult<IdResponse> {
        validate_request("update_team", &request)?;

        let team = Team::update(&self.pool, request.id, &request.team.fields())
            .await
            .map_err(|e| {
                duplicate_or_store(e, "team", || format!("name '{}'", request.team.name))
            })?
            .ok_or_else(|| ServiceError::not_found("team", request.id))?;

        info!(team_id = team.id, name = %team.name, "Updated team");
        Ok(IdResponse { id: team.id })
    }

    /// Adds users to a team
    ///
    /// The result is the union of the current members and `users`; IDs that
    /// are already members or repeated in the request are added once.
    ///
    /// # Errors
    ///
    /// - `Validation` if `users` is empty or lists more than 50 distinct IDs
    /// - `NotFound` if the team or any listed user does not exist
    /// - `CapacityExceeded` if the team would end up with more than 50 members
    pub async fn add_users_to_team(&self, request: TeamUsersRequest) -> ServiceResult<IdResponse> {
        let user_ids = request.distinct_users("add_users_to_team")?;
        let team_id = request.id;

        let mut tx = self.pool.begin().await?;

        if !Team::lock_for_update(&mut *tx, team_id).await? {
            return Err(ServiceError::not_found("team", team_id));
        }

        let missing = User::find_missing(&mut *tx, &user_ids).await?;
        if !missing.is_empty() {
            let ids = missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ServiceError::not_found("user", ids));
        }

        let resulting = TeamMember::count_union(&mut *tx, team_id, &user_ids).await?;
        let resulting = usize::try_from(resulting).unwrap_or(usize::MAX);
        if resulting > MAX_TEAM_MEMBERS {
            warn!(team_id, resulting, limit = MAX_TEAM_MEMBERS, "Rejected membership change over cap");
            return Err(ServiceError::CapacityExceeded {
                team_id,
                limit: MAX_TEAM_MEMBERS,
                requested: resulting,
            });
        }

        let added = TeamMember::add_many(&mut *tx, team_id, &user_ids).await?;
        tx.commit().await?;

        info!(team_id, added, members = resulting, "Added users to team");
        Ok(IdResponse { id: team_id })
    }

    /// Removes users from a team
    ///
    /// IDs that are not members are ignored.
    ///
    /// # Errors
    ///
    /// - `Validation` if `users` is empty or lists more than 50 distinct IDs
    /// - `NotFound` if the team does not exist
    pub async fn remove_users_from_team(
        &self,
        request: TeamUsersRequest,
    ) -> ServiceResult<IdResponse> {
        let user_ids = request.distinct_users("remove_users_from_team")?;
        let team_id = request.id;

        let mut tx = self.pool.begin().await?;

        if !Team::lock_for_update(&mut *tx, team_id).await? {
            return Err(ServiceError::not_found("team", team_id));
        }

        let removed = TeamMember::remove_many(&mut *tx, team_id, &user_ids).await?;
        tx.commit().await?;

        info!(team_id, removed, "Removed users from team");
        Ok(IdResponse { id: team_id })
    }

    /// Lists a team's members ordered by user ID
    pub async fn list_team_users(&self, id: i32) -> ServiceResult<Vec<User>> {
        if !Team::exists(&self.pool, id).await? {
            return Err(ServiceError::not_found("team", id));
        }

        let users = User::list_by_team(&self.pool, id).await?;
        debug!(team_id = id, count = users.len(), "Listed team users");
        Ok(users)
    }
}
