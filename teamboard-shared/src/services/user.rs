/// User management operations
///
/// Constraints:
/// - name is 1-64 characters and globally unique
/// - display_name is 1-64 characters
/// - name cannot change after creation

use super::{duplicate_or_store, validate_request, IdResponse};
use crate::error::{ServiceError, ServiceResult};
use crate::models::team::Team;
use crate::models::user::{CreateUser, User};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use validator::Validate;

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "display_name must be 1-64 characters"))]
    pub display_name: String,
}

/// Update user request
///
/// ```json
/// { "id": 1, "user": { "name": "ada", "display_name": "Countess Lovelace" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id: i32,

    #[validate(nested)]
    pub user: UserChanges,
}

/// The `user` object of an update request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserChanges {
    /// Current name; accepted only if it matches the stored one
    #[serde(default)]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 64, message = "display_name must be 1-64 characters"))]
    pub display_name: String,
}

/// User operations
#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a user and returns its ID
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is empty or longer than 64 characters
    /// - `DuplicateEntity` if the name is taken
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<IdResponse> {
        validate_request("create_user", &request)?;

        let user = User::create(
            &self.pool,
            &CreateUser {
                name: request.name.clone(),
                display_name: request.display_name,
            },
        )
        .await
        .map_err(|e| duplicate_or_store(e, "user", || format!("name '{}'", request.name)))?;

        info!(user_id = user.id, name = %user.name, "Created user");
        Ok(IdResponse { id: user.id })
    }

    /// Lists all users ordered by ID
    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        let users = User::list(&self.pool).await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Fetches one user
    pub async fn describe_user(&self, id: i32) -> ServiceResult<User> {
        User::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    /// Changes a user's display name
    ///
    /// # Errors
    ///
    /// - `Validation` if display_name is empty or longer than 64 characters,
    ///   or if `user.name` is given and differs from the stored name
    /// - `NotFound` if the user does not exist
    pub async fn update_user(&self, request: UpdateUserRequest) -> ServiceResult<IdResponse> {
        validate_request("update_user", &request)?;

        if let Some(name) = &request.user.name {
            let current = self.describe_user(request.id).await?;
            if &current.name != name {
                warn!(user_id = request.id, "Rejected attempt to rename user");
                return Err(ServiceError::invalid("user.name", "name cannot be updated"));
            }
        }

        let user = User::update_display_name(&self.pool, request.id, &request.user.display_name)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", request.id))?;

        info!(user_id = user.id, "Updated user display name");
        Ok(IdResponse { id: user.id })
    }

    /// Lists the teams a user belongs to
    pub async fn get_user_teams(&self, id: i32) -> ServiceResult<Vec<Team>> {
        if !User::exists(&self.pool, id).await? {
            return Err(ServiceError::not_found("user", id));
        }

        let teams = Team::list_by_user(&self.pool, id).await?;
        debug!(user_id = id, count = teams.len(), "Listed user teams");
        Ok(teams)
    }
}
