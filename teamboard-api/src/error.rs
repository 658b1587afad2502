/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; service errors convert with `?`.
///
/// # Example
///
/// ```no_run
/// use teamboard_api::error::ApiResult;
/// use teamboard_shared::services::UserService;
/// use teamboard_shared::models::user::User;
/// use axum::Json;
///
/// async fn handler(users: UserService) -> ApiResult<Json<Vec<User>>> {
///     Ok(Json(users.list_users().await?))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use teamboard_shared::error::{ServiceError, ValidationErrorDetail};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Not found (404)
    NotFound(String),

    /// Conflict (409), duplicate names
    Conflict(String),

    /// Conflict (409), lifecycle precondition violated
    InvalidState(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Unprocessable entity (422) - team membership cap
    CapacityExceeded(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "invalid_state")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::CapacityExceeded(msg) => write!(f, "Capacity exceeded: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::InvalidState(msg) => (StatusCode::CONFLICT, "invalid_state", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::CapacityExceeded(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "capacity_exceeded",
                msg,
                None,
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert service errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(details) => ApiError::ValidationError(details),
            err @ ServiceError::DuplicateEntity { .. } => ApiError::Conflict(err.to_string()),
            err @ ServiceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ServiceError::InvalidState(msg) => ApiError::InvalidState(msg),
            err @ ServiceError::CapacityExceeded { .. } => {
                ApiError::CapacityExceeded(err.to_string())
            }
            ServiceError::Store(e) => ApiError::InternalError(format!("Database error: {}", e)),
            ServiceError::Export(e) => ApiError::InternalError(format!("Export failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Conflict("team already exists: name 'platform'".to_string());
        assert_eq!(err.to_string(), "Conflict: team already exists: name 'platform'");

        let err = ApiError::NotFound("user not found: 4".to_string());
        assert_eq!(err.to_string(), "Not found: user not found: 4");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail::new("name", "name must be 1-64 characters"),
            ValidationErrorDetail::new("display_name", "display_name must be 1-64 characters"),
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    fn status_of(err: ServiceError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_service_error_status_mapping() {
        assert_eq!(
            status_of(ServiceError::invalid("name", "too long")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ServiceError::duplicate("team", "name 'platform'")),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ServiceError::not_found("board", 9)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ServiceError::InvalidState("board 9 is closed".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::CapacityExceeded {
                team_id: 1,
                limit: 50,
                requested: 51,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ServiceError::Store(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ServiceError::Export(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only"
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_keeps_message() {
        match ApiError::from(ServiceError::not_found("task", 12)) {
            ApiError::NotFound(msg) => assert_eq!(msg, "task not found: 12"),
            other => panic!("expected NotFound, got {:?}", other),
        }

        match ApiError::from(ServiceError::InvalidState("board 3 is closed".to_string())) {
            ApiError::InvalidState(msg) => assert_eq!(msg, "board 3 is closed"),
            other => panic!("expected InvalidState, got {:?}", other),
        }
    }
}
