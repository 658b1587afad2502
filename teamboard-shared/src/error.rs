/// Error types shared by every service
///
/// Each operation returns `ServiceResult<T>`. Validation is checked before any
/// statement is issued; store failures that do not map onto one of the
/// domain variants surface as `ServiceError::Store`.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// One violated input constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation (dotted path for nested objects)
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error type for all service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input violates a length, format or enum constraint
    #[error("Validation failed: {}", join_details(.0))]
    Validation(Vec<ValidationErrorDetail>),

    /// A uniqueness constraint would be violated
    #[error("{entity} already exists: {detail}")]
    DuplicateEntity { entity: &'static str, detail: String },

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The operation violates a lifecycle precondition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Team membership would exceed its cap
    #[error("Team {team_id} would have {requested} members (limit {limit})")]
    CapacityExceeded {
        team_id: i32,
        limit: usize,
        requested: usize,
    },

    /// The store is unreachable or a statement failed
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Writing an export artifact failed
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
}

impl ServiceError {
    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![ValidationErrorDetail::new(field, message)])
    }

    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity: &'static str, detail: impl Into<String>) -> Self {
        ServiceError::DuplicateEntity {
            entity,
            detail: detail.into(),
        }
    }
}

fn join_details(details: &[ValidationErrorDetail]) -> String {
    details
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        flatten_validation_errors(None, &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ServiceError::Validation(details)
    }
}

fn flatten_validation_errors(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut Vec<ValidationErrorDetail>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    ValidationErrorDetail::new(path.clone(), message)
                }));
            }
            ValidationErrorsKind::Struct(inner) => {
                flatten_validation_errors(Some(&path), inner, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{}[{}]", path, index);
                    flatten_validation_errors(Some(&item_path), inner, out);
                }
            }
        }
    }
}

/// True when `err` is a unique constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// True when `err` is a foreign key violation
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
