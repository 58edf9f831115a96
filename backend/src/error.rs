//! Errors raised by the household services.

use crate::db::RepositoryError;
use crate::models::Role;
use crate::scheduler::ValidationError;
use crate::services::roles::Permission;

/// Result type for household service operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// An activity or reference date was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Access denied: {role} may not {permission}")]
    AccessDenied { role: Role, permission: Permission },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Invalid entity '{0}', use FamilyMember, Activity, MealPlan, ShoppingList or Schedule")]
    InvalidEntity(String),

    #[error("Invalid timestamp '{0}', use YYYY-MM-DD HH:MM:SS or Latest")]
    InvalidTimestamp(String),
}

impl PlannerError {
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Repository(err) => err.is_not_found(),
            _ => false,
        }
    }
}
