use thiserror::Error;

use crate::repository::RepositoryError;

/// Business-rule and validation failures of domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or malformed field.
    #[error("{0}")]
    Validation(String),
    /// Unique-field conflict.
    #[error("{0}")]
    Duplicate(String),
    /// Id or key lookup miss.
    #[error("{0}")]
    NotFound(String),
    /// Event overbooking.
    #[error("{0}")]
    Capacity(String),
    /// Status change not allowed by the entity's transition table.
    #[error("cannot change {entity} status from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    /// Short machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::Duplicate(_) => "duplicate",
            DomainError::NotFound(_) => "not_found",
            DomainError::Capacity(_) => "capacity",
            DomainError::InvalidTransition { .. } => "invalid_transition",
            DomainError::Repository(_) => "repository",
        }
    }
}
