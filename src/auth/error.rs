use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid password")]
    InvalidCredentials,
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Invalid or expired reset token")]
    InvalidResetToken,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Validation(_) | AuthError::InvalidResetToken => 400,
            AuthError::Duplicate(_) => 409,
            AuthError::NotFound(_) => 404,
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => 401,
            AuthError::Repository(e) if e.is_not_found() => 404,
            AuthError::Repository(_) => 500,
        }
    }
}
