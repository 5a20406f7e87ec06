use thiserror::Error;

use crate::auth::AuthError;
use crate::domain::DomainError;
use crate::repository::RepositoryError;

/// Failure of a façade request.
///
/// Domain and auth failures keep their user-facing message. Repository
/// errors, including those raised underneath a domain operation, surface as
/// [`ApiError::Repository`] so callers can match `NotFound` and store
/// failures directly.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),
    #[error("Invalid {0} endpoint")]
    InvalidEndpoint(String),
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Domain(DomainError),
    #[error(transparent)]
    Auth(AuthError),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Repository(e) => ApiError::Repository(e),
            other => ApiError::Domain(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Repository(e) => ApiError::Repository(e),
            other => ApiError::Auth(other),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Repository(err)
    }
}

impl ApiError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::UnknownEndpoint(_) => 404,
            ApiError::InvalidEndpoint(_) | ApiError::BadRequest(_) => 400,
            ApiError::UnsupportedMethod(_) => 405,
            ApiError::Domain(e) => match e {
                DomainError::Validation(_) => 400,
                DomainError::NotFound(_) => 404,
                DomainError::Duplicate(_)
                | DomainError::Capacity(_)
                | DomainError::InvalidTransition { .. } => 409,
                DomainError::Repository(_) => 500,
            },
            ApiError::Auth(e) => e.status_code(),
            ApiError::Repository(e) if e.is_not_found() => 404,
            ApiError::Repository(RepositoryError::BackupNotFound(_)) => 404,
            ApiError::Repository(RepositoryError::InvalidImport(_)) => 400,
            ApiError::Repository(_) | ApiError::Encode(_) | ApiError::Internal(_) => 500,
        }
    }

    /// Short machine-readable name for the error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::UnknownEndpoint(_) => "unknown_endpoint",
            ApiError::InvalidEndpoint(_) => "invalid_endpoint",
            ApiError::UnsupportedMethod(_) => "unsupported_method",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Domain(e) => e.kind(),
            ApiError::Auth(AuthError::InvalidCredentials) => "invalid_credentials",
            ApiError::Auth(AuthError::NotAuthenticated) => "not_authenticated",
            ApiError::Auth(_) => "auth",
            ApiError::Repository(e) if e.is_not_found() => "not_found",
            ApiError::Repository(_) => "repository",
            ApiError::Encode(_) => "encode",
            ApiError::Internal(_) => "internal",
        }
    }
}
