use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    #[error("{0} is not a collection")]
    NotACollection(String),
    #[error("stored record in {0} is not an object")]
    MalformedRecord(String),
    #[error("import failed: {0}")]
    InvalidImport(String),
    #[error("backup not found: {0}")]
    BackupNotFound(String),
    #[error("repository lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        RepositoryError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}
