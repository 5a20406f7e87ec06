//! Wiring: build the store, repository, services and façade from a [`Config`].

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::api::Api;
use crate::auth::AuthService;
use crate::config::Config;
use crate::domain::{DomainError, Foundation};
use crate::repository::{CollectionRepository, RepositoryError};
use crate::store::{FileStore, InMemoryStore, Store, StoreError};

/// Store chosen at runtime by [`open`].
pub type DynStore = Arc<dyn Store>;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Open the backend described by `config`.
///
/// Uses a [`FileStore`] under `data_dir` when set, otherwise an
/// [`InMemoryStore`]. Collections and default documents are initialized, and
/// sample data is loaded when `seed_sample_data` is on.
pub fn open(config: &Config) -> Result<Api<DynStore>, OpenError> {
    let store: DynStore = match &config.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "opening file store");
            Arc::new(FileStore::open(dir)?) as DynStore
        }
        None => Arc::new(InMemoryStore::new()) as DynStore,
    };
    open_with(store, config)
}

/// Open the backend over an existing store.
pub fn open_with<S: Store + 'static>(store: S, config: &Config) -> Result<Api<S>, OpenError> {
    let repo = CollectionRepository::new(store, config.namespace.clone());
    repo.initialize()?;
    let repo = Arc::new(repo);

    let foundation =
        Foundation::new(repo.clone()).with_export_version(config.export_version.clone());
    if config.seed_sample_data {
        let outcome = foundation.seed_sample_data()?;
        info!(collections = ?outcome.data, "{}", outcome.message);
    }
    let auth = AuthService::new(repo).with_iterations(config.password_iterations);

    Ok(Api::new(foundation, auth)
        .with_default_per_page(config.default_per_page)
        .with_latency(config.latency()))
}
