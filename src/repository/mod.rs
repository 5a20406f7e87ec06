//! Collection Repository - generic CRUD and queries over named collections.
//!
//! A collection is a JSON array of records persisted under
//! `<namespace><collection>` in a [`Store`](crate::store::Store). Every
//! operation fetches the whole collection, works on it in memory and, for
//! writes, stores it back whole. Writes to one collection are serialized
//! through a per-collection lock so concurrent callers never lose updates.
//!
//! ## Example
//!
//! ```ignore
//! use foundation_backend::repository::{CollectionRepository, PageRequest};
//! use foundation_backend::store::InMemoryStore;
//!
//! let repo = CollectionRepository::new(InMemoryStore::new(), "jivanjyoti_");
//! let created = repo.create("projects", fields)?;
//! let loaded = repo.read("projects", created.id())?;
//! let page = repo.paginate("projects", &PageRequest::new(1, 10))?;
//! ```

pub mod collections;
mod documents;
mod error;
mod lock;
mod query;
mod repository;

pub use documents::{BackupInfo, Export, StatOp};
pub use error::RepositoryError;
pub use query::{
    compare_values, matches_query, paginate, sort_records, Page, PageRequest, Pagination,
    SortDirection,
};
pub use repository::CollectionRepository;
