//! Record-keeping backend for a nonprofit website.
//!
//! Layers, bottom to top:
//!
//! - [`store`]: key-value persistence of JSON values (in memory or on disk).
//! - [`repository`]: named collections of [`Record`]s with CRUD, search,
//!   sorting, pagination, statistics, export and backups.
//! - [`domain`]: validated operations such as volunteer registration,
//!   donations, newsletter subscriptions and event registration.
//! - [`auth`]: accounts, sessions and password resets.
//! - [`api`]: a path-routed request façade, optionally served over HTTP.
//!
//! [`app::open`] wires everything from a [`Config`].

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod domain;
pub mod record;
pub mod repository;
pub mod store;

pub use api::{Api, ApiError, Response};
pub use auth::{AuthError, AuthService};
pub use config::{Config, ConfigError};
pub use domain::{DomainError, EntityKind, Foundation, Outcome, Report};
pub use record::{Fields, Record};
pub use repository::{CollectionRepository, RepositoryError};
pub use store::{FileStore, InMemoryStore, Store, StoreError};
