//! Domain Operations - validated, business-rule-aware actions.
//!
//! [`Foundation`] wraps the collection repository with the nonprofit's
//! operations: volunteer registration, contact forms, newsletter
//! subscriptions, donations, projects, events, blog posts, statistics and
//! data management. Each operation validates its input, applies its rules and
//! only then writes, so a rejected operation never mutates a collection.
//!
//! Operations return `Result<Outcome<T>, DomainError>`. Form handlers that
//! want the uniform `{success, message, data}` shape fold the result into a
//! [`Report`].
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use foundation_backend::domain::{Foundation, Report};
//!
//! let foundation = Foundation::new(Arc::new(repo));
//! let report: Report = foundation.subscribe_newsletter("a@b.com", None).into();
//! assert!(report.success);
//! ```

mod blog;
mod contacts;
mod data;
mod donations;
mod error;
mod events;
mod insights;
mod newsletter;
mod outcome;
mod projects;
mod records;
mod seed;
mod status;
pub mod validation;
mod volunteers;

use std::sync::Arc;

use tracing::warn;

use crate::repository::{CollectionRepository, StatOp};
use crate::store::Store;

pub use donations::{total_amount, DonationPeriod};
pub use error::DomainError;
pub use insights::{
    Analytics, ContactCounts, Dashboard, DonationSummary, NewsletterCounts, ProjectCounts,
    VolunteerCounts,
};
pub use outcome::{Outcome, Report};
pub use projects::progress_percentage;
pub use status::EntityKind;

pub const DEFAULT_EXPORT_VERSION: &str = "1.0.0";

/// Statistics metrics maintained by domain operations.
pub mod metric {
    pub const VOLUNTEERS: &str = "volunteers";
    pub const DONATIONS_TOTAL: &str = "donations_total";
    pub const NEWSLETTER_SUBSCRIBERS: &str = "newsletter_subscribers";
}

/// The domain service. Cheap to clone; clones share the repository.
pub struct Foundation<S> {
    repo: Arc<CollectionRepository<S>>,
    export_version: String,
}

impl<S> Clone for Foundation<S> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            export_version: self.export_version.clone(),
        }
    }
}

impl<S> Foundation<S> {
    pub fn new(repo: Arc<CollectionRepository<S>>) -> Self {
        Self {
            repo,
            export_version: DEFAULT_EXPORT_VERSION.to_string(),
        }
    }

    /// Version string written into exports and backups.
    pub fn with_export_version(mut self, version: impl Into<String>) -> Self {
        self.export_version = version.into();
        self
    }

    /// Get a reference to the repository.
    pub fn repo(&self) -> &CollectionRepository<S> {
        &self.repo
    }

    pub fn shared_repo(&self) -> Arc<CollectionRepository<S>> {
        self.repo.clone()
    }
}

impl<S: Store> Foundation<S> {
    /// Bump a counter after its record has been committed.
    ///
    /// The record write has already succeeded, so a failure here is logged
    /// and the operation still reports success.
    pub(crate) fn count_metric(&self, metric: &str, amount: f64) {
        if let Err(e) = self.repo.update_statistic(metric, amount, StatOp::Increment) {
            warn!(metric, amount, error = %e, "statistics update failed");
        }
    }
}

/// True when `status` is `None` or equals the record's status.
pub(crate) fn status_matches(record: &crate::record::Record, status: Option<&str>) -> bool {
    match status {
        Some(status) => record.str_field("status") == Some(status),
        None => true,
    }
}
