use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::donations::{total_amount, DonationPeriod};
use super::error::DomainError;
use super::outcome::Outcome;
use super::Foundation;
use crate::record::{self, Record};
use crate::repository::collections::{CONTACTS, DONATIONS, NEWSLETTER_SUBSCRIBERS, PROJECTS, VOLUNTEERS};
use crate::repository::StatOp;
use crate::store::Store;

const RECENT_VOLUNTEERS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolunteerCounts {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub total: usize,
    pub total_amount: f64,
    pub this_month: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsletterCounts {
    pub subscribers: usize,
    pub unsubscribed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactCounts {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
}

/// Counts per collection and status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub volunteers: VolunteerCounts,
    pub donations: DonationSummary,
    pub projects: ProjectCounts,
    pub newsletter: NewsletterCounts,
    pub contacts: ContactCounts,
}

/// Everything the admin dashboard shows at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub statistics: Map<String, Value>,
    pub recent_donations: Vec<Record>,
    pub recent_volunteers: Vec<Record>,
    pub active_projects: Vec<Record>,
    pub pending_contacts: Vec<Record>,
    pub total_donations_this_month: f64,
}

fn count_status(records: &[Record], status: &str) -> usize {
    records
        .iter()
        .filter(|r| r.str_field("status") == Some(status))
        .count()
}

impl<S: Store> Foundation<S> {
    pub fn analytics(&self) -> Result<Analytics, DomainError> {
        let repo = self.repo();
        let volunteers = repo.read_all(VOLUNTEERS)?;
        let donations = repo.read_all(DONATIONS)?;
        let projects = repo.read_all(PROJECTS)?;
        let subscribers = repo.read_all(NEWSLETTER_SUBSCRIBERS)?;
        let contacts = repo.read_all(CONTACTS)?;

        let now = Utc::now();
        let this_month = donations
            .iter()
            .filter_map(|d| d.created_at().and_then(record::parse_timestamp))
            .filter(|at| at.year() == now.year() && at.month() == now.month())
            .count();

        Ok(Analytics {
            volunteers: VolunteerCounts {
                total: volunteers.len(),
                active: count_status(&volunteers, "active"),
                pending: count_status(&volunteers, "pending"),
            },
            donations: DonationSummary {
                total: donations.len(),
                total_amount: total_amount(&donations),
                this_month,
            },
            projects: ProjectCounts {
                total: projects.len(),
                active: count_status(&projects, "active"),
                completed: count_status(&projects, "completed"),
            },
            newsletter: NewsletterCounts {
                subscribers: count_status(&subscribers, "active"),
                unsubscribed: count_status(&subscribers, "unsubscribed"),
            },
            contacts: ContactCounts {
                total: contacts.len(),
                pending: count_status(&contacts, "new"),
                resolved: count_status(&contacts, "resolved"),
            },
        })
    }

    pub fn dashboard(&self) -> Result<Dashboard, DomainError> {
        let recent_donations = self.donations(Some(DonationPeriod::Month))?;
        let mut volunteers = self.volunteers(None)?;
        let skip = volunteers.len().saturating_sub(RECENT_VOLUNTEERS);
        let recent_volunteers = volunteers.split_off(skip);

        Ok(Dashboard {
            statistics: self.repo().statistics()?,
            total_donations_this_month: total_amount(&recent_donations),
            recent_donations,
            recent_volunteers,
            active_projects: self.projects(Some("active"))?,
            pending_contacts: self.contacts(Some("new"))?,
        })
    }

    pub fn statistics(&self) -> Result<Map<String, Value>, DomainError> {
        Ok(self.repo().statistics()?)
    }

    pub fn update_statistic(
        &self,
        metric: &str,
        value: f64,
        op: StatOp,
    ) -> Result<Outcome<Map<String, Value>>, DomainError> {
        let stats = self.repo().update_statistic(metric, value, op)?;
        Ok(Outcome::new("Statistics updated successfully", stats))
    }
}
