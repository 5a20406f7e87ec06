use serde_json::Value;
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::validation;
use super::{status_matches, Foundation};
use crate::record::{Fields, Record};
use crate::repository::collections::CONTACTS;
use crate::store::Store;

const REQUIRED: [&str; 4] = ["name", "email", "subject", "message"];

impl<S: Store> Foundation<S> {
    /// Record a contact-form message as a `new` ticket.
    pub fn submit_contact(&self, fields: Fields) -> Result<Outcome<Record>, DomainError> {
        validation::require(&fields, &REQUIRED)?;

        let mut fields = fields;
        fields.insert("status".into(), Value::String("new".into()));
        if !validation::is_present(fields.get("priority")) {
            fields.insert("priority".into(), Value::String("normal".into()));
        }

        let contact = self.repo().create(CONTACTS, fields)?;
        info!(id = contact.id(), "contact message received");
        Ok(Outcome::new("Message sent successfully", contact))
    }

    pub fn contacts(&self, status: Option<&str>) -> Result<Vec<Record>, DomainError> {
        Ok(self.repo().filter(CONTACTS, |r| status_matches(r, status))?)
    }
}
