//! Generic entity operations shared by every kind.

use serde_json::Value;
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::status::EntityKind;
use super::Foundation;
use crate::record::{Fields, Record};
use crate::repository::RepositoryError;
use crate::store::Store;

impl<S: Store> Foundation<S> {
    /// Create a record of `kind` with no extra business rules.
    pub fn create_entity(
        &self,
        kind: EntityKind,
        fields: Fields,
    ) -> Result<Outcome<Record>, DomainError> {
        if let Some(status) = fields.get("status").and_then(Value::as_str) {
            kind.check_transition(None, status)?;
        }
        let record = self.repo().create(kind.collection(), fields)?;
        info!(kind = kind.name(), id = record.id(), "entity created");
        Ok(Outcome::new(format!("{} created successfully", capitalize(kind.name())), record))
    }

    /// Fetch one record; a missing id is a repository `NotFound`.
    pub fn get_entity(&self, kind: EntityKind, id: &str) -> Result<Record, DomainError> {
        Ok(self.repo().get(kind.collection(), id)?)
    }

    pub fn list_entities(&self, kind: EntityKind) -> Result<Vec<Record>, DomainError> {
        Ok(self.repo().read_all(kind.collection())?)
    }

    /// Shallow-merge `patch` into the record. A `status` in the patch must be
    /// a legal transition from the current one.
    pub fn update_entity(
        &self,
        kind: EntityKind,
        id: &str,
        patch: &Fields,
    ) -> Result<Record, DomainError> {
        let collection = kind.collection();
        self.repo().transact(collection, |records| {
            let record = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| RepositoryError::not_found(collection, id))?;

            if let Some(next) = patch.get("status") {
                let next = next
                    .as_str()
                    .ok_or_else(|| DomainError::validation("status must be a string"))?;
                kind.check_transition(record.str_field("status"), next)?;
            }

            record.merge(patch);
            Ok(record.clone())
        })
    }

    /// Move a record to `status`, enforcing the transition table.
    pub fn update_status(
        &self,
        kind: EntityKind,
        id: &str,
        status: &str,
    ) -> Result<Outcome<Record>, DomainError> {
        let mut patch = Fields::new();
        patch.insert("status".to_string(), Value::String(status.to_string()));
        let record = self.update_entity(kind, id, &patch)?;
        info!(kind = kind.name(), id, status, "status changed");
        Ok(Outcome::new("Status updated successfully", record))
    }

    pub fn delete_entity(&self, kind: EntityKind, id: &str) -> Result<bool, DomainError> {
        Ok(self.repo().delete(kind.collection(), id)?)
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
