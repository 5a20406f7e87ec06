use serde_json::Value;
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::status::EntityKind;
use super::validation;
use super::{metric, status_matches, Foundation};
use crate::record::{self, Fields, Record};
use crate::repository::collections::VOLUNTEERS;
use crate::store::Store;

const REQUIRED: [&str; 5] = ["firstName", "lastName", "email", "phone", "age"];

impl<S: Store> Foundation<S> {
    /// Register a volunteer application.
    ///
    /// Rejects a duplicate email (exact, case-sensitive match) before
    /// anything is written. New volunteers start as `pending`.
    pub fn register_volunteer(&self, fields: Fields) -> Result<Outcome<Record>, DomainError> {
        validation::require(&fields, &REQUIRED)?;
        let email = validation::text(&fields, "email")
            .ok_or_else(|| DomainError::validation("email must be text"))?
            .to_string();

        let mut fields = fields;
        fields.insert("status".into(), Value::String("pending".into()));
        if !fields.get("skills").map(Value::is_array).unwrap_or(false) {
            fields.insert("skills".into(), Value::Array(Vec::new()));
        }
        let interests = match fields.remove("interests") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(single) => vec![single],
        };
        fields.insert("interests".into(), Value::Array(interests));
        fields.insert(
            "application_date".into(),
            Value::String(record::timestamp()),
        );

        let volunteer = self.repo().transact(VOLUNTEERS, |records| {
            if records.iter().any(|r| r.str_field("email") == Some(email.as_str())) {
                return Err(DomainError::Duplicate(
                    "A volunteer with this email already exists".into(),
                ));
            }
            let volunteer = Record::stamped(fields);
            records.push(volunteer.clone());
            Ok(volunteer)
        })?;

        self.count_metric(metric::VOLUNTEERS, 1.0);
        info!(id = volunteer.id(), "volunteer registered");

        Ok(Outcome::new("Volunteer registration successful", volunteer))
    }

    /// Volunteers, optionally only those with `status`.
    pub fn volunteers(&self, status: Option<&str>) -> Result<Vec<Record>, DomainError> {
        Ok(self.repo().filter(VOLUNTEERS, |r| status_matches(r, status))?)
    }

    pub fn update_volunteer_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<Outcome<Record>, DomainError> {
        self.update_status(EntityKind::Volunteer, id, status)
    }
}
