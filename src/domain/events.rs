use serde_json::Value;
use tracing::{info, warn};

use super::error::DomainError;
use super::outcome::Outcome;
use super::validation;
use super::{status_matches, Foundation};
use crate::record::{self, Fields, Record};
use crate::repository::collections::EVENTS;
use crate::store::Store;

const DEFAULT_MAX_ATTENDEES: u64 = 100;

impl<S: Store> Foundation<S> {
    /// New events always start `upcoming` with no attendees.
    pub fn create_event(&self, fields: Fields) -> Result<Outcome<Record>, DomainError> {
        let mut fields = fields;
        let max_attendees = match fields.get("max_attendees") {
            Some(value) if validation::is_present(Some(value)) => record::as_number(value)
                .filter(|n| *n >= 0.0)
                .ok_or_else(|| DomainError::validation("max_attendees must be a number"))?,
            _ => DEFAULT_MAX_ATTENDEES as f64,
        };

        fields.insert("status".into(), Value::String("upcoming".into()));
        fields.insert("attendees".into(), Value::Array(Vec::new()));
        fields.insert("max_attendees".into(), record::number_value(max_attendees));
        fields.insert("registration_count".into(), Value::from(0));

        let event = self.repo().create(EVENTS, fields)?;
        info!(id = event.id(), "event created");
        Ok(Outcome::new("Event created successfully", event))
    }

    /// Add an attendee to an event unless it is full.
    ///
    /// The capacity check and the append happen under one collection lock,
    /// so concurrent registrations can never overbook.
    pub fn register_for_event(
        &self,
        event_id: &str,
        attendee: Fields,
    ) -> Result<Outcome<Value>, DomainError> {
        let entry = self.repo().transact(EVENTS, |records| {
            let event = records
                .iter_mut()
                .find(|r| r.id() == event_id)
                .ok_or_else(|| DomainError::NotFound("Event not found".into()))?;

            let mut attendees = match event.get("attendees") {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            let max = event
                .number_field("max_attendees")
                .unwrap_or(DEFAULT_MAX_ATTENDEES as f64);
            if attendees.len() as f64 >= max {
                warn!(event = event_id, "registration rejected: event full");
                return Err(DomainError::Capacity("Event is fully booked".into()));
            }

            let mut entry = Fields::new();
            entry.insert("id".into(), Value::String(record::generate_id()));
            for (key, value) in attendee {
                entry.insert(key, value);
            }
            entry.insert("registered_at".into(), Value::String(record::timestamp()));
            let entry = Value::Object(entry);

            attendees.push(entry.clone());
            let count = attendees.len();
            event.set("attendees", Value::Array(attendees));
            event.set("registration_count", count);
            event.touch();
            Ok(entry)
        })?;

        info!(event = event_id, "attendee registered");
        Ok(Outcome::new("Successfully registered for the event", entry))
    }

    pub fn events(&self, status: Option<&str>) -> Result<Vec<Record>, DomainError> {
        Ok(self.repo().filter(EVENTS, |r| status_matches(r, status))?)
    }
}
