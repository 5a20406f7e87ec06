use serde_json::{json, Value};
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::validation;
use super::{metric, Foundation};
use crate::record::{self, Fields, Record};
use crate::repository::collections::NEWSLETTER_SUBSCRIBERS;
use crate::store::Store;

const ACTIVE: &str = "active";
const UNSUBSCRIBED: &str = "unsubscribed";

fn default_preferences() -> Fields {
    match json!({
        "frequency": "weekly",
        "topics": ["environmental_tips", "foundation_updates"],
    }) {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

fn merged(base: Option<&Value>, preferences: Option<&Fields>) -> Value {
    let mut merged = match base {
        Some(Value::Object(map)) => map.clone(),
        _ => Fields::new(),
    };
    if let Some(preferences) = preferences {
        for (key, value) in preferences {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

enum Subscription {
    Created(Record),
    Reactivated(Record),
    AlreadyActive(Record),
}

impl<S: Store> Foundation<S> {
    /// Subscribe `email` to the newsletter.
    ///
    /// An already active subscriber is left untouched. An unsubscribed one
    /// is reactivated in place with its preferences merged, so the record id
    /// is reused and no duplicate is created.
    pub fn subscribe_newsletter(
        &self,
        email: &str,
        preferences: Option<&Fields>,
    ) -> Result<Outcome<Record>, DomainError> {
        if !validation::is_valid_email(email) {
            return Err(DomainError::validation(
                "Please enter a valid email address",
            ));
        }

        let subscription = self.repo().transact(NEWSLETTER_SUBSCRIBERS, |records| {
            if let Some(existing) = records
                .iter_mut()
                .find(|r| r.str_field("email") == Some(email))
            {
                if existing.str_field("status") == Some(ACTIVE) {
                    return Ok::<_, DomainError>(Subscription::AlreadyActive(existing.clone()));
                }
                let mut patch = Fields::new();
                patch.insert("status".into(), Value::String(ACTIVE.into()));
                patch.insert(
                    "preferences".into(),
                    merged(existing.get("preferences"), preferences),
                );
                patch.insert("resubscribed_at".into(), Value::String(record::timestamp()));
                existing.merge(&patch);
                return Ok(Subscription::Reactivated(existing.clone()));
            }

            let defaults = Value::Object(default_preferences());
            let mut fields = Fields::new();
            fields.insert("email".into(), Value::String(email.to_string()));
            fields.insert("status".into(), Value::String(ACTIVE.into()));
            fields.insert("preferences".into(), merged(Some(&defaults), preferences));
            fields.insert("source".into(), Value::String("website".into()));
            let subscriber = Record::stamped(fields);
            records.push(subscriber.clone());
            Ok(Subscription::Created(subscriber))
        })?;

        match subscription {
            Subscription::AlreadyActive(record) => Ok(Outcome::new(
                "You are already subscribed to our newsletter",
                record,
            )),
            Subscription::Reactivated(record) => {
                info!(id = record.id(), "newsletter subscription reactivated");
                Ok(Outcome::new("Your subscription has been reactivated", record))
            }
            Subscription::Created(record) => {
                self.count_metric(metric::NEWSLETTER_SUBSCRIBERS, 1.0);
                info!(id = record.id(), "newsletter subscriber added");
                Ok(Outcome::new("Successfully subscribed to our newsletter", record))
            }
        }
    }

    /// Mark `email` as unsubscribed. Repeating the call is harmless.
    pub fn unsubscribe_newsletter(&self, email: &str) -> Result<Outcome<Record>, DomainError> {
        let record = self.repo().transact(NEWSLETTER_SUBSCRIBERS, |records| {
            let subscriber = records
                .iter_mut()
                .find(|r| r.str_field("email") == Some(email))
                .ok_or_else(|| {
                    DomainError::NotFound("Email not found in our subscriber list".into())
                })?;
            let mut patch = Fields::new();
            patch.insert("status".into(), Value::String(UNSUBSCRIBED.into()));
            patch.insert("unsubscribed_at".into(), Value::String(record::timestamp()));
            subscriber.merge(&patch);
            Ok::<_, DomainError>(subscriber.clone())
        })?;

        info!(id = record.id(), "newsletter subscriber left");
        Ok(Outcome::new("Successfully unsubscribed", record))
    }

    pub fn active_subscribers(&self) -> Result<Vec<Record>, DomainError> {
        Ok(self
            .repo()
            .filter(NEWSLETTER_SUBSCRIBERS, |r| r.str_field("status") == Some(ACTIVE))?)
    }
}
