//! Record - a single entity instance in a collection.
//!
//! Records are untyped string-keyed JSON objects. Every stored record carries
//! `id`, `created_at` and `updated_at`; everything else is domain data.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const ID: &str = "id";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// Loose field set as received from a form or request body.
pub type Fields = Map<String, Value>;

/// A string-keyed JSON mapping stored in a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from arbitrary JSON. Non-object values yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Build a stored record: fresh id and both timestamps, overriding
    /// whatever the caller put in those fields.
    pub fn stamped(fields: Map<String, Value>) -> Self {
        let now = timestamp();
        let mut map = Map::with_capacity(fields.len() + 3);
        map.insert(ID.to_string(), Value::String(generate_id()));
        for (key, value) in fields {
            if key != ID && key != CREATED_AT && key != UPDATED_AT {
                map.insert(key, value);
            }
        }
        map.insert(CREATED_AT.to_string(), Value::String(now.clone()));
        map.insert(UPDATED_AT.to_string(), Value::String(now));
        Self(map)
    }

    pub fn id(&self) -> &str {
        self.str_field(ID).unwrap_or_default()
    }

    pub fn created_at(&self) -> Option<&str> {
        self.str_field(CREATED_AT)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.str_field(UPDATED_AT)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Numeric view of a field. Numeric strings count, as form input
    /// often arrives that way.
    pub fn number_field(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(as_number)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Shallow-merge `patch` over this record and restamp `updated_at`.
    /// `id` and `created_at` are never overwritten.
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            if key == ID || key == CREATED_AT {
                continue;
            }
            self.0.insert(key.clone(), value.clone());
        }
        self.touch();
    }

    /// Restamp `updated_at` to now.
    pub fn touch(&mut self) {
        self.0
            .insert(UPDATED_AT.to_string(), Value::String(timestamp()));
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

/// Generate a fresh record id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub fn timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp back into a `DateTime`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Interpret a JSON value as a number: numbers as-is, numeric strings parsed.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Encode a number as JSON, preferring an integer when it has no fraction.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
