use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::domain::Outcome;

/// Success envelope: `{data?, message?, ...extra}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Response {
    pub fn data<T: Serialize>(data: &T) -> Result<Self, ApiError> {
        Ok(Self {
            data: Some(serde_json::to_value(data)?),
            ..Self::default()
        })
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Envelope carrying both the outcome's data and its message.
    pub fn outcome<T: Serialize>(outcome: Outcome<T>) -> Result<Self, ApiError> {
        Ok(Self::data(&outcome.data)?.with_message(outcome.message))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
