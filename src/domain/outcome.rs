use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::error::DomainError;

/// A successful domain operation: a user-facing message plus its data.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub message: String,
    pub data: T,
}

impl<T> Outcome<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            message: self.message,
            data: f(self.data),
        }
    }
}

/// Uniform form-submission result: `{success, message, data?}`.
///
/// Failed operations become `success: false` with the error message, so a
/// form handler can display the message inline without matching on errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Report {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn from_result<T: Serialize>(result: Result<Outcome<T>, DomainError>) -> Self {
        match result {
            Ok(outcome) => {
                let data = serde_json::to_value(&outcome.data)
                    .ok()
                    .filter(|v| !v.is_null());
                Report::ok(outcome.message, data)
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "domain operation rejected");
                Report::failed(e.to_string())
            }
        }
    }
}

impl<T: Serialize> From<Result<Outcome<T>, DomainError>> for Report {
    fn from(result: Result<Outcome<T>, DomainError>) -> Self {
        Report::from_result(result)
    }
}
