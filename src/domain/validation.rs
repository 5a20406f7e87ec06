//! Field validation shared by domain operations and auth.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::error::DomainError;
use crate::record::{self, Fields};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid phone pattern"))
}

/// A value counts as present unless it is missing, null or a blank string.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Fail on the first required field that is not present.
pub fn require(fields: &Fields, required: &[&str]) -> Result<(), DomainError> {
    for field in required {
        if !is_present(fields.get(*field)) {
            return Err(DomainError::Validation(format!("{} is required", field)));
        }
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Phone numbers may carry spaces, dashes and parentheses.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    phone_regex().is_match(&digits)
}

/// A strictly positive amount, given as a number or a numeric string.
pub fn positive_amount(value: Option<&Value>, field: &str) -> Result<f64, DomainError> {
    let amount = value
        .and_then(record::as_number)
        .ok_or_else(|| DomainError::Validation(format!("{} must be a number", field)))?;
    if amount <= 0.0 {
        return Err(DomainError::Validation(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(amount)
}

/// Text field value, if it is a string.
pub fn text<'a>(fields: &'a Fields, field: &str) -> Option<&'a str> {
    fields.get(field).and_then(Value::as_str)
}
