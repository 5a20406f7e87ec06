use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::validation;
use super::{metric, Foundation};
use crate::record::{self, Fields, Record};
use crate::repository::collections::DONATIONS;
use crate::store::Store;

const REQUIRED: [&str; 4] = ["name", "email", "amount", "donationType"];
const TXN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Look-back window for donation listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationPeriod {
    Today,
    Week,
    Month,
    Year,
}

impl DonationPeriod {
    /// Earliest `created_at` still inside the window ending at `now`.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DonationPeriod::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc())
                .unwrap_or(now),
            DonationPeriod::Week => now - Duration::days(7),
            DonationPeriod::Month => now.checked_sub_months(Months::new(1)).unwrap_or(now),
            DonationPeriod::Year => now.checked_sub_months(Months::new(12)).unwrap_or(now),
        }
    }
}

impl FromStr for DonationPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DonationPeriod::Today),
            "week" => Ok(DonationPeriod::Week),
            "month" => Ok(DonationPeriod::Month),
            "year" => Ok(DonationPeriod::Year),
            other => Err(DomainError::Validation(format!("unknown period: {}", other))),
        }
    }
}

impl fmt::Display for DonationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DonationPeriod::Today => "today",
            DonationPeriod::Week => "week",
            DonationPeriod::Month => "month",
            DonationPeriod::Year => "year",
        };
        f.write_str(s)
    }
}

/// `TXN_<unix millis>_<8 uppercase alphanumerics>`.
pub(crate) fn transaction_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| TXN_CHARSET[rng.gen_range(0..TXN_CHARSET.len())] as char)
        .collect();
    format!("TXN_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Sum of the `amount` fields; unparsable amounts count as 0.
pub fn total_amount(donations: &[Record]) -> f64 {
    donations
        .iter()
        .filter_map(|d| d.get("amount").and_then(record::as_number))
        .sum()
}

impl<S: Store> Foundation<S> {
    /// Record a completed donation and add it to `donations_total`.
    pub fn process_donation(&self, fields: Fields) -> Result<Outcome<Record>, DomainError> {
        validation::require(&fields, &REQUIRED)?;
        let amount = validation::positive_amount(fields.get("amount"), "amount")?;

        let mut fields = fields;
        let payment_method = fields
            .get("paymentMethod")
            .filter(|v| validation::is_present(Some(*v)))
            .cloned()
            .unwrap_or_else(|| Value::String("online".into()));
        let anonymous = fields
            .get("anonymous")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        fields.insert("amount".into(), record::number_value(amount));
        fields.insert("status".into(), Value::String("completed".into()));
        fields.insert("transaction_id".into(), Value::String(transaction_id()));
        fields.insert("payment_method".into(), payment_method);
        fields.insert("currency".into(), Value::String("USD".into()));
        fields.insert("anonymous".into(), Value::Bool(anonymous));
        fields.insert("tax_deductible".into(), Value::Bool(true));
        fields.insert("receipt_sent".into(), Value::Bool(false));

        let donation = self.repo().create(DONATIONS, fields)?;
        self.count_metric(metric::DONATIONS_TOTAL, amount);
        info!(id = donation.id(), amount, "donation processed");

        Ok(Outcome::new("Donation processed successfully", donation))
    }

    /// Donations, optionally only those created inside `period`.
    pub fn donations(&self, period: Option<DonationPeriod>) -> Result<Vec<Record>, DomainError> {
        let Some(period) = period else {
            return Ok(self.repo().read_all(DONATIONS)?);
        };
        let start = period.start(Utc::now());
        Ok(self.repo().filter(DONATIONS, |d| {
            d.created_at()
                .and_then(record::parse_timestamp)
                .map(|at| at >= start)
                .unwrap_or(false)
        })?)
    }
}
