//! Export gate: contact-form validation, the download-log line format and
//! the fixed column order of the exported file.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::CoreError;
use crate::filter::filter_rows;
use crate::record::{Dataset, TradeRecord};
use crate::request::DashboardState;

pub const EXPORT_FILENAME: &str = "asymmetric_cryptoization_data.csv";
pub const EXPORT_COLUMNS: [&str; 8] = [
    "month",
    "exchange",
    "base_asset",
    "quote_asset",
    "region",
    "crypto_type",
    "volume_usd",
    "number_of_trades",
];

pub const LOG_HEADER: &str = "timestamp | name | institution | email\n";
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all fields.";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Who is downloading. All three fields are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub email: String,
}

/// A validated form with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub name: String,
    pub institution: String,
    pub email: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<Requester, CoreError> {
        let name = self.name.trim();
        let institution = self.institution.trim();
        let email = self.email.trim();
        if name.is_empty() || institution.is_empty() || email.is_empty() {
            return Err(CoreError::Validation(INCOMPLETE_FORM_MESSAGE.to_string()));
        }
        Ok(Requester {
            name: name.to_string(),
            institution: institution.to_string(),
            email: email.to_string(),
        })
    }
}

impl Requester {
    /// One download-log line, newline-terminated.
    pub fn log_line(&self, at: DateTime<Utc>) -> String {
        format!(
            "{} | {} | {} | {}\n",
            format_timestamp(at),
            self.name,
            self.institution,
            self.email
        )
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Prepend the header to an empty log, then append `line`.
pub fn append_log(existing: &str, line: &str) -> String {
    let mut out = if existing.is_empty() {
        LOG_HEADER.to_string()
    } else {
        existing.to_string()
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
    out
}

/// Rows to export: the dashboard's current filters, unaggregated.
pub fn export_rows<'a>(dataset: &'a Dataset, state: &DashboardState) -> Vec<&'a TradeRecord> {
    let selection = state.selection.resolve();
    filter_rows(dataset, &selection, state.range(dataset))
}
