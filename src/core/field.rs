//! Field values used for storage queries, and string formats checked at input

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic field value, as compared by `DataService::query_by_field`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Float(f64),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// String formats checked at the input boundary
///
/// Dates and times are stored as strings and ordered lexicographically, which
/// is only chronological for the fixed-width forms accepted here.
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    /// `YYYY-MM-DD`, and a real calendar date
    IsoDate,
    /// `HH:MM`, 24-hour clock
    Time24h,
    Custom(Regex),
}

impl FieldFormat {
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::IsoDate => Self::is_valid_iso_date(value),
            FieldFormat::Time24h => Self::is_valid_time(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        });
        regex.is_match(email)
    }

    fn is_valid_iso_date(date: &str) -> bool {
        static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = DATE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
        regex.is_match(date) && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
    }

    fn is_valid_time(time: &str) -> bool {
        static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = TIME_REGEX.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap());
        regex.is_match(time)
    }
}
