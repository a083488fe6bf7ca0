//! Appointment records and their payloads

use crate::core::field::{FieldFormat, FieldValue};
use crate::core::validation::{EntityValidationConfig, ValidatableEntity, filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const STATUS_VALUES: &[&str] = &["scheduled", "completed", "cancelled"];

/// Appointment status; any value may be set directly by an edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AppointmentStatus> for FieldValue {
    fn from(status: AppointmentStatus) -> Self {
        FieldValue::String(status.as_str().to_string())
    }
}

/// A booked appointment
///
/// `date` is `YYYY-MM-DD` and `time` is `HH:MM`; both are kept as strings and
/// ordered lexicographically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Weak reference; the customer may no longer exist
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl_entity!(
    Appointment,
    "appointment",
    "appointments",
    owner: user_id,
    {
        "userId" => user_id,
        "customerId" => customer_id,
        "customerName" => customer_name,
        "phone" => phone,
        "date" => date,
        "time" => time,
        "status" => status,
    }
);

/// Payload for booking or editing an appointment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

impl ValidatableEntity for AppointmentInput {
    fn validation_config(_operation: &str) -> EntityValidationConfig {
        EntityValidationConfig::new("appointment")
            .filter("customerId", filters::blank_to_null())
            .filter("customerName", filters::trim())
            .filter("phone", filters::trim())
            .filter("date", filters::trim())
            .filter("time", filters::trim())
            .filter("notes", filters::trim())
            .validate("customerName", validators::required())
            .validate("phone", validators::required())
            .validate("date", validators::required())
            .validate("date", validators::format(FieldFormat::IsoDate, "a date (YYYY-MM-DD)"))
            .validate("time", validators::required())
            .validate("time", validators::format(FieldFormat::Time24h, "a time (HH:MM)"))
            .validate("status", validators::in_list(STATUS_VALUES))
    }
}

impl Appointment {
    /// Build a new record from a validated input; status defaults to scheduled
    pub fn from_input(input: AppointmentInput, user_id: Uuid) -> Self {
        Self {
            id: Uuid::nil(),
            user_id,
            customer_id: input.customer_id,
            customer_name: input.customer_name,
            phone: input.phone,
            date: input.date,
            time: input.time,
            notes: input.notes,
            status: input.status.unwrap_or_default(),
            created_at: None,
        }
    }
}

/// Payload for a status-only edit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

impl ValidatableEntity for StatusUpdate {
    fn validation_config(_operation: &str) -> EntityValidationConfig {
        EntityValidationConfig::new("appointment")
            .filter("status", filters::trim())
            .filter("status", filters::lowercase())
            .validate("status", validators::required())
            .validate("status", validators::in_list(STATUS_VALUES))
    }
}
