//! HTTP handlers and the descriptors that route them

pub mod appointments;
pub mod auth;
pub mod customers;
pub mod invoices;
pub mod schedule;

pub use appointments::AppointmentDescriptor;
pub use customers::CustomerDescriptor;
pub use invoices::InvoiceDescriptor;
pub use schedule::ScheduleDescriptor;

use crate::core::error::{BizError, BizResult, ValidationError};
use crate::core::field::FieldFormat;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

/// Parse a path id, reporting a malformed one as a bad request
pub(crate) fn parse_id(raw: &str) -> BizResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        BizError::Validation(ValidationError::InvalidUuid {
            value: raw.to_string(),
        })
    })
}

/// Parse an optional `YYYY-MM-DD` query parameter; blank counts as absent
pub(crate) fn parse_date_param(name: &str, raw: Option<&str>) -> BizResult<Option<NaiveDate>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if !FieldFormat::IsoDate.validate(raw) {
        return Err(BizError::invalid_field(
            name,
            format!("'{}' must be a date (YYYY-MM-DD) (current value: {})", name, raw),
        ));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| BizError::invalid_field(name, e.to_string()))
}

/// Unwrap a JSON body, reporting axum's rejection in the common error shape
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> BizResult<Value> {
    payload.map(|Json(value)| value).map_err(|e| {
        BizError::Validation(ValidationError::InvalidJson {
            message: e.body_text(),
        })
    })
}
