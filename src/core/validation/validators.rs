//! Reusable field validators
//!
//! Each validator receives the field name and its JSON value (`Null` when the
//! field is absent) and returns a message on failure. Validators other than
//! [`required`] let absent values through, so optional fields only get checked
//! when they are supplied.

use crate::core::field::FieldFormat;
use serde_json::Value;

/// Validator: field is present, and not blank when it is a string
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("'{}' is required", field)),
        Value::String(s) if s.trim().is_empty() => Err(format!("'{}' is required", field)),
        _ => Ok(()),
    }
}

/// Validator: string matches a [`FieldFormat`]
pub fn format(
    format: FieldFormat,
    expected: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if !format.validate(s) => Err(format!(
            "'{}' must be {} (current value: {})",
            field, expected, s
        )),
        _ => Ok(()),
    }
}

/// Validator: number must be positive
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_f64() {
        Some(num) if num <= 0.0 => Err(format!(
            "'{}' must be positive (value: {})",
            field, num
        )),
        _ => Ok(()),
    }
}

/// Validator: number must not be negative
pub fn non_negative() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_f64() {
        Some(num) if num < 0.0 => Err(format!(
            "'{}' must not be negative (value: {})",
            field, num
        )),
        _ => Ok(()),
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(max: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_f64() {
        Some(num) if num > max => Err(format!(
            "'{}' must not exceed {} (value: {})",
            field, max, num
        )),
        _ => Ok(()),
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: &'static [&'static str],
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if !allowed.contains(&s) => Err(format!(
            "'{}' must be one of {:?} (current value: {})",
            field, allowed, s
        )),
        _ => Ok(()),
    }
}
