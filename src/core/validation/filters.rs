//! Reusable field filters
//!
//! These filters normalise field values before validation

use anyhow::Result;
use serde_json::Value;

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: trim, and turn a blank string into null
pub fn blank_to_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value.as_str() {
        Some(s) if s.trim().is_empty() => Ok(Value::Null),
        Some(s) => Ok(Value::String(s.trim().to_string())),
        None => Ok(value),
    }
}
