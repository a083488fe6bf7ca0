//! Declarative validation configuration for request payloads

use crate::core::error::FieldValidationError;
use serde_json::{Map, Value};

type Filter = Box<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;
type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Filters and validators for one payload type and operation
///
/// Filters run first, in registration order, on fields that are present.
/// Validators then run on every registered field, seeing `Null` for absent
/// ones. All failures are collected rather than stopping at the first.
pub struct EntityValidationConfig {
    pub entity_type: String,
    filters: Vec<(String, Filter)>,
    validators: Vec<(String, Validator)>,
}

impl EntityValidationConfig {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            filters: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Register a filter for a field
    pub fn filter<F>(mut self, field: &str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters.push((field.to_string(), Box::new(filter)));
        self
    }

    /// Register a validator for a field
    pub fn validate<V>(mut self, field: &str, validator: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push((field.to_string(), Box::new(validator)));
        self
    }

    /// Apply filters then validators, returning the filtered payload
    pub fn validate_and_filter(&self, payload: Value) -> Result<Value, Vec<FieldValidationError>> {
        let mut object: Map<String, Value> = match payload {
            Value::Object(map) => map,
            _ => {
                return Err(vec![FieldValidationError {
                    field: self.entity_type.clone(),
                    message: "expected a JSON object".to_string(),
                }]);
            }
        };

        let mut errors = Vec::new();

        for (field, filter) in &self.filters {
            if let Some(value) = object.remove(field) {
                match filter(field, value) {
                    Ok(filtered) => {
                        object.insert(field.clone(), filtered);
                    }
                    Err(e) => errors.push(FieldValidationError {
                        field: field.clone(),
                        message: e.to_string(),
                    }),
                }
            }
        }

        for (field, validator) in &self.validators {
            let value = object.get(field).unwrap_or(&Value::Null);
            if let Err(message) = validator(field, value) {
                errors.push(FieldValidationError {
                    field: field.clone(),
                    message,
                });
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(object))
        } else {
            Err(errors)
        }
    }
}
