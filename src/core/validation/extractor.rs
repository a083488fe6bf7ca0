//! Axum extractor for validated payloads
//!
//! This module provides the `Validated<T>` extractor that filters and
//! validates request bodies before they reach handlers.

use super::config::EntityValidationConfig;
use crate::core::error::{BizError, BizResult, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Trait for payload types that carry their own validation rules
pub trait ValidatableEntity {
    /// Get the validation configuration for a specific operation
    /// (`"create"` or `"update"`)
    fn validation_config(operation: &str) -> EntityValidationConfig;
}

/// Filter and validate a raw JSON payload, then decode it
pub fn validate_payload<T>(payload: Value, operation: &str) -> BizResult<T>
where
    T: ValidatableEntity + DeserializeOwned,
{
    let config = T::validation_config(operation);
    let filtered = config
        .validate_and_filter(payload)
        .map_err(ValidationError::FieldErrors)?;
    Ok(serde_json::from_value(filtered)?)
}

/// Run the same rules over an already typed input
///
/// Services call this so in-process callers get the checks the HTTP
/// boundary applies.
pub fn validate_input<T>(input: T, operation: &str) -> BizResult<T>
where
    T: ValidatableEntity + Serialize + DeserializeOwned,
{
    validate_payload(serde_json::to_value(input)?, operation)
}

/// Axum extractor that validates and filters a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn add_customer(
///     ctx: SessionContext,
///     State(host): State<Arc<AppHost>>,
///     Validated(input): Validated<NewCustomer>,
/// ) -> BizResult<Json<Customer>> {
///     // input is already trimmed and checked
/// }
/// ```
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableEntity + DeserializeOwned + Send,
{
    type Rejection = BizError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();

        let Json(payload): Json<Value> =
            Json::from_request(req, state)
                .await
                .map_err(|e| ValidationError::InvalidJson {
                    message: e.body_text(),
                })?;

        let operation = match method.as_str() {
            "PUT" | "PATCH" => "update",
            _ => "create",
        };

        validate_payload(payload, operation).map(Validated)
    }
}
