//! Typed error handling for bizbook
//!
//! Every failure that can leave a service is one of the categories below.
//! The pure billing and scheduling computations never fail; errors originate
//! at the validation boundary, the session boundary, or the storage boundary,
//! and propagate unchanged to the caller.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed or missing input, caught before any write
//! - [`StorageError`]: transport failures and deadline expiry at the storage
//!   collaborator (kept distinct so callers can tell them apart)
//! - [`EntityError`]: missing records, records owned by another account,
//!   duplicate keys
//! - [`RequestError`]: missing or invalid sessions and credentials
//! - [`ConfigError`]: configuration loading problems
//!
//! # Example
//!
//! ```rust,ignore
//! match appointments.get(&ctx, id).await {
//!     Ok(apt) => println!("{} at {}", apt.date, apt.time),
//!     Err(BizError::Entity(EntityError::NotFound { .. })) => println!("no such appointment"),
//!     Err(e) if e.is_timeout() => eprintln!("{}", e),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for bizbook
#[derive(Debug, Error)]
pub enum BizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BizError {
    /// Shorthand for the not-found error returned on missing or foreign records
    pub fn not_found(entity_type: &str, id: Uuid) -> Self {
        BizError::Entity(EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        })
    }

    /// Shorthand for a single-field validation error
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        BizError::Validation(ValidationError::FieldError {
            field: field.to_string(),
            message: message.into(),
        })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BizError::Storage(StorageError::Timeout { .. }))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, BizError::Storage(StorageError::Transport { .. }))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BizError::Entity(EntityError::NotFound { .. }))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BizError::Validation(_))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BizError::Validation(e) => e.status_code(),
            BizError::Storage(e) => e.status_code(),
            BizError::Entity(e) => e.status_code(),
            BizError::Request(e) => e.status_code(),
            BizError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BizError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BizError::Validation(e) => e.error_code(),
            BizError::Storage(e) => e.error_code(),
            BizError::Entity(e) => e.error_code(),
            BizError::Request(e) => e.error_code(),
            BizError::Config(_) => "CONFIG_ERROR",
            BizError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BizError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            BizError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            BizError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({ "fields": [{ "field": field, "message": message }] }))
            }
            BizError::Storage(StorageError::Timeout { operation, after }) => {
                Some(serde_json::json!({
                    "operation": operation,
                    "timeout_secs": after.as_secs()
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for BizError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Invalid UUID format: {value}")]
    InvalidUuid { value: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldError { .. } | ValidationError::FieldErrors(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ValidationError::InvalidJson { .. } | ValidationError::InvalidUuid { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldError { .. } | ValidationError::FieldErrors(_) => {
                "VALIDATION_ERROR"
            }
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidUuid { .. } => "INVALID_UUID",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised at the storage collaborator boundary
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected the call (network, permissions, poisoned lock)
    #[error("{backend} {operation} failed: {message}")]
    Transport {
        backend: String,
        operation: String,
        message: String,
    },

    /// The call did not complete before the deadline
    #[error(
        "Storage request '{operation}' timed out after {}s. Check that the storage backend is reachable and its access rules are deployed, then resubmit.",
        .after.as_secs()
    )]
    Timeout { operation: String, after: Duration },

    /// Stored data could not be decoded back into a record
    #[error("Data integrity error: {message}")]
    Integrity { message: String },
}

impl StorageError {
    pub fn transport(backend: &str, operation: &str, message: impl Into<String>) -> Self {
        StorageError::Transport {
            backend: backend.to_string(),
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::Transport { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            StorageError::Integrity { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Transport { .. } => "STORAGE_TRANSPORT_ERROR",
            StorageError::Timeout { .. } => "STORAGE_TIMEOUT",
            StorageError::Integrity { .. } => "STORAGE_INTEGRITY_ERROR",
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups and uniqueness
#[derive(Debug, Error)]
pub enum EntityError {
    /// Record is missing, or belongs to another account
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    #[error("{message}")]
    AlreadyExists { entity_type: String, message: String },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to sessions and credentials
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Missing required header: {header}")]
    MissingHeader { header: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Login failed; the message never says which half was wrong
    #[error("Invalid email or password.")]
    InvalidCredentials,
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MissingHeader { .. } => "MISSING_HEADER",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", .file.as_deref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for BizError {
    fn from(err: serde_json::Error) -> Self {
        BizError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for BizError {
    fn from(err: serde_yaml::Error) -> Self {
        BizError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<uuid::Error> for BizError {
    fn from(err: uuid::Error) -> Self {
        BizError::Validation(ValidationError::InvalidUuid {
            value: err.to_string(),
        })
    }
}

/// A specialized Result type for bizbook operations
pub type BizResult<T> = Result<T, BizError>;
