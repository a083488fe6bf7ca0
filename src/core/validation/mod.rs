//! Validation and filtering system
//!
//! Payload types declare their rules through [`ValidatableEntity`]; the HTTP
//! layer applies them with the [`Validated`] extractor and services apply the
//! same rules to typed inputs with [`validate_input`].

pub mod config;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use config::EntityValidationConfig;
pub use extractor::{ValidatableEntity, Validated, validate_input, validate_payload};
