//! Core module containing fundamental traits and types for the backend

pub mod auth;
pub mod entity;
pub mod error;
pub mod field;
pub mod password;
pub mod service;
pub mod validation;

pub use auth::{Locale, SessionContext, SessionStore};
pub use entity::Entity;
pub use error::{BizError, BizResult};
pub use field::{FieldFormat, FieldValue};
pub use service::DataService;
