//! # bizbook
//!
//! Scheduling and billing backend for small service businesses.
//!
//! ## Features
//!
//! - **Accounts**: signup and login with salted PBKDF2 hashes, bearer sessions
//! - **Customers**: per-account roster with name/phone search
//! - **Appointments**: booking, status changes, day/week/date-group views
//! - **Reminders**: prefilled WhatsApp links for an appointment
//! - **Invoices**: per-month sequential numbers (`INV-YYYYMM-NNN`) and the
//!   CGST/SGST or IGST split by place of supply
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bizbook::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::from_env()?)
//!         .serve()
//!         .await
//! }
//! ```

pub mod billing;
pub mod config;
pub mod core;
pub mod entities;
pub mod schedule;
pub mod server;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{Locale, SessionContext, SessionStore},
        entity::Entity,
        error::{BizError, BizResult},
        field::{FieldFormat, FieldValue},
        service::DataService,
        validation::{ValidatableEntity, Validated},
    };

    // === Records ===
    pub use crate::entities::{
        AccountProfile, Appointment, AppointmentInput, AppointmentStatus, Customer, Invoice,
        NewCustomer, User,
    };

    // === Domain ===
    pub use crate::billing::{InvoiceAmounts, InvoiceDraft, compute_gst, next_invoice_number};
    pub use crate::schedule::{FilterMode, calendar_strip, group_by_date, whatsapp_reminder_link};
    pub use crate::services::{AccountService, AppointmentService, CustomerService, InvoiceService};

    // === Storage ===
    pub use crate::storage::{DeadlineDataService, InMemoryDataService, Storage};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppHost, EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
