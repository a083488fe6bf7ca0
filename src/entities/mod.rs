//! Stored record types

#[macro_use]
pub mod macros;

pub mod appointment;
pub mod customer;
pub mod invoice;
pub mod user;

pub use appointment::{Appointment, AppointmentInput, AppointmentStatus, StatusUpdate};
pub use customer::{Customer, NewCustomer};
pub use invoice::Invoice;
pub use user::{AccountProfile, User};
