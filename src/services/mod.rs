//! Account-scoped operations
//!
//! Every operation takes the caller's [`SessionContext`](crate::core::SessionContext)
//! and only ever sees that account's records. Operations that depend on the
//! current date take it as a parameter.

pub mod accounts;
pub mod appointments;
pub mod customers;
pub mod invoices;

pub use accounts::{AccountService, LoginRequest, SignedIn, SignupRequest};
pub use appointments::{AppointmentService, ListQuery};
pub use customers::{CustomerService, search};
pub use invoices::InvoiceService;
