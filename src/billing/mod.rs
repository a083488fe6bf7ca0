//! Invoice numbering, GST computation and invoice drafts
//!
//! Everything here is pure: no storage, no clock. Callers pass the creation
//! date and the account's existing invoices.

pub mod draft;
pub mod gst;
pub mod numbering;

pub use draft::{InvoiceDraft, build_invoice};
pub use gst::{GstSplit, InvoiceAmounts, compute_gst, round_currency};
pub use numbering::{next_invoice_number, period_key, period_prefix};
