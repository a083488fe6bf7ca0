//! Invoice records
//!
//! Invoices are written once and never edited or deleted. Amounts are stored
//! already rounded to two decimals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// `INV-YYYYMM-NNN`, unique per account
    pub invoice_number: String,
    pub date: String,

    pub seller_name: String,
    #[serde(default)]
    pub seller_address: Option<String>,
    #[serde(default)]
    pub seller_gstin: Option<String>,
    #[serde(default)]
    pub seller_state: String,

    pub buyer_name: String,
    #[serde(default)]
    pub buyer_address: Option<String>,
    #[serde(default)]
    pub buyer_phone: Option<String>,
    #[serde(default)]
    pub buyer_gstin: Option<String>,
    pub place_of_supply: String,

    pub description: String,
    pub sac_code: String,
    pub quantity: f64,
    pub rate: f64,
    pub gst_rate: f64,

    pub taxable_value: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
    pub total_amount: f64,

    #[serde(default)]
    pub appointment_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl_entity!(
    Invoice,
    "invoice",
    "invoices",
    owner: user_id,
    {
        "userId" => user_id,
        "invoiceNumber" => invoice_number,
        "date" => date,
        "buyerName" => buyer_name,
        "appointmentId" => appointment_id,
        "totalAmount" => total_amount,
    }
);
