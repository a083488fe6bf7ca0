//! Invoice drafts: the billing form input before a number is allocated

use super::gst::InvoiceAmounts;
use crate::config::BillingConfig;
use crate::core::field::FieldFormat;
use crate::core::validation::{EntityValidationConfig, ValidatableEntity, filters, validators};
use crate::entities::Invoice;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SAC_CODE: &str = "998313";
pub const DEFAULT_GST_RATE: f64 = 18.0;
pub const DEFAULT_QUANTITY: f64 = 1.0;
pub const DEFAULT_DESCRIPTION: &str = "Consultation / Professional service";
pub const MAX_GST_RATE: f64 = 28.0;

/// Operation name for drafts that are only being previewed
pub const PREVIEW: &str = "preview";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub seller_name: String,
    pub seller_address: Option<String>,
    pub seller_gstin: Option<String>,
    /// State code of the seller
    #[serde(default)]
    pub seller_state: String,

    #[serde(default)]
    pub buyer_name: String,
    pub buyer_address: Option<String>,
    pub buyer_phone: Option<String>,
    pub buyer_gstin: Option<String>,
    /// State code where the service is supplied
    #[serde(default)]
    pub place_of_supply: String,

    pub description: Option<String>,
    pub sac_code: Option<String>,
    pub quantity: Option<f64>,
    pub rate: Option<f64>,
    pub gst_rate: Option<f64>,

    pub appointment_id: Option<Uuid>,
}

impl ValidatableEntity for InvoiceDraft {
    fn validation_config(operation: &str) -> EntityValidationConfig {
        let config = EntityValidationConfig::new("invoice")
            .filter("date", filters::trim())
            .filter("sellerName", filters::trim())
            .filter("sellerState", filters::trim())
            .filter("buyerName", filters::trim())
            .filter("placeOfSupply", filters::trim())
            .filter("sellerAddress", filters::blank_to_null())
            .filter("sellerGstin", filters::blank_to_null())
            .filter("buyerAddress", filters::blank_to_null())
            .filter("buyerPhone", filters::blank_to_null())
            .filter("buyerGstin", filters::blank_to_null())
            .filter("description", filters::blank_to_null())
            .filter("sacCode", filters::blank_to_null())
            .filter("appointmentId", filters::blank_to_null())
            .validate("date", validators::format(FieldFormat::IsoDate, "a date (YYYY-MM-DD)"))
            .validate("quantity", validators::non_negative())
            .validate("rate", validators::non_negative())
            .validate("gstRate", validators::non_negative())
            .validate("gstRate", validators::max_value(MAX_GST_RATE));

        if operation == PREVIEW {
            return config;
        }

        config
            .validate("date", validators::required())
            .validate("sellerName", validators::required())
            .validate("buyerName", validators::required())
            .validate("placeOfSupply", validators::required())
            .validate("rate", validators::required())
            .validate("rate", validators::positive())
    }
}

impl InvoiceDraft {
    /// Fill unset fields from the configured billing defaults
    pub fn with_defaults(mut self, billing: &BillingConfig) -> Self {
        self.description
            .get_or_insert_with(|| billing.default_description.clone());
        self.sac_code
            .get_or_insert_with(|| billing.default_sac_code.clone());
        self.gst_rate.get_or_insert(billing.default_gst_rate);
        self.quantity.get_or_insert(DEFAULT_QUANTITY);
        self
    }

    pub fn quantity_or_default(&self) -> f64 {
        self.quantity.unwrap_or(DEFAULT_QUANTITY)
    }

    pub fn gst_rate_or_default(&self) -> f64 {
        self.gst_rate.unwrap_or(DEFAULT_GST_RATE)
    }

    /// Unrounded amounts for this draft
    pub fn amounts(&self) -> InvoiceAmounts {
        InvoiceAmounts::compute(
            self.quantity_or_default(),
            self.rate.unwrap_or(0.0),
            self.gst_rate_or_default(),
            &self.seller_state,
            &self.place_of_supply,
        )
    }
}

/// Turn a validated draft into the record that gets persisted
///
/// Amounts are rounded here and nowhere earlier.
pub fn build_invoice(draft: InvoiceDraft, user_id: Uuid, invoice_number: String) -> Invoice {
    let amounts = draft.amounts().rounded();
    let quantity = draft.quantity_or_default();
    let gst_rate = draft.gst_rate_or_default();

    Invoice {
        id: Uuid::nil(),
        user_id,
        invoice_number,
        date: draft.date,
        seller_name: draft.seller_name,
        seller_address: draft.seller_address,
        seller_gstin: draft.seller_gstin,
        seller_state: draft.seller_state,
        buyer_name: draft.buyer_name,
        buyer_address: draft.buyer_address,
        buyer_phone: draft.buyer_phone,
        buyer_gstin: draft.buyer_gstin,
        place_of_supply: draft.place_of_supply,
        description: draft
            .description
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        sac_code: draft.sac_code.unwrap_or_else(|| DEFAULT_SAC_CODE.to_string()),
        quantity,
        rate: draft.rate.unwrap_or(0.0),
        gst_rate,
        taxable_value: amounts.taxable_value,
        cgst: amounts.cgst,
        sgst: amounts.sgst,
        igst: amounts.igst,
        total_amount: amounts.total_amount,
        appointment_id: draft.appointment_id,
        created_at: None,
    }
}
