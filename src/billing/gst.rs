//! GST split between intrastate and interstate supply
//!
//! Supply within one state pays CGST and SGST in equal halves; supply across
//! states pays IGST. The decision is plain equality of the seller's state code
//! and the place-of-supply code.

use serde::{Deserialize, Serialize};

/// Tax components of one supply
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GstSplit {
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
}

impl GstSplit {
    pub fn total_tax(&self) -> f64 {
        self.cgst + self.sgst + self.igst
    }

    pub fn is_intrastate(&self) -> bool {
        self.igst == 0.0
    }
}

/// Split the GST on a taxable value
///
/// Codes are compared exactly as given, so two empty codes count as the same
/// state.
pub fn compute_gst(
    taxable_value: f64,
    gst_rate_percent: f64,
    seller_state_code: &str,
    place_of_supply_code: &str,
) -> GstSplit {
    let gst_amount = taxable_value * gst_rate_percent / 100.0;

    if seller_state_code == place_of_supply_code {
        let half = gst_amount / 2.0;
        GstSplit {
            cgst: half,
            sgst: half,
            igst: 0.0,
        }
    } else {
        GstSplit {
            cgst: 0.0,
            sgst: 0.0,
            igst: gst_amount,
        }
    }
}

/// Round a currency value to two decimals, halves away from zero
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Everything computed from one invoice line
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceAmounts {
    pub taxable_value: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
    pub total_amount: f64,
}

impl InvoiceAmounts {
    /// Unrounded amounts, as shown while a draft is being edited
    pub fn compute(
        quantity: f64,
        rate: f64,
        gst_rate_percent: f64,
        seller_state_code: &str,
        place_of_supply_code: &str,
    ) -> Self {
        let taxable_value = quantity * rate;
        let split = compute_gst(
            taxable_value,
            gst_rate_percent,
            seller_state_code,
            place_of_supply_code,
        );

        Self {
            taxable_value,
            cgst: split.cgst,
            sgst: split.sgst,
            igst: split.igst,
            total_amount: taxable_value + split.total_tax(),
        }
    }

    /// Persisted amounts; each field is rounded from its own unrounded value
    pub fn rounded(&self) -> Self {
        Self {
            taxable_value: round_currency(self.taxable_value),
            cgst: round_currency(self.cgst),
            sgst: round_currency(self.sgst),
            igst: round_currency(self.igst),
            total_amount: round_currency(self.total_amount),
        }
    }

    pub fn split(&self) -> GstSplit {
        GstSplit {
            cgst: self.cgst,
            sgst: self.sgst,
            igst: self.igst,
        }
    }
}
