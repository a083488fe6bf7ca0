//! Sequential invoice numbers per billing period
//!
//! Numbers look like `INV-202403-007`. Allocation scans the account's
//! existing invoices; there is no counter, so two creations racing within the
//! same period can compute the same number.

use crate::entities::Invoice;
use chrono::NaiveDate;

/// Minimum width of the numeric suffix
const SUFFIX_WIDTH: usize = 3;

/// Billing period key, `YYYYMM`
pub fn period_key(now: NaiveDate) -> String {
    now.format("%Y%m").to_string()
}

/// Prefix shared by every number in the period, `INV-YYYYMM-`
pub fn period_prefix(now: NaiveDate) -> String {
    format!("INV-{}-", period_key(now))
}

/// Numeric suffix of a number in the given period, leading zeros stripped
///
/// Anything after the prefix that is not a plain run of ASCII digits is
/// ignored. Suffixes stay decimal strings, so any length is handled.
fn suffix_in_period<'a>(number: &'a str, prefix: &str) -> Option<&'a str> {
    let suffix = number.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(suffix.trim_start_matches('0'))
}

/// Add one to a string of ASCII digits
fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    bytes.insert(0, b'1');
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Next invoice number for the period containing `now`
pub fn next_invoice_number(existing: &[Invoice], now: NaiveDate) -> String {
    let prefix = period_prefix(now);
    next_number_from(existing.iter().map(|i| i.invoice_number.as_str()), &prefix)
}

/// Allocate from bare numbers; useful when only the numbers were fetched
pub fn next_number_from<'a>(numbers: impl IntoIterator<Item = &'a str>, prefix: &str) -> String {
    // without leading zeros, a longer run of digits is always the larger number
    let max = numbers
        .into_iter()
        .filter_map(|n| suffix_in_period(n, prefix))
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .unwrap_or("");

    format!("{}{:0>width$}", prefix, increment_decimal(max), width = SUFFIX_WIDTH)
}
