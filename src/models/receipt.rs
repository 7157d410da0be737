//! Receipt models for processed receipt records.
//!
//! A `Receipt` is the structured output for one processed image. Field
//! declaration order is the serialization order used in the ledger file.

use serde::{Deserialize, Serialize};

use crate::parser::ParsedReceipt;

/// One priced line extracted from the receipt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item description as it appeared on the receipt.
    pub item_name: String,
    /// Price captured next to the description.
    pub item_cost: f64,
}

/// A processed receipt record, as persisted in the ledger and returned
/// to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique record ID, assigned at creation and never changed.
    pub id: String,
    /// Best-effort date token; empty when none was found.
    pub date: String,
    /// Recognized currency code; empty when none was found.
    pub currency: String,
    /// First non-empty line of the OCR text, trimmed.
    pub vendor_name: String,
    /// Priced lines in order of appearance; may include Total/Tax lines.
    pub receipt_items: Vec<ReceiptItem>,
    /// Extracted tax amount, 0 when not found.
    pub tax: f64,
    /// Extracted total amount, 0 when not found.
    pub total: f64,
    /// Public URL of the stored image, always set.
    pub image_url: String,
}

impl Receipt {
    /// Build a record from parsed fields and the stored image URL,
    /// assigning a fresh ID.
    pub fn from_parsed(parsed: ParsedReceipt, image_url: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: parsed.date,
            currency: parsed.currency,
            vendor_name: parsed.vendor_name,
            receipt_items: parsed.items,
            tax: parsed.tax,
            total: parsed.total,
            image_url,
        }
    }
}
