//! Purchase transaction models for CSV ingest and internal representation.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A product line item on a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,

    /// Discount applied to this line.
    #[serde(default)]
    pub discount: Money,

    /// Line amount after discount.
    pub amount: Money,
}

/// A committed purchase transaction. Immutable once written: this is an
/// append-only financial record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique generated identifier, `INV-` followed by 8 hex characters.
    pub invoice_id: String,

    pub customer_id: u32,
    pub total_amount: Money,
    pub points_earned: u64,
    pub points_redeemed: u64,
    pub invoice_date: DateTime<Utc>,
    pub items: Vec<LineItem>,
}

/// Input to the transaction processor.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub customer_id: u32,
    pub total_amount: Money,
    pub items: Vec<LineItem>,
    pub points_to_redeem: u64,

    /// Optional client-supplied key. A replayed key returns the original
    /// receipt instead of charging points a second time.
    pub idempotency_key: Option<String>,
}

/// Result of a committed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub invoice_id: String,
    pub points_earned: u64,
    pub points_redeemed: u64,
    pub new_tier: String,
}

/// Generates a fresh invoice identifier.
///
/// A random token with enough entropy to survive concurrent generation
/// without a central counter, and to be unguessable.
pub fn generate_invoice_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("INV-{}", &token[..8])
}

/// Raw purchase record as read from a batch CSV.
///
/// One purchase per row with a single line item:
/// `customer,product,quantity,total,redeem`. Uses string-based parsing for
/// the amount fields and tolerates a missing redeem column.
#[derive(Debug, Deserialize)]
pub struct PurchaseRecord {
    /// Customer ID (u32)
    pub customer: u32,

    /// Product name; doubles as the product ID in batch input
    pub product: String,

    /// Quantity purchased
    pub quantity: u32,

    /// Purchase total
    pub total: String,

    /// Points to redeem (optional, defaults to 0)
    pub redeem: Option<String>,
}

impl PurchaseRecord {
    /// Parses the raw CSV record into a `PurchaseRequest`.
    ///
    /// Returns `None` if the record is invalid (bad amount, zero quantity,
    /// negative total, unparseable redeem).
    pub fn parse(&self) -> Option<PurchaseRequest> {
        let total = Money::from_str(self.total.trim()).ok()?;
        if total.is_negative() || self.quantity == 0 {
            return None;
        }

        let points_to_redeem = match self.redeem.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw.parse::<u64>().ok()?,
        };

        let product = self.product.trim();
        if product.is_empty() {
            return None;
        }

        Some(PurchaseRequest {
            customer_id: self.customer,
            total_amount: total,
            items: vec![LineItem {
                product_id: product.to_string(),
                product_name: product.to_string(),
                quantity: self.quantity,
                discount: Money::ZERO,
                amount: total,
            }],
            points_to_redeem,
            idempotency_key: None,
        })
    }
}
