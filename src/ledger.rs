//! Append-only loyalty history ledger.
//!
//! One event per point-changing movement per transaction: at most one
//! `Earned` and one `Redeemed` row. Zero-point movements are never recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a point movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointsStatus {
    Earned,
    Redeemed,
}

/// A single point-earning or point-redeeming event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyEvent {
    pub customer_id: u32,
    pub invoice_id: String,
    pub status: PointsStatus,

    /// Points moved; always strictly positive.
    pub points: u64,

    pub created_at: DateTime<Utc>,
}

impl LoyaltyEvent {
    pub fn new(customer_id: u32, invoice_id: &str, status: PointsStatus, points: u64) -> Self {
        LoyaltyEvent {
            customer_id,
            invoice_id: invoice_id.to_string(),
            status,
            points,
            created_at: Utc::now(),
        }
    }
}
