//! Points structure: the spend-to-points exchange rate.
//!
//! The structure is an append-only sequence; only the most recently
//! configured row is current. A new row supersedes rather than edits.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The current exchange rate between spend amount and points awarded.
///
/// Every whole multiple of `spend_amount` in a purchase total awards
/// `points_awarded` points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsStructure {
    /// Spend required per award, strictly positive.
    pub spend_amount: Money,

    /// Points granted per whole `spend_amount` spent, strictly positive.
    pub points_awarded: u64,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Computes the points earned for a purchase total under the given structure.
///
/// Formula: `floor(total / spend_amount) * points_awarded`. Fractional spend
/// beyond the last whole multiple of `spend_amount` earns nothing. Returns 0
/// for totals below one unit of spend.
pub fn earned_points(total: Money, structure: &PointsStructure) -> u64 {
    // spend_amount > 0 is validated when the structure is configured
    total
        .div_floor(structure.spend_amount)
        .map(|units| units * structure.points_awarded)
        .unwrap_or(0)
}
