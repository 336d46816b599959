//! Loyalty tier table and tier resolution.
//!
//! Tiers are kept sorted by threshold ascending; resolution picks the
//! highest qualifying threshold, falling back to the lowest tier when
//! nothing qualifies.

use serde::{Deserialize, Serialize};

/// A named loyalty level gated by a minimum points threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier {
    pub id: u32,
    pub name: String,

    /// Minimum available points required to hold this tier.
    pub threshold: u64,

    /// Discount granted to customers in this tier, 0..=100.
    pub discount_percent: u8,

    #[serde(default)]
    pub description: Option<String>,
}

/// Selects the tier for a given available-points balance.
///
/// Among tiers whose threshold is covered by `available_points`, the one
/// with the greatest threshold wins. When no tier qualifies (all thresholds
/// above the balance) the lowest-threshold tier is the explicit fallback.
///
/// Expects `tiers` sorted by threshold ascending with distinct thresholds,
/// which the store guarantees. Returns `None` only for an empty table.
pub fn resolve_tier(available_points: u64, tiers: &[Tier]) -> Option<&Tier> {
    tiers
        .iter()
        .filter(|t| t.threshold <= available_points)
        .max_by_key(|t| t.threshold)
        .or_else(|| tiers.first())
}

/// Returns the next tier above the given balance, or `None` at the top.
pub fn next_tier(available_points: u64, tiers: &[Tier]) -> Option<&Tier> {
    tiers.iter().find(|t| t.threshold > available_points)
}

/// Points still needed to reach `target` from the given balance.
pub fn points_to_next_tier(available_points: u64, target: &Tier) -> u64 {
    target.threshold.saturating_sub(available_points)
}
