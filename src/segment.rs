//! Marketing segments: structured criteria and point-in-time membership.
//!
//! Criteria are a typed predicate evaluated against customer records,
//! composed field by field rather than built up as a filter string.
//! Membership is snapshotted when the segment is created or updated;
//! it is NOT kept in sync with later customer changes.

use crate::customer::Customer;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Filter for selecting customers into a segment.
///
/// All present fields must match (conjunction); an empty criteria
/// matches every customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentCriteria {
    /// Exact tier name match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    /// Inclusive lower bound on available points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_points: Option<u64>,

    /// Inclusive upper bound on available points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<u64>,

    /// Earliest join date, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_from: Option<NaiveDate>,

    /// Latest join date, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_to: Option<NaiveDate>,
}

impl SegmentCriteria {
    /// Evaluates the predicate against a customer.
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(tier) = &self.tier {
            if &customer.tier != tier {
                return false;
            }
        }
        if let Some(min) = self.min_points {
            if customer.available_points < min {
                return false;
            }
        }
        if let Some(max) = self.max_points {
            if customer.available_points > max {
                return false;
            }
        }
        if let Some(from) = self.joined_from {
            if customer.join_date < from {
                return false;
            }
        }
        if let Some(to) = self.joined_to {
            if customer.join_date > to {
                return false;
            }
        }
        true
    }
}

/// A saved segment with its membership snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub name: String,
    pub criteria: SegmentCriteria,
    pub created_by: String,
    pub created_at: DateTime<Utc>,

    /// Customer ids captured when the segment was created or last updated.
    pub members: Vec<u32>,
}

impl Segment {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerProfile;

    fn customer(id: u32, tier: &str, points: u64, joined: (i32, u32, u32)) -> Customer {
        let mut c = Customer::new(
            id,
            CustomerProfile {
                first_name: "Test".to_string(),
                last_name: "Customer".to_string(),
                email: format!("c{}@example.com", id),
                mobile: format!("070000000{}", id),
                address: String::new(),
                identification_no: format!("ID{}", id),
            },
            NaiveDate::from_ymd_opt(joined.0, joined.1, joined.2).unwrap(),
        );
        c.tier = tier.to_string();
        c.apply_points(points, 0);
        c
    }

    #[test]
    fn test_empty_criteria_matches_everyone() {
        let criteria = SegmentCriteria::default();
        assert!(criteria.matches(&customer(1, "Purple", 0, (2024, 1, 1))));
        assert!(criteria.matches(&customer(2, "Gold", 500, (2020, 6, 30))));
    }

    #[test]
    fn test_tier_criteria() {
        let criteria = SegmentCriteria {
            tier: Some("Gold".to_string()),
            ..Default::default()
        };

        assert!(criteria.matches(&customer(1, "Gold", 150, (2024, 1, 1))));
        assert!(!criteria.matches(&customer(2, "Purple", 150, (2024, 1, 1))));
    }

    #[test]
    fn test_points_range_bounds_are_inclusive() {
        let criteria = SegmentCriteria {
            min_points: Some(100),
            max_points: Some(200),
            ..Default::default()
        };

        assert!(criteria.matches(&customer(1, "Gold", 100, (2024, 1, 1))));
        assert!(criteria.matches(&customer(2, "Gold", 200, (2024, 1, 1))));
        assert!(!criteria.matches(&customer(3, "Gold", 99, (2024, 1, 1))));
        assert!(!criteria.matches(&customer(4, "Gold", 201, (2024, 1, 1))));
    }

    #[test]
    fn test_join_date_window() {
        let criteria = SegmentCriteria {
            joined_from: Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
            joined_to: Some(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            ..Default::default()
        };

        assert!(criteria.matches(&customer(1, "Purple", 0, (2023, 6, 15))));
        assert!(!criteria.matches(&customer(2, "Purple", 0, (2022, 12, 31))));
        assert!(!criteria.matches(&customer(3, "Purple", 0, (2024, 1, 1))));
    }

    #[test]
    fn test_combined_criteria_is_a_conjunction() {
        let criteria = SegmentCriteria {
            tier: Some("Gold".to_string()),
            min_points: Some(100),
            ..Default::default()
        };

        assert!(criteria.matches(&customer(1, "Gold", 150, (2024, 1, 1))));
        assert!(!criteria.matches(&customer(2, "Gold", 50, (2024, 1, 1))));
        assert!(!criteria.matches(&customer(3, "Purple", 150, (2024, 1, 1))));
    }

    #[test]
    fn test_criteria_round_trips_through_json() {
        let criteria = SegmentCriteria {
            tier: Some("Gold".to_string()),
            min_points: Some(10),
            ..Default::default()
        };

        let json = serde_json::to_string(&criteria).unwrap();
        let back: SegmentCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tier.as_deref(), Some("Gold"));
        assert_eq!(back.min_points, Some(10));
        assert!(back.max_points.is_none());
    }
}
