//! Customer account model and point operations.
//!
//! Maintains the invariant: `available_points == earned_points - redeemed_points`
//! at all times.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A customer's profile and loyalty point account.
///
/// # Invariants
///
/// - `available_points == earned_points - redeemed_points` is maintained
///   after every operation
/// - `redeemed_points` never exceeds `earned_points`, because a redemption
///   is only accepted when it is covered by the available balance
///
/// Point and tier fields are written exclusively by the transaction
/// processor; profile edits touch identity fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: u32,

    pub first_name: String,
    pub last_name: String,

    /// Globally unique contact email.
    pub email: String,

    /// Globally unique mobile number.
    pub mobile: String,

    pub address: String,

    /// Globally unique national identification number.
    pub identification_no: String,

    /// Denormalized cache of the current tier name.
    pub tier: String,

    /// Lifetime points earned.
    pub earned_points: u64,

    /// Lifetime points redeemed.
    pub redeemed_points: u64,

    /// Points currently available: `earned_points - redeemed_points`.
    pub available_points: u64,

    pub join_date: NaiveDate,
}

/// Identity fields supplied at registration or profile edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub identification_no: String,
}

impl Customer {
    /// Creates a new customer with zero point balances and no tier assigned.
    ///
    /// The tier cache starts empty; the store resolves and writes the
    /// initial tier as part of registration.
    pub fn new(id: u32, profile: CustomerProfile, join_date: NaiveDate) -> Self {
        Customer {
            id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            mobile: profile.mobile,
            address: profile.address,
            identification_no: profile.identification_no,
            tier: String::new(),
            earned_points: 0,
            redeemed_points: 0,
            available_points: 0,
            join_date,
        }
    }

    /// Applies a point movement from one committed transaction.
    ///
    /// Increments the lifetime counters and recomputes `available_points`
    /// from the invariant. The caller must have verified that
    /// `redeemed_delta <= available_points` before calling; this method
    /// never fails.
    pub fn apply_points(&mut self, earned_delta: u64, redeemed_delta: u64) {
        debug_assert!(redeemed_delta <= self.available_points);

        self.earned_points += earned_delta;
        self.redeemed_points += redeemed_delta;
        self.available_points = self.earned_points - self.redeemed_points;
    }

    /// Replaces the identity fields, leaving points and tier untouched.
    pub fn apply_profile(&mut self, profile: CustomerProfile) {
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.email = profile.email;
        self.mobile = profile.mobile;
        self.address = profile.address;
        self.identification_no = profile.identification_no;
    }

    /// Verifies the invariant: `available_points == earned_points - redeemed_points`.
    ///
    /// Cheap pure predicate, available in all build profiles so callers
    /// can assert it from `debug_assert!` without gating.
    pub fn check_invariant(&self) -> bool {
        self.redeemed_points <= self.earned_points
            && self.available_points == self.earned_points - self.redeemed_points
    }
}
