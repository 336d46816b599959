//! Programme setup loaded from a JSON seed file.
//!
//! The seed carries the points structure, the tier table and the initial
//! customer base, and is applied to an explicitly provided store. Seeded
//! customers may carry starting balances for scenario setup.

use crate::customer::CustomerProfile;
use crate::error::Result;
use crate::money::Money;
use crate::store::LoyaltyStore;
use crate::tier::Tier;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
pub struct SeedStructure {
    pub spend_amount: Money,
    pub points_awarded: u64,
}

#[derive(Debug, Deserialize)]
pub struct SeedCustomer {
    #[serde(flatten)]
    pub profile: CustomerProfile,

    pub join_date: NaiveDate,

    #[serde(default)]
    pub earned_points: u64,

    #[serde(default)]
    pub redeemed_points: u64,
}

/// Full programme setup.
#[derive(Debug, Deserialize)]
pub struct Seed {
    pub points_structure: SeedStructure,
    pub tiers: Vec<Tier>,

    #[serde(default)]
    pub customers: Vec<SeedCustomer>,
}

impl Seed {
    /// Parses a seed from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Applies the seed to a store: tiers first (so registration can
    /// resolve initial tiers), then the points structure, then customers
    /// in file order. Customer ids are assigned sequentially from 1.
    pub fn apply(self, store: &LoyaltyStore) -> Result<()> {
        store.set_tiers(self.tiers)?;
        store.configure_points(
            self.points_structure.spend_amount,
            self.points_structure.points_awarded,
        )?;

        for customer in self.customers {
            store.register_seeded(
                customer.profile,
                customer.join_date,
                customer.earned_points,
                customer.redeemed_points,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SEED: &str = r#"{
        "points_structure": { "spend_amount": "10.00", "points_awarded": 1 },
        "tiers": [
            { "id": 1, "name": "Purple", "threshold": 0, "discount_percent": 0 },
            { "id": 2, "name": "Gold", "threshold": 100, "discount_percent": 5 }
        ],
        "customers": [
            {
                "first_name": "Amara",
                "last_name": "Perera",
                "email": "amara@example.com",
                "mobile": "0700000001",
                "address": "1 Example Street",
                "identification_no": "ID000001",
                "join_date": "2024-01-15",
                "earned_points": 120,
                "redeemed_points": 20
            }
        ]
    }"#;

    #[test]
    fn test_seed_applies_structure_tiers_and_customers() {
        let store = LoyaltyStore::new();
        let seed = Seed::from_reader(Cursor::new(SEED)).unwrap();
        seed.apply(&store).unwrap();

        let structure = store.current_structure().unwrap();
        assert_eq!(structure.spend_amount.to_string(), "10.00");
        assert_eq!(structure.points_awarded, 1);

        assert_eq!(store.tiers().unwrap().len(), 2);

        let customer = store.customer(1).unwrap();
        assert_eq!(customer.email, "amara@example.com");
        assert_eq!(customer.earned_points, 120);
        assert_eq!(customer.redeemed_points, 20);
        assert_eq!(customer.available_points, 100);
        // Starting balance already clears the Gold threshold
        assert_eq!(customer.tier, "Gold");
    }

    #[test]
    fn test_seed_without_customers() {
        let store = LoyaltyStore::new();
        let seed: Seed = Seed::from_reader(Cursor::new(
            r#"{
                "points_structure": { "spend_amount": "5.00", "points_awarded": 2 },
                "tiers": [
                    { "id": 1, "name": "Base", "threshold": 0, "discount_percent": 0 }
                ]
            }"#,
        ))
        .unwrap();
        seed.apply(&store).unwrap();
        assert!(store.customers().unwrap().is_empty());
    }

    #[test]
    fn test_seed_rejects_invalid_json() {
        assert!(Seed::from_reader(Cursor::new("{ not json")).is_err());
    }

    #[test]
    fn test_seed_rejects_overdrawn_balances() {
        let store = LoyaltyStore::new();
        let seed = Seed::from_reader(Cursor::new(
            r#"{
                "points_structure": { "spend_amount": "10.00", "points_awarded": 1 },
                "tiers": [
                    { "id": 1, "name": "Base", "threshold": 0, "discount_percent": 0 }
                ],
                "customers": [
                    {
                        "first_name": "Amara",
                        "last_name": "Perera",
                        "email": "amara@example.com",
                        "mobile": "0700000001",
                        "address": "",
                        "identification_no": "ID000001",
                        "join_date": "2024-01-15",
                        "earned_points": 10,
                        "redeemed_points": 20
                    }
                ]
            }"#,
        ))
        .unwrap();

        assert!(seed.apply(&store).is_err());
    }
}
