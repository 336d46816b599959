//! # Loyalty Engine
//!
//! A loyalty programme engine: customers accrue and redeem points on
//! purchases, are assigned to tiers by point thresholds, and can be
//! grouped into snapshotted marketing segments.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: monetary values use 2 decimal places via `rust_decimal`
//! - **Strict invariants**: `available_points == earned_points - redeemed_points` always
//! - **Atomic purchases**: each purchase commits fully or leaves no trace
//! - **Explicit wiring**: the store is injected, never ambient
//!
//! ## Example
//!
//! ```no_run
//! use loyalty_engine::{LoyaltyEngine, LoyaltyStore, Seed};
//! use std::fs::File;
//!
//! let store = LoyaltyStore::new();
//! let seed = Seed::from_reader(File::open("seed.json").unwrap()).unwrap();
//! seed.apply(&store).unwrap();
//!
//! let engine = LoyaltyEngine::new(store);
//! engine.process_csv(File::open("transactions.csv").unwrap()).unwrap();
//! engine.write_output(std::io::stdout()).unwrap();
//! ```

pub mod customer;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod money;
pub mod points;
pub mod seed;
pub mod segment;
pub mod store;
pub mod tier;
pub mod transaction;

pub use customer::{Customer, CustomerProfile};
pub use engine::LoyaltyEngine;
pub use error::{LoyaltyError, Result};
pub use ledger::{LoyaltyEvent, PointsStatus};
pub use money::Money;
pub use points::{earned_points, PointsStructure};
pub use seed::Seed;
pub use segment::{Segment, SegmentCriteria};
pub use store::LoyaltyStore;
pub use tier::{next_tier, points_to_next_tier, resolve_tier, Tier};
pub use transaction::{LineItem, PurchaseRecord, PurchaseRequest, Receipt, Transaction};
