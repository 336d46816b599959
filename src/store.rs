//! In-process loyalty store: the repository injected into the engine.
//!
//! All entity collections live behind a single mutex, so any sequence of
//! reads and writes performed while holding the guard is atomic with
//! respect to every other caller. The transaction processor relies on this
//! for its redemption-sufficiency check; see `engine::LoyaltyEngine`.
//!
//! The store is an explicit value handed to its users. There is no ambient
//! pool or module-level state.

use crate::customer::{Customer, CustomerProfile};
use crate::error::{LoyaltyError, Result};
use crate::ledger::LoyaltyEvent;
use crate::money::Money;
use crate::points::PointsStructure;
use crate::segment::{Segment, SegmentCriteria};
use crate::tier::{resolve_tier, Tier};
use crate::transaction::{Receipt, Transaction};
use chrono::{NaiveDate, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Everything the store owns. Guarded by the mutex in [`LoyaltyStore`].
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) customers: HashMap<u32, Customer>,

    /// Tier table, sorted by threshold ascending with distinct thresholds.
    pub(crate) tiers: Vec<Tier>,

    /// Append-only points structure history; the last row is current.
    pub(crate) structures: Vec<PointsStructure>,

    /// Committed transactions by invoice id.
    pub(crate) transactions: HashMap<String, Transaction>,

    /// Append-only loyalty history.
    pub(crate) ledger: Vec<LoyaltyEvent>,

    pub(crate) segments: HashMap<u32, Segment>,

    /// Receipts by idempotency key, for replay detection.
    pub(crate) receipts: HashMap<String, Receipt>,

    next_customer_id: u32,
    next_segment_id: u32,
}

impl StoreState {
    pub(crate) fn current_structure(&self) -> Option<&PointsStructure> {
        self.structures.last()
    }

    /// Returns a description of the first uniqueness conflict between the
    /// profile and existing customers, skipping `exclude` (for self-edits).
    fn uniqueness_conflict(&self, profile: &CustomerProfile, exclude: Option<u32>) -> Option<String> {
        for customer in self.customers.values() {
            if Some(customer.id) == exclude {
                continue;
            }
            if customer.email == profile.email {
                return Some(format!("email {} already registered", profile.email));
            }
            if customer.mobile == profile.mobile {
                return Some(format!("mobile {} already registered", profile.mobile));
            }
            if customer.identification_no == profile.identification_no {
                return Some(format!(
                    "identification number {} already registered",
                    profile.identification_no
                ));
            }
        }
        None
    }
}

/// The loyalty data store.
///
/// Cheap to share via `Arc`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct LoyaltyStore {
    state: Mutex<StoreState>,
}

fn validate_profile(profile: &CustomerProfile) -> Result<()> {
    if profile.first_name.trim().is_empty() {
        return Err(LoyaltyError::Validation("first name is required".into()));
    }
    if profile.email.trim().is_empty() || !profile.email.contains('@') {
        return Err(LoyaltyError::Validation("a valid email is required".into()));
    }
    if profile.mobile.trim().is_empty() {
        return Err(LoyaltyError::Validation("mobile number is required".into()));
    }
    if profile.identification_no.trim().is_empty() {
        return Err(LoyaltyError::Validation(
            "identification number is required".into(),
        ));
    }
    Ok(())
}

impl LoyaltyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the state guard, surfacing poisoning as a storage error.
    pub(crate) fn state(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| LoyaltyError::Storage("store mutex poisoned".into()))
    }

    // ---- customers ----

    /// Registers a new customer with zero balances.
    ///
    /// Enforces global uniqueness of email, mobile and identification
    /// number. The initial tier is resolved from the current tier table
    /// when one is configured.
    pub fn register_customer(
        &self,
        profile: CustomerProfile,
        join_date: NaiveDate,
    ) -> Result<Customer> {
        validate_profile(&profile)?;

        let mut state = self.state()?;
        if let Some(conflict) = state.uniqueness_conflict(&profile, None) {
            return Err(LoyaltyError::Validation(conflict));
        }

        state.next_customer_id += 1;
        let id = state.next_customer_id;

        let mut customer = Customer::new(id, profile, join_date);
        if let Some(tier) = resolve_tier(0, &state.tiers) {
            customer.tier = tier.name.clone();
        }

        debug!("Registered customer {} ({})", id, customer.email);
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    /// Registers a seeded customer carrying starting balances. Bootstrap
    /// only; runtime point movements go through the engine.
    pub(crate) fn register_seeded(
        &self,
        profile: CustomerProfile,
        join_date: NaiveDate,
        earned_points: u64,
        redeemed_points: u64,
    ) -> Result<Customer> {
        if redeemed_points > earned_points {
            return Err(LoyaltyError::Validation(
                "seeded redeemed points exceed earned points".into(),
            ));
        }

        let customer = self.register_customer(profile, join_date)?;

        let mut guard = self.state()?;
        let state = &mut *guard;
        let entry = state
            .customers
            .get_mut(&customer.id)
            .ok_or(LoyaltyError::CustomerNotFound(customer.id))?;
        entry.earned_points = earned_points;
        entry.redeemed_points = redeemed_points;
        entry.available_points = earned_points - redeemed_points;
        if let Some(tier) = resolve_tier(entry.available_points, &state.tiers) {
            entry.tier = tier.name.clone();
        }
        Ok(entry.clone())
    }

    pub fn customer(&self, id: u32) -> Result<Customer> {
        self.state()?
            .customers
            .get(&id)
            .cloned()
            .ok_or(LoyaltyError::CustomerNotFound(id))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        Ok(self
            .state()?
            .customers
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    pub fn find_by_mobile(&self, mobile: &str) -> Result<Option<Customer>> {
        Ok(self
            .state()?
            .customers
            .values()
            .find(|c| c.mobile == mobile)
            .cloned())
    }

    pub fn find_by_identification(&self, identification_no: &str) -> Result<Option<Customer>> {
        Ok(self
            .state()?
            .customers
            .values()
            .find(|c| c.identification_no == identification_no)
            .cloned())
    }

    /// Replaces a customer's identity fields. Points and tier are untouched.
    pub fn update_profile(&self, id: u32, profile: CustomerProfile) -> Result<Customer> {
        validate_profile(&profile)?;

        let mut state = self.state()?;
        if !state.customers.contains_key(&id) {
            return Err(LoyaltyError::CustomerNotFound(id));
        }
        if let Some(conflict) = state.uniqueness_conflict(&profile, Some(id)) {
            return Err(LoyaltyError::Validation(conflict));
        }

        let customer = state
            .customers
            .get_mut(&id)
            .ok_or(LoyaltyError::CustomerNotFound(id))?;
        customer.apply_profile(profile);
        Ok(customer.clone())
    }

    /// Deletes a customer and cascades to their transactions, history and
    /// segment memberships. Explicit admin action only.
    pub fn delete_customer(&self, id: u32) -> Result<()> {
        let mut guard = self.state()?;
        let state = &mut *guard;
        if state.customers.remove(&id).is_none() {
            return Err(LoyaltyError::CustomerNotFound(id));
        }

        // Receipts must go before the transactions that map their
        // invoice ids to this customer; a surviving receipt would let a
        // replayed idempotency key resurrect a deleted invoice.
        let transactions = &state.transactions;
        state.receipts.retain(|_, receipt| {
            transactions
                .get(&receipt.invoice_id)
                .map_or(true, |tx| tx.customer_id != id)
        });

        state.transactions.retain(|_, tx| tx.customer_id != id);
        state.ledger.retain(|event| event.customer_id != id);
        for segment in state.segments.values_mut() {
            segment.members.retain(|&member| member != id);
        }

        debug!("Deleted customer {} and cascaded history", id);
        Ok(())
    }

    /// All customers, sorted by id for deterministic output.
    pub fn customers(&self) -> Result<Vec<Customer>> {
        let state = self.state()?;
        let mut customers: Vec<_> = state.customers.values().cloned().collect();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }

    // ---- tiers ----

    /// Replaces the tier table.
    ///
    /// Requires a non-empty table with distinct thresholds and discounts
    /// within 0..=100. Stored sorted by threshold ascending so the resolver
    /// never depends on input order.
    pub fn set_tiers(&self, mut tiers: Vec<Tier>) -> Result<()> {
        if tiers.is_empty() {
            return Err(LoyaltyError::NoTiersConfigured);
        }
        for tier in &tiers {
            if tier.discount_percent > 100 {
                return Err(LoyaltyError::Validation(format!(
                    "tier {} discount must be within 0..=100",
                    tier.name
                )));
            }
            if tier.name.trim().is_empty() {
                return Err(LoyaltyError::Validation("tier name is required".into()));
            }
        }

        tiers.sort_by_key(|t| t.threshold);
        if tiers.windows(2).any(|pair| pair[0].threshold == pair[1].threshold) {
            return Err(LoyaltyError::Validation(
                "tier thresholds must be distinct".into(),
            ));
        }

        self.state()?.tiers = tiers;
        Ok(())
    }

    pub fn tiers(&self) -> Result<Vec<Tier>> {
        Ok(self.state()?.tiers.clone())
    }

    // ---- points structure ----

    /// Appends a new points structure row, superseding the current one.
    pub fn configure_points(&self, spend_amount: Money, points_awarded: u64) -> Result<()> {
        if spend_amount <= Money::ZERO {
            return Err(LoyaltyError::Validation(
                "spend amount must be positive".into(),
            ));
        }
        if points_awarded == 0 {
            return Err(LoyaltyError::Validation(
                "points awarded must be positive".into(),
            ));
        }

        self.state()?.structures.push(PointsStructure {
            spend_amount,
            points_awarded,
            created_at: Utc::now(),
        });
        Ok(())
    }

    /// The most recently configured structure.
    pub fn current_structure(&self) -> Result<PointsStructure> {
        self.state()?
            .current_structure()
            .cloned()
            .ok_or(LoyaltyError::PointsNotConfigured)
    }

    // ---- transactions & ledger ----

    pub fn transaction(&self, invoice_id: &str) -> Result<Option<Transaction>> {
        Ok(self.state()?.transactions.get(invoice_id).cloned())
    }

    /// A customer's transactions, most recent first.
    pub fn transactions_for(&self, customer_id: u32) -> Result<Vec<Transaction>> {
        let state = self.state()?;
        let mut transactions: Vec<_> = state
            .transactions
            .values()
            .filter(|tx| tx.customer_id == customer_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.invoice_date.cmp(&a.invoice_date));
        Ok(transactions)
    }

    /// A customer's loyalty history in insertion order.
    pub fn history_for(&self, customer_id: u32) -> Result<Vec<LoyaltyEvent>> {
        Ok(self
            .state()?
            .ledger
            .iter()
            .filter(|event| event.customer_id == customer_id)
            .cloned()
            .collect())
    }

    // ---- segments ----

    /// Creates a segment, snapshotting the customers that match its
    /// criteria right now. Membership does not track later changes.
    pub fn create_segment(
        &self,
        name: &str,
        criteria: SegmentCriteria,
        created_by: &str,
    ) -> Result<Segment> {
        if name.trim().is_empty() {
            return Err(LoyaltyError::Validation("segment name is required".into()));
        }

        let mut state = self.state()?;
        state.next_segment_id += 1;
        let id = state.next_segment_id;

        let mut members: Vec<u32> = state
            .customers
            .values()
            .filter(|c| criteria.matches(c))
            .map(|c| c.id)
            .collect();
        members.sort_unstable();

        let segment = Segment {
            id,
            name: name.to_string(),
            criteria,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            members,
        };

        debug!(
            "Created segment {} ({}) with {} members",
            id,
            segment.name,
            segment.member_count()
        );
        state.segments.insert(id, segment.clone());
        Ok(segment)
    }

    /// Renames a segment and/or replaces its criteria, re-snapshotting
    /// membership against the current customer base.
    pub fn update_segment(
        &self,
        id: u32,
        name: &str,
        criteria: SegmentCriteria,
    ) -> Result<Segment> {
        if name.trim().is_empty() {
            return Err(LoyaltyError::Validation("segment name is required".into()));
        }

        let mut state = self.state()?;
        if !state.segments.contains_key(&id) {
            return Err(LoyaltyError::SegmentNotFound(id));
        }

        let mut members: Vec<u32> = state
            .customers
            .values()
            .filter(|c| criteria.matches(c))
            .map(|c| c.id)
            .collect();
        members.sort_unstable();

        let segment = state
            .segments
            .get_mut(&id)
            .ok_or(LoyaltyError::SegmentNotFound(id))?;
        segment.name = name.to_string();
        segment.criteria = criteria;
        segment.members = members;
        Ok(segment.clone())
    }

    pub fn delete_segment(&self, id: u32) -> Result<()> {
        if self.state()?.segments.remove(&id).is_none() {
            return Err(LoyaltyError::SegmentNotFound(id));
        }
        Ok(())
    }

    pub fn segment(&self, id: u32) -> Result<Segment> {
        self.state()?
            .segments
            .get(&id)
            .cloned()
            .ok_or(LoyaltyError::SegmentNotFound(id))
    }

    /// All segments, sorted by id.
    pub fn segments(&self) -> Result<Vec<Segment>> {
        let state = self.state()?;
        let mut segments: Vec<_> = state.segments.values().cloned().collect();
        segments.sort_by_key(|s| s.id);
        Ok(segments)
    }
}
