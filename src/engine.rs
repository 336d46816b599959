//! Core loyalty transaction processor.
//!
//! Orchestrates one atomic unit of work per purchase: points structure
//! lookup, earned-points computation, transaction persistence, customer
//! account update, ledger append and tier re-resolution. The engine is
//! the only writer of customer point and tier fields.

use crate::error::{LoyaltyError, Result};
use crate::ledger::{LoyaltyEvent, PointsStatus};
use crate::points::earned_points;
use crate::store::LoyaltyStore;
use crate::tier::resolve_tier;
use crate::transaction::{
    generate_invoice_id, PurchaseRecord, PurchaseRequest, Receipt, Transaction,
};
use chrono::Utc;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::{Read, Write};

/// The loyalty processing engine.
///
/// Owns an injected [`LoyaltyStore`]; share the engine via `Arc` to serve
/// concurrent callers. Every `record_purchase` call runs its whole
/// sequence while holding the store guard, so the redemption-sufficiency
/// check is always evaluated against the latest balance and a failed call
/// leaves no partial state behind.
pub struct LoyaltyEngine {
    store: LoyaltyStore,
}

impl LoyaltyEngine {
    pub fn new(store: LoyaltyStore) -> Self {
        LoyaltyEngine { store }
    }

    /// The underlying store, for setup and lookups.
    pub fn store(&self) -> &LoyaltyStore {
        &self.store
    }

    /// Records one purchase: persists the transaction and its line items,
    /// moves the customer's points, appends ledger events and updates the
    /// cached tier if it changed.
    ///
    /// All-or-nothing: every fallible step (validation, structure lookup)
    /// runs before the first write, and the writes themselves are
    /// infallible map and vec inserts performed under the store guard.
    ///
    /// A request carrying an `idempotency_key` already seen replays the
    /// original receipt without charging points again.
    pub fn record_purchase(&self, request: PurchaseRequest) -> Result<Receipt> {
        validate_request(&request)?;

        let mut guard = self.store.state()?;
        let state = &mut *guard;

        if let Some(key) = &request.idempotency_key {
            if let Some(receipt) = state.receipts.get(key) {
                debug!(
                    "Replaying receipt {} for idempotency key {}",
                    receipt.invoice_id, key
                );
                return Ok(receipt.clone());
            }
        }

        if state.tiers.is_empty() {
            return Err(LoyaltyError::NoTiersConfigured);
        }

        let structure = state
            .current_structure()
            .cloned()
            .ok_or(LoyaltyError::PointsNotConfigured)?;

        let customer = state
            .customers
            .get_mut(&request.customer_id)
            .ok_or(LoyaltyError::CustomerNotFound(request.customer_id))?;

        // Sufficiency is checked here, under the guard, against the
        // latest balance; concurrent redemptions cannot both pass on
        // stale reads.
        if request.points_to_redeem > customer.available_points {
            return Err(LoyaltyError::InsufficientPoints {
                requested: request.points_to_redeem,
                available: customer.available_points,
            });
        }

        let points_earned = earned_points(request.total_amount, &structure);

        // No fallible step past this point.

        let mut invoice_id = generate_invoice_id();
        while state.transactions.contains_key(&invoice_id) {
            invoice_id = generate_invoice_id();
        }

        state.transactions.insert(
            invoice_id.clone(),
            Transaction {
                invoice_id: invoice_id.clone(),
                customer_id: request.customer_id,
                total_amount: request.total_amount,
                points_earned,
                points_redeemed: request.points_to_redeem,
                invoice_date: Utc::now(),
                items: request.items.clone(),
            },
        );

        customer.apply_points(points_earned, request.points_to_redeem);
        debug_assert!(customer.check_invariant());

        if points_earned > 0 {
            state.ledger.push(LoyaltyEvent::new(
                request.customer_id,
                &invoice_id,
                PointsStatus::Earned,
                points_earned,
            ));
        }
        if request.points_to_redeem > 0 {
            state.ledger.push(LoyaltyEvent::new(
                request.customer_id,
                &invoice_id,
                PointsStatus::Redeemed,
                request.points_to_redeem,
            ));
        }

        // Re-resolve from the updated balance; write only on change.
        // Safety: tier table checked non-empty above, under this guard
        let new_tier = resolve_tier(customer.available_points, &state.tiers)
            .expect("tier table is non-empty")
            .name
            .clone();
        if customer.tier != new_tier {
            debug!(
                "Customer {} tier {} -> {}",
                customer.id, customer.tier, new_tier
            );
            customer.tier = new_tier.clone();
        }

        debug!(
            "Committed {}: customer {} earned {} redeemed {} (available {})",
            invoice_id,
            request.customer_id,
            points_earned,
            request.points_to_redeem,
            customer.available_points
        );

        let receipt = Receipt {
            invoice_id,
            points_earned,
            points_redeemed: request.points_to_redeem,
            new_tier,
        };

        if let Some(key) = request.idempotency_key {
            state.receipts.insert(key, receipt.clone());
        }

        Ok(receipt)
    }

    /// Processes purchases from a CSV reader in streaming fashion.
    ///
    /// Records are read one at a time. Invalid rows and rejected purchases
    /// are logged at warn level and skipped; the batch keeps going.
    pub fn process_csv<R: Read>(&self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<PurchaseRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Some(request) = record.parse() {
                        if let Err(e) = self.record_purchase(request) {
                            warn!("Row {}: {}", row_num, e);
                        }
                    } else {
                        warn!("Row {}: Failed to parse purchase record", row_num);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Writes final customer point states to CSV.
    ///
    /// Output is sorted by customer id for deterministic results.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["customer", "earned", "redeemed", "available", "tier"])?;

        for customer in self.store.customers()? {
            csv_writer.write_record([
                customer.id.to_string(),
                customer.earned_points.to_string(),
                customer.redeemed_points.to_string(),
                customer.available_points.to_string(),
                customer.tier,
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Shape validation performed before any lock or write.
fn validate_request(request: &PurchaseRequest) -> Result<()> {
    if request.items.is_empty() {
        return Err(LoyaltyError::Validation(
            "a purchase needs at least one line item".into(),
        ));
    }
    if request.total_amount.is_negative() {
        return Err(LoyaltyError::Validation(
            "total amount must not be negative".into(),
        ));
    }
    for item in &request.items {
        if item.product_name.trim().is_empty() {
            return Err(LoyaltyError::Validation("product name is required".into()));
        }
        if item.quantity == 0 {
            return Err(LoyaltyError::Validation(
                "line item quantity must be positive".into(),
            ));
        }
        if item.amount.is_negative() || item.discount.is_negative() {
            return Err(LoyaltyError::Validation(
                "line item amounts must not be negative".into(),
            ));
        }
    }
    Ok(())
}
