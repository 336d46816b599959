//! Error types for the loyalty engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, LoyaltyError>;

/// Errors that can occur during engine operation.
///
/// Every error raised inside `record_purchase` leaves the store untouched:
/// validation happens before the first write, and writes are infallible
/// once validation has passed.
#[derive(Error, Debug)]
pub enum LoyaltyError {
    /// Malformed input, rejected before any write
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unknown customer ID
    #[error("customer {0} not found")]
    CustomerNotFound(u32),

    /// Unknown segment ID
    #[error("segment {0} not found")]
    SegmentNotFound(u32),

    /// Redemption exceeds the customer's available balance.
    /// Carries the actual balance so the caller can display or retry.
    #[error("insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u64, available: u64 },

    /// No points structure has been configured; earning cannot proceed
    #[error("no points structure configured")]
    PointsNotConfigured,

    /// The tier table is empty; tier resolution cannot proceed
    #[error("no loyalty tiers configured")]
    NoTiersConfigured,

    /// Storage-layer failure during the atomic sequence
    #[error("storage error: {0}")]
    Storage(String),

    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Seed file parsing error
    #[error("seed parsing error: {0}")]
    Seed(#[from] serde_json::Error),

    /// Missing CLI arguments
    #[error("Missing arguments. Usage: loyalty-engine <seed.json> <transactions.csv>")]
    MissingArguments,
}
