//! Error types for the teller engine.

use crate::money::Money;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, TellerError>;

/// Errors that can occur during engine operation.
///
/// Domain errors are recoverable outcomes the presentation layer renders
/// and lets the user retry; the I/O and JSON variants are storage failures
/// fatal to the current operation.
#[derive(Error, Debug)]
pub enum TellerError {
    /// Account creation with a name that is already taken
    #[error("An account named \"{name}\" already exists")]
    DuplicateName { name: String },

    /// Login or lookup with an unknown account name
    #[error("No account named \"{name}\"")]
    AccountNotFound { name: String },

    /// Withdrawal that would push the balance below the allowed limit
    #[error(
        "Withdrawal of {requested} not permitted: balance {balance} with withdrawal limit {limit}"
    )]
    InsufficientLimit {
        requested: Money,
        balance: Money,
        limit: Money,
    },

    /// Deposit or withdrawal amount that is not strictly positive
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Money },

    /// Failed to read or write the persisted snapshot
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization or deserialization error
    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TellerError {
    /// Returns `true` for storage failures that abort the current
    /// operation, as opposed to domain outcomes the user can retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TellerError::Io(_) | TellerError::Json(_))
    }
}
