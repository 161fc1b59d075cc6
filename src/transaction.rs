//! Immutable transaction log records.
//!
//! Transactions are append-only: once posted they are never updated or
//! deleted, and their insertion order doubles as chronological order.

use crate::account::AccountId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction type variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxKind {
    /// Funds credited to an account.
    Deposit,

    /// Funds debited from an account.
    Withdrawal,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Deposit => write!(f, "DEPOSIT"),
            TxKind::Withdrawal => write!(f, "WITHDRAWAL"),
        }
    }
}

/// A posted transaction.
///
/// The stored `amount` is signed and already carries the balance effect:
/// positive for deposits, negative for withdrawals. `account_id` is a
/// lookup key into the account collection, not an object reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// When the transaction was posted.
    pub timestamp: DateTime<Utc>,

    /// Terminal that posted the transaction. Constant in single-terminal
    /// operation but modeled as data.
    pub terminal: String,

    /// Signed balance effect: positive for deposits, negative for withdrawals.
    pub amount: Money,

    /// Owning account.
    pub account_id: AccountId,

    /// Transaction type.
    pub kind: TxKind,
}

impl Transaction {
    /// Creates a deposit record with a positive stored amount.
    pub fn deposit(
        account_id: AccountId,
        amount: Money,
        terminal: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Transaction {
            timestamp,
            terminal: terminal.into(),
            amount,
            account_id,
            kind: TxKind::Deposit,
        }
    }

    /// Creates a withdrawal record, negating `amount` so the stored value
    /// carries the balance effect.
    pub fn withdrawal(
        account_id: AccountId,
        amount: Money,
        terminal: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Transaction {
            timestamp,
            terminal: terminal.into(),
            amount: -amount,
            account_id,
            kind: TxKind::Withdrawal,
        }
    }
}
