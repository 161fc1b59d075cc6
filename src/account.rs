//! Account model and balance/limit rules.
//!
//! Maintains the invariant: `balance >= -withdrawal_limit` after every withdrawal.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Unique account identifier, assigned sequentially and never reused.
pub type AccountId = u32;

/// Baseline withdrawal limit for retiree accounts.
pub const RETIREE_LIMIT: i64 = 10_000;

/// Baseline withdrawal limit for standard accounts.
pub const STANDARD_LIMIT: i64 = 20_000;

/// A user account.
///
/// # Invariants
///
/// - `balance >= -withdrawal_limit` holds after every withdrawal
/// - `withdrawal_limit` never decreases once assigned
///
/// # Negative Balance
///
/// The `balance` field may go negative: this is a credit/overdraft style
/// account, and the withdrawal limit bounds how far below zero it may reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,

    /// Account holder name, unique across all accounts (exact match).
    pub name: String,

    /// Whether the holder is a retiree. Fixed at creation and determines
    /// the baseline withdrawal limit.
    pub retiree: bool,

    /// Current balance. May be negative down to `-withdrawal_limit`.
    pub balance: Money,

    /// Maximum magnitude of negative balance this account may reach.
    pub withdrawal_limit: Money,
}

impl Account {
    /// Creates a new account with zero balance and the baseline limit
    /// for the given retiree status.
    pub fn new(id: AccountId, name: impl Into<String>, retiree: bool) -> Self {
        Account {
            id,
            name: name.into(),
            retiree,
            balance: Money::ZERO,
            withdrawal_limit: Self::baseline_limit(retiree),
        }
    }

    /// Returns the baseline withdrawal limit for the given retiree status.
    pub fn baseline_limit(retiree: bool) -> Money {
        if retiree {
            Money::from_major(RETIREE_LIMIT)
        } else {
            Money::from_major(STANDARD_LIMIT)
        }
    }

    /// Deposits funds into the account, increasing the balance.
    pub fn deposit(&mut self, amount: Money) {
        self.balance += amount;
    }

    /// Withdraws funds from the account.
    ///
    /// Returns `true` if the withdrawal succeeded, `false` if it would
    /// push the balance below `-withdrawal_limit`. On failure the balance
    /// is unchanged.
    pub fn withdraw(&mut self, amount: Money) -> bool {
        if self.balance - amount < -self.withdrawal_limit {
            return false;
        }

        self.balance -= amount;
        true
    }

    /// Raises the withdrawal limit to `new_limit`.
    ///
    /// Limits never decrease: returns `true` only if the limit actually
    /// changed, `false` when `new_limit` is not above the current limit.
    pub fn raise_limit(&mut self, new_limit: Money) -> bool {
        if new_limit <= self.withdrawal_limit {
            return false;
        }

        self.withdrawal_limit = new_limit;
        true
    }

    /// Returns `true` if the limit has been raised above this account's
    /// baseline (the pre-approved credit signal).
    pub fn has_upgraded_limit(&self) -> bool {
        self.withdrawal_limit > Self::baseline_limit(self.retiree)
    }

    /// Verifies the invariant: `balance >= -withdrawal_limit`.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        self.balance >= -self.withdrawal_limit
    }
}
