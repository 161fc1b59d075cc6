//! In-memory ledger store.
//!
//! Exclusive owner of the account collection and the append-only
//! transaction log. Lookups are linear scans, which is fine at
//! single-terminal scale.

use crate::account::{Account, AccountId};
use crate::transaction::Transaction;

/// The combined account and transaction state of the system.
///
/// Accounts are created once and never deleted; transactions are appended
/// and never mutated. The next account id is recomputed from the restored
/// records rather than kept as global state, so ids stay monotonic across
/// process restarts.
#[derive(Debug)]
pub struct Ledger {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    next_account_id: AccountId,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Creates an empty ledger (the bootstrap case).
    pub fn new() -> Self {
        Ledger {
            accounts: Vec::new(),
            transactions: Vec::new(),
            next_account_id: 1,
        }
    }

    /// Restores a ledger from persisted collections.
    ///
    /// The id sequence resumes at `max(existing ids) + 1`.
    pub fn restore(accounts: Vec<Account>, transactions: Vec<Transaction>) -> Self {
        let next_account_id = accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        Ledger {
            accounts,
            transactions,
            next_account_id,
        }
    }

    /// All accounts, in creation order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The full transaction log, in posting order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Inserts a new account under the next sequential id and returns a
    /// reference to it. The caller is responsible for the name uniqueness
    /// check.
    pub fn insert_account(&mut self, name: impl Into<String>, retiree: bool) -> &Account {
        let account = Account::new(self.next_account_id, name, retiree);
        self.next_account_id += 1;
        self.accounts.push(account);
        // Safety: pushed one element above
        self.accounts.last().expect("account just inserted")
    }

    /// Exact-match lookup by account name.
    pub fn find_by_name(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    /// Mutable exact-match lookup by account name.
    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.name == name)
    }

    /// Lookup by account id.
    pub fn account_by_id(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Mutable access to one account together with a read view of the
    /// full log, for evaluations that update the account based on its
    /// transaction history.
    pub fn account_and_log_mut(&mut self, id: AccountId) -> Option<(&mut Account, &[Transaction])> {
        let account = self.accounts.iter_mut().find(|a| a.id == id)?;
        Some((account, &self.transactions))
    }

    /// Appends a transaction to the log.
    pub fn append_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// All transactions of one account, in original posting order.
    pub fn history(&self, account_id: AccountId) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.account_id == account_id)
    }
}
