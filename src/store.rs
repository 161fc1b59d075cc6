//! Snapshot persistence for the ledger.
//!
//! The engine treats persistence as a single atomic snapshot swap: load
//! once at startup, save after every state-mutating operation. Absence of
//! prior state is the bootstrap case, not an error.

use crate::account::Account;
use crate::error::Result;
use crate::transaction::Transaction;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistence provider contract.
///
/// Implementations must round-trip exactly: a `save` followed by a `load`
/// reproduces both collections field-for-field, with transaction order
/// preserved.
pub trait SnapshotStore {
    /// Loads the persisted state, or `None` when no prior state exists.
    fn load(&self) -> Result<Option<(Vec<Account>, Vec<Transaction>)>>;

    /// Persists the full state, replacing any previous snapshot.
    fn save(&self, accounts: &[Account], transactions: &[Transaction]) -> Result<()>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn load(&self) -> Result<Option<(Vec<Account>, Vec<Transaction>)>> {
        (**self).load()
    }

    fn save(&self, accounts: &[Account], transactions: &[Transaction]) -> Result<()> {
        (**self).save(accounts, transactions)
    }
}

/// Serialized snapshot layout: two named collections in one document.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    accounts: &'a [Account],
    transactions: &'a [Transaction],
}

#[derive(Deserialize)]
struct SnapshotOwned {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

/// File-backed store holding the snapshot as a single JSON document.
///
/// Saves are atomic: the document is written to a sibling temp file and
/// renamed over the target, so a failed write never leaves a corrupt
/// half-written snapshot behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given file path. The file does not
    /// need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<(Vec<Account>, Vec<Transaction>)>> {
        if !self.path.exists() {
            debug!("No snapshot at {}, starting empty", self.path.display());
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let snapshot: SnapshotOwned = serde_json::from_str(&json)?;
        debug!(
            "Loaded {} accounts and {} transactions from {}",
            snapshot.accounts.len(),
            snapshot.transactions.len(),
            self.path.display()
        );
        Ok(Some((snapshot.accounts, snapshot.transactions)))
    }

    fn save(&self, accounts: &[Account], transactions: &[Transaction]) -> Result<()> {
        let snapshot = SnapshotRef {
            accounts,
            transactions,
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        debug!(
            "Saved {} accounts and {} transactions to {}",
            accounts.len(),
            transactions.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-process store for tests and embedding. Keeps the latest snapshot in
/// memory with the same swap semantics as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<Option<(Vec<Account>, Vec<Transaction>)>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<(Vec<Account>, Vec<Transaction>)>> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, accounts: &[Account], transactions: &[Transaction]) -> Result<()> {
        *self.snapshot.borrow_mut() = Some((accounts.to_vec(), transactions.to_vec()));
        Ok(())
    }
}
