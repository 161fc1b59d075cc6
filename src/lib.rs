//! # Teller Engine
//!
//! A single-terminal ledger engine for a teller machine: persistent user
//! accounts, an append-only transaction log, per-account withdrawal
//! limits, and automatic "pre-approved credit" limit upgrades driven by
//! recent deposit history.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 2 decimal places via `rust_decimal`
//! - **Append-only log**: transactions are immutable and insertion-ordered
//! - **Strict invariants**: `balance >= -withdrawal_limit` always holds
//! - **Atomic persistence**: the full snapshot is swapped after every mutation
//!
//! ## Example
//!
//! ```no_run
//! use std::str::FromStr;
//! use teller_engine::{JsonFileStore, Money, TellerEngine};
//!
//! let store = JsonFileStore::new("teller-ledger.json");
//! let mut engine = TellerEngine::open(store, "TERMINAL-1").unwrap();
//!
//! engine.create_account("ana", false).unwrap();
//! let session = engine.login("ana").unwrap();
//! engine.deposit(&session, Money::from_str("100.0").unwrap()).unwrap();
//! ```

pub mod account;
pub mod credit;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod money;
pub mod store;
pub mod transaction;

pub use account::{Account, AccountId};
pub use engine::{BalanceView, Session, TellerEngine};
pub use error::{Result, TellerError};
pub use ledger::Ledger;
pub use money::Money;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
pub use transaction::{Transaction, TxKind};
