//! Core teller engine.
//!
//! Wires account lifecycle, transaction posting, history/balance queries,
//! and the pre-approved credit evaluation together over the ledger store.
//! Every state-mutating operation persists the full snapshot before
//! returning; reads never persist.

use crate::account::{Account, AccountId};
use crate::credit;
use crate::error::{Result, TellerError};
use crate::ledger::Ledger;
use crate::money::Money;
use crate::store::SnapshotStore;
use crate::transaction::Transaction;
use chrono::Utc;
use log::{debug, warn};

/// An authenticated session for one account.
///
/// Holds the account *name* rather than an id or reference: every engine
/// call re-resolves the account by name, so a session stays valid across
/// snapshot reloads. Sessions are only produced by [`TellerEngine::login`].
#[derive(Debug, Clone)]
pub struct Session {
    name: String,
}

impl Session {
    /// The account name this session is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Read-only balance projection for display.
#[derive(Debug, Clone, Copy)]
pub struct BalanceView {
    /// Current balance.
    pub balance: Money,

    /// Current withdrawal limit.
    pub withdrawal_limit: Money,

    /// `true` when the limit has been raised above the account's baseline,
    /// the signal for the credit-upgrade notification.
    pub upgraded: bool,
}

/// The teller engine.
///
/// Owns the in-memory ledger and the persistence provider. Single-terminal
/// operation: one engine instance per backing store, one session active at
/// a time, every operation running to completion before the next.
pub struct TellerEngine<S: SnapshotStore> {
    ledger: Ledger,
    store: S,
    terminal: String,
}

impl<S: SnapshotStore> TellerEngine<S> {
    /// Opens an engine over the given store, loading the persisted
    /// snapshot. A missing snapshot starts an empty ledger.
    pub fn open(store: S, terminal: impl Into<String>) -> Result<Self> {
        let ledger = match store.load()? {
            Some((accounts, transactions)) => Ledger::restore(accounts, transactions),
            None => Ledger::new(),
        };

        Ok(TellerEngine {
            ledger,
            store,
            terminal: terminal.into(),
        })
    }

    /// Creates a new account with zero balance and the baseline limit.
    ///
    /// Fails with [`TellerError::DuplicateName`] when the name is taken;
    /// nothing is mutated or persisted on failure.
    pub fn create_account(&mut self, name: &str, retiree: bool) -> Result<AccountId> {
        if self.ledger.find_by_name(name).is_some() {
            warn!("Rejected account creation: name \"{}\" already taken", name);
            return Err(TellerError::DuplicateName {
                name: name.to_string(),
            });
        }

        let id = self.ledger.insert_account(name, retiree).id;
        self.persist()?;

        debug!("Created account {} for \"{}\" (retiree: {})", id, name, retiree);
        Ok(id)
    }

    /// Logs into an existing account.
    ///
    /// Runs the pre-approved credit evaluation once against the current
    /// clock; if the evaluation raises the withdrawal limit, the new limit
    /// is persisted before the session is returned.
    pub fn login(&mut self, name: &str) -> Result<Session> {
        let account_id = self.resolve(name)?.id;

        // Safety: id was just resolved from the ledger
        let (account, log) = self
            .ledger
            .account_and_log_mut(account_id)
            .expect("account exists");

        let upgraded = credit::apply_preapproved_credit(account, log, Utc::now());
        if upgraded {
            self.persist()?;
        }

        debug!("Login for account {} (\"{}\")", account_id, name);
        Ok(Session {
            name: name.to_string(),
        })
    }

    /// Deposits a positive amount into the session's account and posts a
    /// `DEPOSIT` transaction.
    pub fn deposit(&mut self, session: &Session, amount: Money) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(TellerError::InvalidAmount { amount });
        }

        let account_id = self.resolve(&session.name)?.id;

        // Safety: id was just resolved from the ledger
        let account = self
            .ledger
            .find_by_name_mut(&session.name)
            .expect("account exists");
        account.deposit(amount);

        let tx = Transaction::deposit(account_id, amount, self.terminal.as_str(), Utc::now());
        self.ledger.append_transaction(tx.clone());
        self.persist()?;

        debug!("Deposited {} to account {}", amount, account_id);
        Ok(tx)
    }

    /// Withdraws a positive amount from the session's account and posts a
    /// `WITHDRAWAL` transaction with a negative stored amount.
    ///
    /// Fails with [`TellerError::InsufficientLimit`] when the withdrawal
    /// would push the balance below `-withdrawal_limit`; the account is
    /// unchanged on failure.
    pub fn withdraw(&mut self, session: &Session, amount: Money) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(TellerError::InvalidAmount { amount });
        }

        let account_id = self.resolve(&session.name)?.id;

        // Safety: id was just resolved from the ledger
        let account = self
            .ledger
            .find_by_name_mut(&session.name)
            .expect("account exists");

        if !account.withdraw(amount) {
            let balance = account.balance;
            let limit = account.withdrawal_limit;
            debug!(
                "Withdrawal of {} from account {} rejected (balance {}, limit {})",
                amount, account_id, balance, limit
            );
            return Err(TellerError::InsufficientLimit {
                requested: amount,
                balance,
                limit,
            });
        }

        let tx = Transaction::withdrawal(account_id, amount, self.terminal.as_str(), Utc::now());
        self.ledger.append_transaction(tx.clone());
        self.persist()?;

        debug!("Withdrew {} from account {}", amount, account_id);
        Ok(tx)
    }

    /// All transactions of the session's account in original posting
    /// order. Empty when nothing has been posted.
    pub fn history(&self, session: &Session) -> Result<Vec<Transaction>> {
        let account = self.resolve(&session.name)?;
        Ok(self.ledger.history(account.id).cloned().collect())
    }

    /// Read-only balance projection for the session's account.
    pub fn balance(&self, session: &Session) -> Result<BalanceView> {
        let account = self.resolve(&session.name)?;
        Ok(BalanceView {
            balance: account.balance,
            withdrawal_limit: account.withdrawal_limit,
            upgraded: account.has_upgraded_limit(),
        })
    }

    fn resolve(&self, name: &str) -> Result<&Account> {
        self.ledger
            .find_by_name(name)
            .ok_or_else(|| TellerError::AccountNotFound {
                name: name.to_string(),
            })
    }

    fn persist(&self) -> Result<()> {
        self.store
            .save(self.ledger.accounts(), self.ledger.transactions())
    }

    /// Returns a reference to the ledger (for testing).
    #[cfg(test)]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::store::MemoryStore;
    use crate::transaction::TxKind;
    use chrono::Duration;
    use std::str::FromStr;

    const TERMINAL: &str = "TERMINAL-1";

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn open_empty() -> TellerEngine<MemoryStore> {
        TellerEngine::open(MemoryStore::new(), TERMINAL).unwrap()
    }

    #[test]
    fn test_create_account_assigns_sequential_ids() {
        let mut engine = open_empty();
        assert_eq!(engine.create_account("ana", false).unwrap(), 1);
        assert_eq!(engine.create_account("luis", true).unwrap(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected_without_mutation() {
        let mut engine = open_empty();
        engine.create_account("ana", false).unwrap();

        let err = engine.create_account("ana", true).unwrap_err();
        assert!(matches!(err, TellerError::DuplicateName { .. }));
        assert_eq!(engine.ledger().accounts().len(), 1);
    }

    #[test]
    fn test_login_unknown_name_fails() {
        let mut engine = open_empty();
        let err = engine.login("ghost").unwrap_err();
        assert!(matches!(err, TellerError::AccountNotFound { .. }));
    }

    #[test]
    fn test_deposit_updates_balance_and_posts_transaction() {
        let mut engine = open_empty();
        engine.create_account("ana", true).unwrap();
        let session = engine.login("ana").unwrap();

        let tx = engine.deposit(&session, money("100")).unwrap();
        assert_eq!(tx.kind, TxKind::Deposit);
        assert_eq!(tx.amount, money("100"));
        assert_eq!(tx.terminal, TERMINAL);

        let view = engine.balance(&session).unwrap();
        assert_eq!(view.balance, money("100"));
        assert_eq!(view.withdrawal_limit, Money::from_major(10_000));
        assert!(!view.upgraded);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut engine = open_empty();
        engine.create_account("ana", false).unwrap();
        let session = engine.login("ana").unwrap();

        for amount in ["0", "-5"] {
            let err = engine.deposit(&session, money(amount)).unwrap_err();
            assert!(matches!(err, TellerError::InvalidAmount { .. }));
            let err = engine.withdraw(&session, money(amount)).unwrap_err();
            assert!(matches!(err, TellerError::InvalidAmount { .. }));
        }

        assert!(engine.history(&session).unwrap().is_empty());
    }

    #[test]
    fn test_withdraw_into_overdraft_then_limit_breach() {
        let mut engine = open_empty();
        engine.create_account("ana", false).unwrap();
        let session = engine.login("ana").unwrap();

        engine.withdraw(&session, money("15000")).unwrap();
        assert_eq!(engine.balance(&session).unwrap().balance, money("-15000"));

        let err = engine.withdraw(&session, money("6000")).unwrap_err();
        assert!(matches!(err, TellerError::InsufficientLimit { .. }));
        assert_eq!(engine.balance(&session).unwrap().balance, money("-15000"));
        assert_eq!(engine.history(&session).unwrap().len(), 1);
    }

    #[test]
    fn test_balance_equals_sum_of_transaction_amounts() {
        let mut engine = open_empty();
        engine.create_account("ana", false).unwrap();
        let session = engine.login("ana").unwrap();

        engine.deposit(&session, money("300.50")).unwrap();
        engine.withdraw(&session, money("120.25")).unwrap();
        engine.deposit(&session, money("19.75")).unwrap();

        let sum = engine
            .history(&session)
            .unwrap()
            .iter()
            .fold(Money::ZERO, |acc, tx| acc + tx.amount);
        assert_eq!(engine.balance(&session).unwrap().balance, sum);
        assert_eq!(sum, money("200.00"));
    }

    #[test]
    fn test_history_preserves_posting_order() {
        let mut engine = open_empty();
        engine.create_account("ana", false).unwrap();
        let session = engine.login("ana").unwrap();

        engine.deposit(&session, money("10")).unwrap();
        engine.withdraw(&session, money("4")).unwrap();

        let history = engine.history(&session).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, TxKind::Deposit);
        assert_eq!(history[1].kind, TxKind::Withdrawal);
    }

    #[test]
    fn test_state_survives_reopen() {
        let store = MemoryStore::new();

        {
            let mut engine = TellerEngine::open(&store, TERMINAL).unwrap();
            engine.create_account("ana", false).unwrap();
            let session = engine.login("ana").unwrap();
            engine.deposit(&session, money("250")).unwrap();
        }

        let mut engine = TellerEngine::open(&store, TERMINAL).unwrap();
        let session = engine.login("ana").unwrap();
        assert_eq!(engine.balance(&session).unwrap().balance, money("250"));
        assert_eq!(engine.history(&session).unwrap().len(), 1);

        // The id sequence resumes after the highest persisted id.
        assert_eq!(engine.create_account("luis", true).unwrap(), 2);
    }

    #[test]
    fn test_login_applies_credit_upgrade_and_persists_it() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let mut account = Account::new(1, "ana", false);
        account.deposit(money("50000"));
        let transactions = vec![
            Transaction::deposit(1, money("25000"), TERMINAL, now - Duration::days(20)),
            Transaction::deposit(1, money("25000"), TERMINAL, now - Duration::days(5)),
        ];
        store.save(&[account], &transactions).unwrap();

        let mut engine = TellerEngine::open(&store, TERMINAL).unwrap();
        let session = engine.login("ana").unwrap();

        let view = engine.balance(&session).unwrap();
        assert_eq!(view.withdrawal_limit, Money::from_major(80_000));
        assert!(view.upgraded);

        // The raised limit was saved at login, before any other mutation.
        let (accounts, _) = store.load().unwrap().unwrap();
        assert_eq!(accounts[0].withdrawal_limit, Money::from_major(80_000));
    }

    #[test]
    fn test_login_without_qualifying_history_keeps_baseline() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let mut account = Account::new(1, "ana", false);
        account.deposit(money("50000"));
        let transactions = vec![
            Transaction::deposit(1, money("25000"), TERMINAL, now - Duration::days(40)),
            Transaction::deposit(1, money("25000"), TERMINAL, now - Duration::days(5)),
        ];
        store.save(&[account], &transactions).unwrap();

        let mut engine = TellerEngine::open(&store, TERMINAL).unwrap();
        let session = engine.login("ana").unwrap();

        let view = engine.balance(&session).unwrap();
        assert_eq!(view.withdrawal_limit, Money::from_major(20_000));
        assert!(!view.upgraded);
    }
}
