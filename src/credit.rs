//! Pre-approved credit evaluation.
//!
//! Runs once at successful login. Walks the transaction log from most
//! recent to oldest counting large deposits inside a 30-day lookback; two
//! hits raise the withdrawal limit to the upgraded value. The walk stops
//! at the first qualifying-size entry that falls outside the window, which
//! relies on the log being in posting order — the log is append-only, so
//! that holds by construction.

use crate::account::Account;
use crate::money::Money;
use crate::transaction::Transaction;
use chrono::{DateTime, Duration, Utc};
use log::debug;

/// A deposit must exceed this amount to count toward the upgrade.
pub const QUALIFYING_DEPOSIT: i64 = 20_000;

/// Lookback window for qualifying deposits, in days.
pub const LOOKBACK_DAYS: i64 = 30;

/// Number of qualifying deposits required for the upgrade.
pub const QUALIFYING_COUNT: u32 = 2;

/// Withdrawal limit granted by the upgrade.
pub const UPGRADED_LIMIT: i64 = 80_000;

/// Evaluates the pre-approved credit rule for one account.
///
/// Returns `true` only if the withdrawal limit was raised by this call.
/// The rule is one-way and idempotent: an already-upgraded account is
/// never lowered or re-raised.
///
/// Stored withdrawal amounts are negative, so only deposits can exceed
/// the positive qualifying threshold.
pub fn apply_preapproved_credit(
    account: &mut Account,
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> bool {
    let threshold = Money::from_major(QUALIFYING_DEPOSIT);
    let window = Duration::days(LOOKBACK_DAYS);
    let mut qualifying = 0;

    for tx in transactions.iter().rev() {
        if tx.account_id != account.id || tx.amount <= threshold {
            continue;
        }

        if now - tx.timestamp <= window {
            qualifying += 1;
            if qualifying >= QUALIFYING_COUNT {
                let raised = account.raise_limit(Money::from_major(UPGRADED_LIMIT));
                if raised {
                    debug!(
                        "Account {} qualifies for pre-approved credit, limit raised to {}",
                        account.id, account.withdrawal_limit
                    );
                }
                return raised;
            }
        } else {
            // First qualifying-size entry outside the window ends the scan.
            break;
        }
    }

    false
}
