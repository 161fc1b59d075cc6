//! Teller console
//!
//! Line-oriented presentation layer over the teller engine: a start menu
//! for login and account creation, and an operations menu for deposits,
//! withdrawals, balance display, and the transaction list.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- my-ledger.json
//! ```
//!
//! The ledger file path defaults to `teller-ledger.json`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use std::env;
use std::io::{self, BufRead, Lines, StdinLock, Write};
use std::process;
use std::str::FromStr;

use teller_engine::{JsonFileStore, Money, Result, Session, SnapshotStore, TellerEngine};

/// Terminal identifier stamped on every posted transaction.
const TERMINAL_ID: &str = "TERMINAL-1";

const DEFAULT_LEDGER_PATH: &str = "teller-ledger.json";

type InputLines = Lines<StdinLock<'static>>;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_LEDGER_PATH.to_string());

    let mut engine = TellerEngine::open(JsonFileStore::new(path), TERMINAL_ID)?;
    let mut lines = io::stdin().lock().lines();

    loop {
        println!();
        println!("======= TELLER =======");
        println!("1. Log in");
        println!("2. Create account");
        println!("3. Quit");

        let choice = match prompt(&mut lines, "Select an option: ")? {
            Some(choice) => choice,
            None => return Ok(()),
        };

        let keep_running = match choice.as_str() {
            "1" => login_menu(&mut engine, &mut lines)?,
            "2" => create_menu(&mut engine, &mut lines)?,
            "3" => return Ok(()),
            _ => {
                println!("Invalid option.");
                true
            }
        };

        if !keep_running {
            return Ok(());
        }
    }
}

/// Prompts for one line of input. `None` means end of input.
fn prompt(lines: &mut InputLines, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Prompts for a monetary amount until one parses. `None` means end of input.
fn read_amount(lines: &mut InputLines, message: &str) -> Result<Option<Money>> {
    loop {
        let raw = match prompt(lines, message)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match Money::from_str(&raw) {
            Ok(amount) => return Ok(Some(amount)),
            Err(_) => println!("Not a valid amount, try again."),
        }
    }
}

fn create_menu<S: SnapshotStore>(
    engine: &mut TellerEngine<S>,
    lines: &mut InputLines,
) -> Result<bool> {
    let name = match prompt(lines, "Account name: ")? {
        Some(name) => name,
        None => return Ok(false),
    };
    let retiree = match prompt(lines, "Retiree? (y/n): ")? {
        Some(answer) => answer.eq_ignore_ascii_case("y"),
        None => return Ok(false),
    };

    match engine.create_account(&name, retiree) {
        Ok(_) => println!("Account created."),
        Err(e) if !e.is_fatal() => println!("{}", e),
        Err(e) => return Err(e),
    }

    Ok(true)
}

fn login_menu<S: SnapshotStore>(
    engine: &mut TellerEngine<S>,
    lines: &mut InputLines,
) -> Result<bool> {
    let name = match prompt(lines, "Account name: ")? {
        Some(name) => name,
        None => return Ok(false),
    };

    let session = match engine.login(&name) {
        Ok(session) => session,
        Err(e) if !e.is_fatal() => {
            println!("{}", e);
            return Ok(true);
        }
        Err(e) => return Err(e),
    };

    println!("Welcome, {}.", session.name());
    operations_menu(engine, lines, &session)
}

fn operations_menu<S: SnapshotStore>(
    engine: &mut TellerEngine<S>,
    lines: &mut InputLines,
    session: &Session,
) -> Result<bool> {
    loop {
        println!();
        println!("======= MENU =======");
        println!("1. Deposit");
        println!("2. Withdraw");
        println!("3. Show balance");
        println!("4. List operations");
        println!("5. Log out");

        let choice = match prompt(lines, "Select an option: ")? {
            Some(choice) => choice,
            None => return Ok(false),
        };

        match choice.as_str() {
            "1" => {
                let amount = match read_amount(lines, "Amount to deposit: ")? {
                    Some(amount) => amount,
                    None => return Ok(false),
                };
                match engine.deposit(session, amount) {
                    Ok(tx) => println!("Deposit of {} posted.", tx.amount),
                    Err(e) if !e.is_fatal() => println!("{}", e),
                    Err(e) => return Err(e),
                }
            }
            "2" => {
                let amount = match read_amount(lines, "Amount to withdraw: ")? {
                    Some(amount) => amount,
                    None => return Ok(false),
                };
                match engine.withdraw(session, amount) {
                    Ok(_) => println!("Withdrawal of {} posted.", amount),
                    Err(e) if !e.is_fatal() => println!("{}", e),
                    Err(e) => return Err(e),
                }
            }
            "3" => {
                let view = engine.balance(session)?;
                println!("Balance for {}: {}", session.name(), view.balance);
                if view.upgraded {
                    println!(
                        "Good news! Your withdrawal limit has been raised to {}",
                        view.withdrawal_limit
                    );
                }
            }
            "4" => {
                let history = engine.history(session)?;
                if history.is_empty() {
                    println!("No operations recorded.");
                } else {
                    for tx in &history {
                        println!(
                            "{}  {}  {}",
                            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
                            tx.kind,
                            tx.amount
                        );
                    }
                }
            }
            "5" => return Ok(true),
            _ => println!("Invalid option."),
        }
    }
}
