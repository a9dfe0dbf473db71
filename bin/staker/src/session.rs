//! Interactive staking session.
//!
//! Reads one command per line from stdin, drives the reconciliation engine
//! and prints the notifications each command produced.

use std::fmt;
use std::io::Write;

use eyre::Result;
use staker_api::Balances;
use staker_contract::{ContractLedger, MemoryStaker};
use staker_core::{
    ActionGuard, EngineHandle, Notification, NotificationLevel, PendingAction,
    StakeAccountState, VESTING_RESTART_WARNING, spawn_engine,
};
use staker_node_core::StakerConfig;
use staker_primitives::{Amount, ParseAmountError, TOKEN_SYMBOL};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  show                         print the account snapshot
  refresh                      reload balance, stake and reward
  increase <amount>            stake tokens from the balance
  decrease <amount>            unstake tokens back to the balance
  claim                        move the accrued reward to the balance
  transfer <address> <amount>  send tokens to another account
  help                         print this message
  quit                         leave the session";

type Input = Lines<BufReader<Stdin>>;

/// A parsed session command.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Show,
    Refresh,
    Submit(PendingAction),
    Help,
    Quit,
}

/// Reasons a command line is refused before reaching the engine.
#[derive(Debug, PartialEq, Eq)]
enum CommandError {
    Unknown(String),
    Usage(&'static str),
    Amount(ParseAmountError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(word) => write!(f, "unknown command {word:?}, try `help`"),
            Self::Usage(usage) => write!(f, "usage: {usage}"),
            Self::Amount(err) => write!(f, "{err}"),
        }
    }
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    fn parse(line: &str) -> Option<Result<Self, CommandError>> {
        let mut words = line.split_whitespace();
        let verb = words.next()?;
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("show", []) => Ok(Self::Show),
            ("refresh", []) => Ok(Self::Refresh),
            ("help", []) => Ok(Self::Help),
            ("quit" | "exit", []) => Ok(Self::Quit),
            ("claim", []) => Ok(Self::Submit(PendingAction::claim_reward())),
            ("increase", [amount]) => {
                amount_arg(amount).map(|a| Self::Submit(PendingAction::increase_stake(a)))
            }
            ("decrease", [amount]) => {
                amount_arg(amount).map(|a| Self::Submit(PendingAction::decrease_stake(a)))
            }
            ("transfer", [recipient, amount]) => {
                amount_arg(amount).map(|a| Self::Submit(PendingAction::transfer(*recipient, a)))
            }
            ("increase", _) => Err(CommandError::Usage("increase <amount>")),
            ("decrease", _) => Err(CommandError::Usage("decrease <amount>")),
            ("transfer", _) => Err(CommandError::Usage("transfer <address> <amount>")),
            ("show" | "refresh" | "help" | "quit" | "exit" | "claim", _) => {
                Err(CommandError::Usage("this command takes no arguments"))
            }
            (other, _) => Err(CommandError::Unknown(other.to_owned())),
        };

        Some(command)
    }
}

fn amount_arg(text: &str) -> Result<Amount, CommandError> {
    Amount::parse(text).map_err(CommandError::Amount)
}

/// Run a session against an in-process ledger seeded from `config`.
pub(crate) async fn run(config: StakerConfig) -> Result<()> {
    let ledger = &config.ledger;
    let staker = MemoryStaker::new(
        ledger.contract(),
        ledger.account(),
        Balances {
            balance: ledger.dev.balance(),
            stake: ledger.dev.stake(),
            reward: ledger.dev.reward(),
        },
    );
    let handle = spawn_engine(ContractLedger::new(staker, ledger.contract()));
    let mut notifications = handle.subscribe();

    if handle.load_account().await.is_ok() {
        print_state(&handle.current_state());
    }
    drain(&mut notifications);
    println!("Type `help` for a list of commands.");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ");
        let Some(line) = input.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(err)) => {
                println!("{err}");
                continue;
            }
        };
        debug!(?command, "Session command");

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Show => print_state(&handle.current_state()),
            Command::Refresh => {
                if handle.load_account().await.is_ok() {
                    print_state(&handle.current_state());
                }
            }
            Command::Submit(action) => submit(&handle, action, &mut input).await?,
        }

        drain(&mut notifications);
    }

    Ok(())
}

/// Submit `action`, asking for the vesting confirmation first when the
/// action would be accepted and restarts vesting.
async fn submit(handle: &EngineHandle, action: PendingAction, input: &mut Input) -> Result<()> {
    let state = handle.current_state();
    let needs_confirmation = action.kind().restarts_vesting()
        && state.is_loaded()
        && ActionGuard::check(&state, &action).is_ok();

    let confirmed = if needs_confirmation {
        prompt(&format!("{VESTING_RESTART_WARNING} [y/N] "));
        let answer = input.next_line().await?.unwrap_or_default();
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
        true
    } else {
        false
    };

    // The outcome reaches the user as a notification.
    if let Err(err) = handle.submit(action, confirmed).await {
        debug!(%err, "Action not applied");
    }
    Ok(())
}

fn drain(notifications: &mut broadcast::Receiver<Notification>) {
    loop {
        match notifications.try_recv() {
            Ok(notification) => print_notification(&notification),
            Err(TryRecvError::Lagged(missed)) => warn!(missed, "Notifications dropped"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn print_notification(notification: &Notification) {
    match notification.level {
        NotificationLevel::Success => println!("[ok] {}", notification.text),
        NotificationLevel::Error => println!("[error] {}", notification.text),
    }
}

fn print_state(state: &StakeAccountState) {
    let stale = if state.is_loaded() { "" } else { " (stale)" };
    println!("Balance: {} {TOKEN_SYMBOL}{stale}", state.balance());
    println!("Stake:   {} {TOKEN_SYMBOL}{stale}", state.stake());
    println!("Reward:  {} {TOKEN_SYMBOL}{stale}", state.reward());
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}
