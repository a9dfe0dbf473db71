//! CLI argument structs for the staker client.
//!
//! These args serve dual purposes:
//! - CLI parsing via clap (`#[derive(Args)]`)
//! - Configuration serialization via serde (`#[derive(Serialize, Deserialize)]`)
//!
//! Ledger fields are optional so that only flags actually given on the
//! command line override the configuration file and environment.

mod ledger;
mod log;

pub use ledger::{DevLedgerArgs, LedgerArgs};
pub use log::LogArgs;
