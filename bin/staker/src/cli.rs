//! Staker CLI entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use staker_node_core::{LedgerArgs, LogArgs};

/// Staker - manage stake, reward and transfers of a staking account
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Path to a TOML configuration file.
    #[arg(long, value_name = "PATH", global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Open an interactive session against the ledger.
    Session(LedgerArgs),
}
