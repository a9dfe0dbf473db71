//! Client infrastructure for the staker binary.
//!
//! - [`args`] - CLI argument structs
//! - [`config`] - Configuration loading
//! - [`logging`] - Logging initialization

pub mod args;
pub mod config;
pub mod constants;
pub mod logging;

pub use args::{DevLedgerArgs, LedgerArgs, LogArgs};
pub use config::StakerConfig;
