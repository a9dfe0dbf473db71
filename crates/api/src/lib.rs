//! Remote ledger interface.
//!
//! The staking client never holds authoritative balances. It talks to a
//! remote ledger (a staking contract behind a wallet) through the
//! [`RemoteLedger`] trait, and every failure the ledger reports is carried
//! as a [`RemoteError`].

mod error;
mod ledger;

pub use error::{RemoteError, RemoteErrorBody};
pub use ledger::{Balances, RemoteLedger};
