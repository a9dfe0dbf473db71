//! Staking contract binding.
//!
//! - [`IStaker`] - ABI of the staking contract
//! - [`LedgerTransport`] - Wallet-mediated channel that carries calls and transactions
//! - [`ContractLedger`] - [`RemoteLedger`](staker_api::RemoteLedger) over any transport
//! - [`MemoryStaker`] - In-process contract used for development and tests
//!
//! # Return Data
//!
//! `getBalances()` returns `(stake, balance, reward)`, in that order.
//! [`ContractLedger`] maps the tuple into [`Balances`](staker_api::Balances)
//! by name so callers never see the contract's ordering.

mod abi;
mod client;
mod memory;
mod transport;

pub use abi::{IStaker, STAKER_ADDRESS};
pub use client::ContractLedger;
pub use memory::MemoryStaker;
pub use transport::{LedgerTransport, TransportError};
