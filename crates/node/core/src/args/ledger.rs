//! Ledger connection CLI arguments.

use clap::Args;
use serde::{Deserialize, Serialize};
use staker_contract::STAKER_ADDRESS;
use staker_primitives::{Address, Amount};

use crate::constants::{
    DEFAULT_DEV_ACCOUNT, DEFAULT_DEV_BALANCE, DEFAULT_DEV_REWARD, DEFAULT_DEV_STAKE,
};

/// Which contract to talk to and on behalf of which account.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Ledger")]
#[serde(default)]
pub struct LedgerArgs {
    /// Address of the staking contract.
    #[arg(long = "ledger.contract", value_name = "ADDRESS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Address>,

    /// Wallet account whose stake is managed.
    #[arg(long = "ledger.account", value_name = "ADDRESS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Address>,

    /// Seed figures for the in-process ledger.
    #[command(flatten)]
    pub dev: DevLedgerArgs,
}

impl LedgerArgs {
    /// Configured contract, or the deployed staking contract.
    pub fn contract(&self) -> Address {
        self.contract.unwrap_or(STAKER_ADDRESS)
    }

    /// Configured account, or the development account.
    pub fn account(&self) -> Address {
        self.account.unwrap_or(DEFAULT_DEV_ACCOUNT)
    }
}

/// Starting figures of the in-process ledger account.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Development ledger")]
#[serde(default)]
pub struct DevLedgerArgs {
    /// Token balance at startup.
    #[arg(long = "dev.balance", value_name = "TOKENS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Amount>,

    /// Staked tokens at startup.
    #[arg(long = "dev.stake", value_name = "TOKENS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake: Option<Amount>,

    /// Accrued reward at startup.
    #[arg(long = "dev.reward", value_name = "TOKENS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<Amount>,
}

impl DevLedgerArgs {
    /// Configured balance or the default.
    pub fn balance(&self) -> Amount {
        self.balance
            .unwrap_or_else(|| Amount::from_tokens(DEFAULT_DEV_BALANCE))
    }

    /// Configured stake or the default.
    pub fn stake(&self) -> Amount {
        self.stake
            .unwrap_or_else(|| Amount::from_tokens(DEFAULT_DEV_STAKE))
    }

    /// Configured reward or the default.
    pub fn reward(&self) -> Amount {
        self.reward
            .unwrap_or_else(|| Amount::from_tokens(DEFAULT_DEV_REWARD))
    }
}
