use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use staker_primitives::{Address, Amount};

use crate::RemoteError;

/// The three figures the ledger keeps for an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// Tokens available to stake or transfer.
    pub balance: Amount,
    /// Tokens currently staked.
    pub stake: Amount,
    /// Accrued, unclaimed reward.
    pub reward: Amount,
}

/// Operations exposed by the remote ledger.
///
/// Mutating calls resolve once the wallet and ledger have confirmed or
/// rejected the request; there is no client-side timeout. A confirmed call
/// returns `true`.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait RemoteLedger: Send + Sync {
    /// Read the account's balance, stake and reward.
    async fn fetch_balances(&self) -> Result<Balances, RemoteError>;

    /// Move `amount` from balance into stake. Restarts the vesting period.
    async fn increase_stake(&self, amount: Amount) -> Result<bool, RemoteError>;

    /// Move `amount` from stake back into balance. Restarts the vesting period.
    async fn decrease_stake(&self, amount: Amount) -> Result<bool, RemoteError>;

    /// Move the accrued reward into balance.
    async fn claim_reward(&self) -> Result<bool, RemoteError>;

    /// Send `amount` of balance to `recipient`.
    async fn transfer(&self, recipient: Address, amount: Amount) -> Result<bool, RemoteError>;
}
