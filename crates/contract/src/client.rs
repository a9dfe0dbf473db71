use alloy_primitives::Address;
use alloy_sol_types::{Revert, SolCall, SolError};
use async_trait::async_trait;
use staker_api::{Balances, RemoteError, RemoteLedger};
use staker_primitives::Amount;
use tracing::{debug, trace};

use crate::{IStaker, LedgerTransport, TransportError};

/// Reason used when a revert carries no decodable message.
const DEFAULT_REVERT_REASON: &str = "execution reverted";

/// [`RemoteLedger`] backed by the staking contract.
///
/// Encodes each operation as an [`IStaker`] call, sends it through the
/// transport and decodes the return data.
#[derive(Debug, Clone)]
pub struct ContractLedger<T> {
    transport: T,
    contract: Address,
}

impl<T: LedgerTransport> ContractLedger<T> {
    /// Bind the contract at `contract` over `transport`.
    pub fn new(transport: T, contract: Address) -> Self {
        Self {
            transport,
            contract,
        }
    }

    /// Address of the bound contract.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn read<C: SolCall + Send>(&self, call: C) -> Result<C::Return, RemoteError> {
        trace!(contract = %self.contract, call = C::SIGNATURE, "ledger call");
        let output = self
            .transport
            .call(self.contract, call.abi_encode().into())
            .await?;
        decode_returns::<C>(&output)
    }

    async fn write<C: SolCall<Return = bool> + Send>(&self, call: C) -> Result<bool, RemoteError> {
        debug!(contract = %self.contract, call = C::SIGNATURE, "submitting transaction");
        let output = self
            .transport
            .send_transaction(self.contract, call.abi_encode().into())
            .await?;
        decode_returns::<C>(&output)
    }
}

fn decode_returns<C: SolCall>(output: &[u8]) -> Result<C::Return, RemoteError> {
    C::abi_decode_returns(output)
        .map_err(|e| RemoteError::new(None, format!("invalid ledger response: {e}")))
}

impl From<TransportError> for RemoteError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Rejected(err) => err,
            TransportError::Reverted(data) => {
                let reason = Revert::abi_decode(&data)
                    .map(|revert| revert.reason)
                    .unwrap_or_else(|_| DEFAULT_REVERT_REASON.to_owned());
                RemoteError::reverted(reason).with_data(data.to_string())
            }
        }
    }
}

#[async_trait]
impl<T: LedgerTransport> RemoteLedger for ContractLedger<T> {
    async fn fetch_balances(&self) -> Result<Balances, RemoteError> {
        let IStaker::getBalancesReturn {
            stake,
            balance,
            reward,
        } = self.read(IStaker::getBalancesCall {}).await?;

        Ok(Balances {
            balance: balance.into(),
            stake: stake.into(),
            reward: reward.into(),
        })
    }

    async fn increase_stake(&self, amount: Amount) -> Result<bool, RemoteError> {
        self.write(IStaker::increaseStakeCall {
            amount: amount.into(),
        })
        .await
    }

    async fn decrease_stake(&self, amount: Amount) -> Result<bool, RemoteError> {
        self.write(IStaker::decreaseStakeCall {
            amount: amount.into(),
        })
        .await
    }

    async fn claim_reward(&self) -> Result<bool, RemoteError> {
        self.write(IStaker::claimRewardCall {}).await
    }

    async fn transfer(&self, recipient: Address, amount: Amount) -> Result<bool, RemoteError> {
        self.write(IStaker::transferCall {
            recipient,
            amount: amount.into(),
        })
        .await
    }
}
