//! In-process staking contract.
//!
//! [`MemoryStaker`] decodes [`IStaker`] calldata and applies it to an
//! in-memory book, giving the client a ledger to talk to without a chain or
//! wallet. It enforces the same preconditions as the deployed contract and
//! reverts with an `Error(string)` payload when they fail.

use std::collections::HashMap;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{Revert, SolCall, SolError, SolInterface};
use async_trait::async_trait;
use parking_lot::Mutex;
use staker_api::{Balances, RemoteError};
use staker_primitives::Amount;
use tracing::debug;

use crate::{IStaker, LedgerTransport, TransportError};

/// JSON-RPC code for malformed call data.
const INVALID_PARAMS_CODE: i64 = -32602;

/// JSON-RPC code for a request the node refuses to serve.
const SERVER_ERROR_CODE: i64 = -32000;

struct Book {
    holders: HashMap<Address, U256>,
    stake: U256,
    reward: U256,
    vesting_restarts: u64,
    reject_next: Option<RemoteError>,
}

/// Staking contract simulated in memory for a single staking account.
pub struct MemoryStaker {
    contract: Address,
    account: Address,
    book: Mutex<Book>,
}

impl MemoryStaker {
    /// Deploy a simulated contract at `contract` with `account`'s figures
    /// seeded from `initial`.
    pub fn new(contract: Address, account: Address, initial: Balances) -> Self {
        let mut holders = HashMap::new();
        holders.insert(account, initial.balance.base_units());

        Self {
            contract,
            account,
            book: Mutex::new(Book {
                holders,
                stake: initial.stake.base_units(),
                reward: initial.reward.base_units(),
                vesting_restarts: 0,
                reject_next: None,
            }),
        }
    }

    /// Current figures of the staking account.
    pub fn balances(&self) -> Balances {
        let book = self.book.lock();
        Balances {
            balance: Amount::from_base_units(book.balance_of(self.account)),
            stake: Amount::from_base_units(book.stake),
            reward: Amount::from_base_units(book.reward),
        }
    }

    /// Token balance held by `holder`.
    pub fn balance_of(&self, holder: Address) -> Amount {
        Amount::from_base_units(self.book.lock().balance_of(holder))
    }

    /// Number of times the vesting period has been restarted.
    pub fn vesting_restarts(&self) -> u64 {
        self.book.lock().vesting_restarts
    }

    /// Reject the next transaction with `err`, as a wallet would when the
    /// user declines to sign.
    pub fn reject_next(&self, err: RemoteError) {
        self.book.lock().reject_next = Some(err);
    }

    /// Accrue `amount` of reward to the staking account.
    pub fn accrue_reward(&self, amount: Amount) {
        let mut book = self.book.lock();
        book.reward = book.reward.saturating_add(amount.base_units());
    }

    fn decode(&self, to: Address, input: &[u8]) -> Result<IStaker::IStakerCalls, TransportError> {
        if to != self.contract {
            return Err(RemoteError::new(Some(SERVER_ERROR_CODE), format!("no contract at {to}")).into());
        }
        IStaker::IStakerCalls::abi_decode(input).map_err(|e| {
            RemoteError::new(Some(INVALID_PARAMS_CODE), format!("invalid call data: {e}")).into()
        })
    }

    fn execute(&self, call: IStaker::IStakerCalls) -> Result<Bytes, TransportError> {
        use IStaker::IStakerCalls;

        let mut book = self.book.lock();
        let account = self.account;

        let output = match call {
            IStakerCalls::getBalances(_) => {
                IStaker::getBalancesCall::abi_encode_returns(&IStaker::getBalancesReturn {
                    stake: book.stake,
                    balance: book.balance_of(account),
                    reward: book.reward,
                })
            }
            IStakerCalls::increaseStake(IStaker::increaseStakeCall { amount }) => {
                let balance = book
                    .balance_of(account)
                    .checked_sub(amount)
                    .ok_or_else(|| revert("insufficient balance"))?;
                let stake = book.stake.checked_add(amount).ok_or_else(|| revert("overflow"))?;
                book.holders.insert(account, balance);
                book.stake = stake;
                book.vesting_restarts += 1;
                IStaker::increaseStakeCall::abi_encode_returns(&true)
            }
            IStakerCalls::decreaseStake(IStaker::decreaseStakeCall { amount }) => {
                let stake = book
                    .stake
                    .checked_sub(amount)
                    .ok_or_else(|| revert("insufficient stake"))?;
                let balance = book
                    .balance_of(account)
                    .checked_add(amount)
                    .ok_or_else(|| revert("overflow"))?;
                book.holders.insert(account, balance);
                book.stake = stake;
                book.vesting_restarts += 1;
                IStaker::decreaseStakeCall::abi_encode_returns(&true)
            }
            IStakerCalls::claimReward(_) => {
                if book.reward.is_zero() {
                    return Err(revert("no reward to claim"));
                }
                let balance = book
                    .balance_of(account)
                    .checked_add(book.reward)
                    .ok_or_else(|| revert("overflow"))?;
                book.holders.insert(account, balance);
                book.reward = U256::ZERO;
                IStaker::claimRewardCall::abi_encode_returns(&true)
            }
            IStakerCalls::transfer(IStaker::transferCall { recipient, amount }) => {
                if recipient.is_zero() {
                    return Err(revert("transfer to the zero address"));
                }
                let balance = book
                    .balance_of(account)
                    .checked_sub(amount)
                    .ok_or_else(|| revert("insufficient balance"))?;
                if recipient != account {
                    let credited = book
                        .balance_of(recipient)
                        .checked_add(amount)
                        .ok_or_else(|| revert("overflow"))?;
                    book.holders.insert(recipient, credited);
                    book.holders.insert(account, balance);
                }
                IStaker::transferCall::abi_encode_returns(&true)
            }
        };

        Ok(output.into())
    }
}

impl Book {
    fn balance_of(&self, holder: Address) -> U256 {
        self.holders.get(&holder).copied().unwrap_or_default()
    }
}

fn revert(reason: &str) -> TransportError {
    let data = Revert {
        reason: reason.to_owned(),
    }
    .abi_encode();
    TransportError::Reverted(data.into())
}

#[async_trait]
impl LedgerTransport for MemoryStaker {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, TransportError> {
        match self.decode(to, &input)? {
            call @ IStaker::IStakerCalls::getBalances(_) => self.execute(call),
            _ => Err(RemoteError::new(
                Some(SERVER_ERROR_CODE),
                "state-changing call sent as read-only query",
            )
            .into()),
        }
    }

    async fn send_transaction(&self, to: Address, input: Bytes) -> Result<Bytes, TransportError> {
        let call = self.decode(to, &input)?;

        if let Some(err) = self.book.lock().reject_next.take() {
            debug!(reason = err.reason(), "transaction rejected before signing");
            return Err(err.into());
        }

        self.execute(call)
    }
}
