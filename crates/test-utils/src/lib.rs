//! Test utilities for staker crates.
//!
//! [`MockLedger`] is a scripted [`RemoteLedger`] that records every request,
//! so tests can assert both on the engine's state and on what reached the
//! ledger.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use staker_api::{Balances, RemoteError, RemoteLedger};
use staker_primitives::{Address, Amount};
use tokio::sync::oneshot;

/// A request received by [`MockLedger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerRequest {
    /// `fetch_balances()`.
    FetchBalances,
    /// `increase_stake(amount)`.
    IncreaseStake(Amount),
    /// `decrease_stake(amount)`.
    DecreaseStake(Amount),
    /// `claim_reward()`.
    ClaimReward,
    /// `transfer(recipient, amount)`.
    Transfer(Address, Amount),
}

impl LedgerRequest {
    /// Whether the request mutates the ledger.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::FetchBalances)
    }
}

/// Scripted remote ledger.
///
/// Fetches answer with the configured balances. Mutating calls answer with
/// queued responses, or `Ok(true)` when the queue is empty. The ledger's
/// own figures are never changed by mutating calls.
pub struct MockLedger {
    fetch: Mutex<Result<Balances, RemoteError>>,
    responses: Mutex<VecDeque<Result<bool, RemoteError>>>,
    requests: Mutex<Vec<LedgerRequest>>,
    hold: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

/// A call parked by [`MockLedger::hold_next`].
pub struct HeldCall {
    started: oneshot::Receiver<()>,
    release: oneshot::Sender<()>,
}

impl HeldCall {
    /// Resolves once the held call has reached the ledger.
    pub async fn started(&mut self) {
        let _ = (&mut self.started).await;
    }

    /// Let the held call answer.
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

impl MockLedger {
    /// Ledger reporting `balances` on fetch.
    pub fn new(balances: Balances) -> Self {
        Self {
            fetch: Mutex::new(Ok(balances)),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
        }
    }

    /// Ledger reporting whole-token figures on fetch.
    pub fn with_tokens(balance: u64, stake: u64, reward: u64) -> Self {
        Self::new(Balances {
            balance: Amount::from_tokens(balance),
            stake: Amount::from_tokens(stake),
            reward: Amount::from_tokens(reward),
        })
    }

    /// Report `balances` on subsequent fetches.
    pub fn set_balances(&self, balances: Balances) {
        *self.fetch.lock() = Ok(balances);
    }

    /// Fail subsequent fetches with `err`.
    pub fn fail_fetch(&self, err: RemoteError) {
        *self.fetch.lock() = Err(err);
    }

    /// Queue the response for the next mutating call.
    pub fn respond_with(&self, result: Result<bool, RemoteError>) {
        self.responses.lock().push_back(result);
    }

    /// Make the next mutating call revert with `reason`.
    pub fn revert_next(&self, reason: &str) {
        self.respond_with(Err(RemoteError::reverted(reason)));
    }

    /// Park the next call (of any kind) until the returned [`HeldCall`] is
    /// released or dropped.
    pub fn hold_next(&self) -> HeldCall {
        let (started_tx, started) = oneshot::channel();
        let (release, release_rx) = oneshot::channel();
        *self.hold.lock() = Some((started_tx, release_rx));
        HeldCall { started, release }
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<LedgerRequest> {
        self.requests.lock().clone()
    }

    /// Number of mutating requests received.
    pub fn mutating_calls(&self) -> usize {
        self.requests.lock().iter().filter(|r| r.is_mutating()).count()
    }

    /// Number of transfer requests received.
    pub fn transfer_calls(&self) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| matches!(r, LedgerRequest::Transfer(..)))
            .count()
    }

    async fn receive(&self, request: LedgerRequest) {
        self.requests.lock().push(request);

        let hold = self.hold.lock().take();
        if let Some((started, release)) = hold {
            let _ = started.send(());
            let _ = release.await;
        }
    }

    async fn mutate(&self, request: LedgerRequest) -> Result<bool, RemoteError> {
        self.receive(request).await;
        self.responses.lock().pop_front().unwrap_or(Ok(true))
    }
}

#[async_trait]
impl RemoteLedger for MockLedger {
    async fn fetch_balances(&self) -> Result<Balances, RemoteError> {
        self.receive(LedgerRequest::FetchBalances).await;
        self.fetch.lock().clone()
    }

    async fn increase_stake(&self, amount: Amount) -> Result<bool, RemoteError> {
        self.mutate(LedgerRequest::IncreaseStake(amount)).await
    }

    async fn decrease_stake(&self, amount: Amount) -> Result<bool, RemoteError> {
        self.mutate(LedgerRequest::DecreaseStake(amount)).await
    }

    async fn claim_reward(&self) -> Result<bool, RemoteError> {
        self.mutate(LedgerRequest::ClaimReward).await
    }

    async fn transfer(&self, recipient: Address, amount: Amount) -> Result<bool, RemoteError> {
        self.mutate(LedgerRequest::Transfer(recipient, amount)).await
    }
}
