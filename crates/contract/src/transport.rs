use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use staker_api::RemoteError;

/// Failure reported by a [`LedgerTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The wallet or node refused the request.
    #[error(transparent)]
    Rejected(#[from] RemoteError),

    /// The contract reverted; carries the raw revert data.
    #[error("execution reverted")]
    Reverted(Bytes),
}

/// Channel to the contract, mediated by the user's wallet.
///
/// `call` is a read-only query. `send_transaction` asks the wallet to sign
/// and submit a state-changing call and resolves with the call's return data
/// once the ledger has applied it.
#[async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait LedgerTransport: Send + Sync {
    /// Execute a read-only call against `to`.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, TransportError>;

    /// Sign and submit a transaction to `to`.
    async fn send_transaction(&self, to: Address, input: Bytes) -> Result<Bytes, TransportError>;
}
