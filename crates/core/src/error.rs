//! Engine error types.

use staker_primitives::{AmountError, ParseAmountError};

use crate::{ActionKind, GuardViolation};

/// Errors surfaced to the user by the staking client.
///
/// None of these are fatal: each leaves the account snapshot exactly as it
/// was before the failed operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StakerError {
    /// Amount text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseAmountError),

    /// Applying a confirmed effect would drive a field negative.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Pre-flight validation rejected the action.
    #[error("{0}")]
    Validation(#[from] GuardViolation),

    /// No successful fetch yet, or the last fetch failed.
    #[error("account not loaded, refresh first")]
    NotLoaded,

    /// The action restarts the vesting period and was not confirmed.
    #[error("{}", crate::VESTING_RESTART_WARNING)]
    ConfirmationRequired {
        /// The unconfirmed action.
        action: ActionKind,
    },

    /// Another ledger operation is in flight.
    #[error("another ledger operation is pending")]
    Busy,

    /// The ledger or wallet rejected the call. `reason` is verbatim.
    #[error("{reason}")]
    RemoteCall {
        /// The rejected action.
        action: ActionKind,
        /// Reason reported by the remote side.
        reason: String,
    },

    /// Refreshing balances failed.
    #[error("failed to load account: {reason}")]
    Fetch {
        /// Reason reported by the remote side.
        reason: String,
    },

    /// The engine task has stopped.
    #[error("reconciliation engine stopped")]
    ServiceStopped,
}
