//! User actions and the ledger calls they resolve to.

use staker_primitives::{Address, Amount, AmountError};

use crate::state::{Delta, StakeAccountState};

/// Warning shown before an action that restarts the vesting period.
pub const VESTING_RESTART_WARNING: &str = "This will restart the vesting period. Continue ?";

/// Kind of user action.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    /// Move balance into stake.
    IncreaseStake,
    /// Move stake back into balance.
    DecreaseStake,
    /// Move accrued reward into balance.
    ClaimReward,
    /// Send balance to another account.
    Transfer,
}

impl ActionKind {
    /// Whether the action restarts the vesting period on the ledger and so
    /// needs explicit confirmation before it is sent.
    pub const fn restarts_vesting(self) -> bool {
        matches!(self, Self::IncreaseStake | Self::DecreaseStake)
    }

    /// Message shown once the ledger confirms the action.
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::IncreaseStake => "Stake has been increased",
            Self::DecreaseStake => "Stake has been decreased",
            Self::ClaimReward => "Reward has been added to Balance",
            Self::Transfer => "Transfer successful",
        }
    }
}

/// An action requested by the user, before validation.
///
/// The recipient of a transfer is kept as the text the user entered; it is
/// parsed when the action is validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// Stake `amount` from the balance.
    IncreaseStake {
        /// Amount to stake.
        amount: Amount,
    },
    /// Unstake `amount` back into the balance.
    DecreaseStake {
        /// Amount to unstake.
        amount: Amount,
    },
    /// Claim the whole accrued reward.
    ClaimReward,
    /// Send `amount` to `recipient`.
    Transfer {
        /// Recipient address as entered.
        recipient: String,
        /// Amount to send.
        amount: Amount,
    },
}

impl PendingAction {
    /// Stake `amount`.
    pub const fn increase_stake(amount: Amount) -> Self {
        Self::IncreaseStake { amount }
    }

    /// Unstake `amount`.
    pub const fn decrease_stake(amount: Amount) -> Self {
        Self::DecreaseStake { amount }
    }

    /// Claim the accrued reward.
    pub const fn claim_reward() -> Self {
        Self::ClaimReward
    }

    /// Send `amount` to `recipient`.
    pub fn transfer(recipient: impl Into<String>, amount: Amount) -> Self {
        Self::Transfer {
            recipient: recipient.into(),
            amount,
        }
    }

    /// The action's kind.
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::IncreaseStake { .. } => ActionKind::IncreaseStake,
            Self::DecreaseStake { .. } => ActionKind::DecreaseStake,
            Self::ClaimReward => ActionKind::ClaimReward,
            Self::Transfer { .. } => ActionKind::Transfer,
        }
    }
}

/// A validated action, ready to be sent to the ledger.
///
/// Produced only by [`ActionGuard::check`](crate::ActionGuard::check).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    /// `increaseStake(amount)`.
    IncreaseStake(Amount),
    /// `decreaseStake(amount)`.
    DecreaseStake(Amount),
    /// `claimReward()`; carries the reward observed at validation.
    ClaimReward(Amount),
    /// `transfer(recipient, amount)`.
    Transfer {
        /// Parsed recipient.
        recipient: Address,
        /// Amount to send.
        amount: Amount,
    },
}

impl LedgerCall {
    /// The action's kind.
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::IncreaseStake(_) => ActionKind::IncreaseStake,
            Self::DecreaseStake(_) => ActionKind::DecreaseStake,
            Self::ClaimReward(_) => ActionKind::ClaimReward,
            Self::Transfer { .. } => ActionKind::Transfer,
        }
    }

    /// Project the confirmed effect of this call onto `state`.
    ///
    /// The effect is derived from the request rather than re-fetched. Fails
    /// without producing a snapshot if any field would go negative.
    pub fn apply(&self, state: StakeAccountState) -> Result<StakeAccountState, AmountError> {
        match *self {
            Self::IncreaseStake(amount) => state
                .with_balance_delta(Delta::Debit(amount))?
                .with_stake_delta(Delta::Credit(amount)),
            Self::DecreaseStake(amount) => state
                .with_stake_delta(Delta::Debit(amount))?
                .with_balance_delta(Delta::Credit(amount)),
            Self::ClaimReward(reward) => state
                .with_reward_delta(Delta::Debit(reward))?
                .with_balance_delta(Delta::Credit(reward)),
            Self::Transfer { amount, .. } => state.with_balance_delta(Delta::Debit(amount)),
        }
    }
}
