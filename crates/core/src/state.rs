//! Local snapshot of the stake account.
//!
//! A [`StakeAccountState`] is an immutable value. Every change produces a new
//! snapshot, and an adjustment that would drive a field below zero fails
//! without producing one.

use serde::Serialize;
use staker_primitives::{Amount, AmountError};

/// Signed adjustment to one field of the account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delta {
    /// Add to the field.
    Credit(Amount),
    /// Subtract from the field.
    Debit(Amount),
}

impl Delta {
    fn apply(self, value: Amount) -> Result<Amount, AmountError> {
        match self {
            Self::Credit(amount) => value.checked_add(amount),
            Self::Debit(amount) => value.checked_sub(amount),
        }
    }
}

/// Snapshot of balance, stake and reward as last known to the client.
///
/// `loaded == false` means the snapshot is stale or was never fetched; no
/// mutating action may be attempted against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StakeAccountState {
    balance: Amount,
    stake: Amount,
    reward: Amount,
    loaded: bool,
}

impl StakeAccountState {
    /// All zero, not loaded.
    pub const fn empty() -> Self {
        Self {
            balance: Amount::ZERO,
            stake: Amount::ZERO,
            reward: Amount::ZERO,
            loaded: false,
        }
    }

    /// Wholesale refresh from the ledger. The result is loaded.
    pub const fn replace(balance: Amount, stake: Amount, reward: Amount) -> Self {
        Self {
            balance,
            stake,
            reward,
            loaded: true,
        }
    }

    /// Same figures, marked stale.
    pub const fn invalidate(self) -> Self {
        Self {
            loaded: false,
            ..self
        }
    }

    /// Available balance.
    pub const fn balance(&self) -> Amount {
        self.balance
    }

    /// Staked amount.
    pub const fn stake(&self) -> Amount {
        self.stake
    }

    /// Accrued reward.
    pub const fn reward(&self) -> Amount {
        self.reward
    }

    /// Whether the snapshot reflects a successful fetch.
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// New snapshot with the balance adjusted.
    pub fn with_balance_delta(self, delta: Delta) -> Result<Self, AmountError> {
        Ok(Self {
            balance: delta.apply(self.balance)?,
            ..self
        })
    }

    /// New snapshot with the stake adjusted.
    pub fn with_stake_delta(self, delta: Delta) -> Result<Self, AmountError> {
        Ok(Self {
            stake: delta.apply(self.stake)?,
            ..self
        })
    }

    /// New snapshot with the reward adjusted.
    pub fn with_reward_delta(self, delta: Delta) -> Result<Self, AmountError> {
        Ok(Self {
            reward: delta.apply(self.reward)?,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    #[test]
    fn test_empty_is_unloaded_zero() {
        let state = StakeAccountState::empty();
        assert!(!state.is_loaded());
        assert!(state.balance().is_zero());
        assert!(state.stake().is_zero());
        assert!(state.reward().is_zero());
        assert_eq!(state, StakeAccountState::default());
    }

    #[test]
    fn test_replace_and_invalidate() {
        let state = StakeAccountState::replace(tokens(500), tokens(200), tokens(15));
        assert!(state.is_loaded());

        let stale = state.invalidate();
        assert!(!stale.is_loaded());
        assert_eq!(stale.balance(), tokens(500));
        assert_eq!(stale.stake(), tokens(200));
        assert_eq!(stale.reward(), tokens(15));
    }

    #[test]
    fn test_deltas_touch_one_field() {
        let state = StakeAccountState::replace(tokens(100), tokens(10), tokens(1));

        let next = state.with_balance_delta(Delta::Debit(tokens(40))).unwrap();
        assert_eq!(next, StakeAccountState::replace(tokens(60), tokens(10), tokens(1)));

        let next = state.with_stake_delta(Delta::Credit(tokens(5))).unwrap();
        assert_eq!(next, StakeAccountState::replace(tokens(100), tokens(15), tokens(1)));

        let next = state.with_reward_delta(Delta::Debit(tokens(1))).unwrap();
        assert_eq!(next, StakeAccountState::replace(tokens(100), tokens(10), Amount::ZERO));
    }

    #[test]
    fn test_underflow_leaves_state_untouched() {
        let state = StakeAccountState::replace(tokens(100), Amount::ZERO, Amount::ZERO);

        assert_eq!(
            state.with_stake_delta(Delta::Debit(tokens(10))),
            Err(AmountError::Underflow)
        );
        assert_eq!(state.stake(), Amount::ZERO);
        assert_eq!(state.balance(), tokens(100));
    }
}
