//! Pre-flight validation.
//!
//! Checks run synchronously against the current snapshot before any remote
//! call is issued, so that doomed requests never reach the wallet.

use staker_primitives::{AddressError, Amount, parse_recipient};

use crate::{LedgerCall, PendingAction, StakeAccountState};

/// Reason an action was rejected before reaching the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardViolation {
    /// Amount is zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// Amount exceeds the available balance.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Amount exceeds the staked amount.
    #[error("insufficient stake")]
    InsufficientStake,

    /// Nothing has accrued.
    #[error("no reward to claim")]
    NoReward,

    /// Recipient is not a well-formed ledger address.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// Recipient is the zero address.
    #[error("recipient is the zero address")]
    ZeroRecipient,
}

/// Validates actions against an account snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionGuard;

impl ActionGuard {
    /// Check `action` against `state`, producing the call to send.
    pub fn check(
        state: &StakeAccountState,
        action: &PendingAction,
    ) -> Result<LedgerCall, GuardViolation> {
        match action {
            PendingAction::IncreaseStake { amount } => {
                non_zero(*amount)?;
                covered(*amount, state.balance(), GuardViolation::InsufficientBalance)?;
                Ok(LedgerCall::IncreaseStake(*amount))
            }
            PendingAction::DecreaseStake { amount } => {
                non_zero(*amount)?;
                covered(*amount, state.stake(), GuardViolation::InsufficientStake)?;
                Ok(LedgerCall::DecreaseStake(*amount))
            }
            PendingAction::ClaimReward => {
                if state.reward().is_zero() {
                    return Err(GuardViolation::NoReward);
                }
                Ok(LedgerCall::ClaimReward(state.reward()))
            }
            PendingAction::Transfer { recipient, amount } => {
                let recipient = parse_recipient(recipient).map_err(|e| match e {
                    AddressError::Zero => GuardViolation::ZeroRecipient,
                    AddressError::Malformed | AddressError::BadChecksum => {
                        GuardViolation::InvalidRecipient
                    }
                })?;
                non_zero(*amount)?;
                covered(*amount, state.balance(), GuardViolation::InsufficientBalance)?;
                Ok(LedgerCall::Transfer {
                    recipient,
                    amount: *amount,
                })
            }
        }
    }
}

fn non_zero(amount: Amount) -> Result<(), GuardViolation> {
    if amount.is_zero() {
        return Err(GuardViolation::ZeroAmount);
    }
    Ok(())
}

fn covered(amount: Amount, available: Amount, shortfall: GuardViolation) -> Result<(), GuardViolation> {
    if amount > available {
        return Err(shortfall);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use staker_primitives::Address;

    const RECIPIENT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    fn state() -> StakeAccountState {
        StakeAccountState::replace(tokens(500), tokens(200), tokens(15))
    }

    #[test]
    fn test_increase_stake_bounds() {
        let state = state();

        assert_eq!(
            ActionGuard::check(&state, &PendingAction::increase_stake(tokens(500))),
            Ok(LedgerCall::IncreaseStake(tokens(500)))
        );
        assert_eq!(
            ActionGuard::check(&state, &PendingAction::increase_stake(tokens(600))),
            Err(GuardViolation::InsufficientBalance)
        );
        assert_eq!(
            ActionGuard::check(&state, &PendingAction::increase_stake(Amount::ZERO)),
            Err(GuardViolation::ZeroAmount)
        );
    }

    #[test]
    fn test_decrease_stake_bounds() {
        let state = state();

        assert_eq!(
            ActionGuard::check(&state, &PendingAction::decrease_stake(tokens(200))),
            Ok(LedgerCall::DecreaseStake(tokens(200)))
        );
        assert_eq!(
            ActionGuard::check(&state, &PendingAction::decrease_stake(tokens(201))),
            Err(GuardViolation::InsufficientStake)
        );
    }

    #[test]
    fn test_claim_requires_reward() {
        assert_eq!(
            ActionGuard::check(&state(), &PendingAction::claim_reward()),
            Ok(LedgerCall::ClaimReward(tokens(15)))
        );

        let no_reward = StakeAccountState::replace(tokens(1), tokens(1), Amount::ZERO);
        assert_eq!(
            ActionGuard::check(&no_reward, &PendingAction::claim_reward()),
            Err(GuardViolation::NoReward)
        );
    }

    #[test]
    fn test_transfer_recipient() {
        let state = state();

        assert_eq!(
            ActionGuard::check(&state, &PendingAction::transfer(RECIPIENT, tokens(10))),
            Ok(LedgerCall::Transfer {
                recipient: RECIPIENT.parse::<Address>().unwrap(),
                amount: tokens(10),
            })
        );

        let err = ActionGuard::check(&state, &PendingAction::transfer("", tokens(10))).unwrap_err();
        assert_eq!(err, GuardViolation::InvalidRecipient);
        assert_eq!(err.to_string(), "invalid recipient");

        assert_eq!(
            ActionGuard::check(&state, &PendingAction::transfer("not-an-address", tokens(10))),
            Err(GuardViolation::InvalidRecipient)
        );
        assert_eq!(
            ActionGuard::check(
                &state,
                &PendingAction::transfer("0x0000000000000000000000000000000000000000", tokens(10))
            ),
            Err(GuardViolation::ZeroRecipient)
        );
    }

    #[test]
    fn test_transfer_amount() {
        let state = state();

        assert_eq!(
            ActionGuard::check(&state, &PendingAction::transfer(RECIPIENT, tokens(501))),
            Err(GuardViolation::InsufficientBalance)
        );
        assert_eq!(
            ActionGuard::check(&state, &PendingAction::transfer(RECIPIENT, Amount::ZERO)),
            Err(GuardViolation::ZeroAmount)
        );
    }
}
