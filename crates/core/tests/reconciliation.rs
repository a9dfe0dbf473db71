//! End-to-end behaviour of the reconciliation engine.

use std::sync::Arc;

use assert_matches::assert_matches;
use staker_api::{Balances, RemoteError, RemoteLedger};
use staker_contract::{ContractLedger, MemoryStaker, STAKER_ADDRESS};
use staker_core::{
    ActionKind, EngineHandle, GuardViolation, NotificationLevel, PendingAction,
    StakeAccountState, StakerError, VESTING_RESTART_WARNING, create_engine, spawn_engine,
};
use staker_primitives::{Address, Amount};
use staker_test_utils::{LedgerRequest, MockLedger};
use tokio::sync::broadcast::error::TryRecvError;

fn tokens(n: u64) -> Amount {
    Amount::from_tokens(n)
}

async fn loaded(ledger: &Arc<MockLedger>) -> EngineHandle {
    let handle = spawn_engine(Arc::clone(ledger));
    handle.load_account().await.unwrap();
    handle
}

#[tokio::test]
async fn test_load_replaces_snapshot() {
    let ledger = Arc::new(MockLedger::with_tokens(500, 200, 15));
    let handle = spawn_engine(Arc::clone(&ledger));

    assert!(!handle.current_state().is_loaded());

    let state = handle.load_account().await.unwrap();
    assert_eq!(state, StakeAccountState::replace(tokens(500), tokens(200), tokens(15)));
    assert!(state.is_loaded());
    assert_eq!(handle.current_state(), state);
}

#[tokio::test]
async fn test_claim_moves_reward_to_balance() {
    let ledger = Arc::new(MockLedger::with_tokens(500, 200, 15));
    let handle = loaded(&ledger).await;
    let mut notifications = handle.subscribe();

    let state = handle
        .submit(PendingAction::claim_reward(), false)
        .await
        .unwrap();

    assert_eq!(state.balance(), tokens(515));
    assert_eq!(state.stake(), tokens(200));
    assert_eq!(state.reward(), Amount::ZERO);

    let notification = notifications.try_recv().unwrap();
    assert_eq!(notification.level, NotificationLevel::Success);
    assert_eq!(notification.text, "Reward has been added to Balance");
}

#[tokio::test]
async fn test_stake_resizing_requires_confirmation() {
    let ledger = Arc::new(MockLedger::with_tokens(500, 200, 0));
    let handle = loaded(&ledger).await;
    let before = handle.current_state();
    let mut notifications = handle.subscribe();

    let err = handle
        .submit(PendingAction::increase_stake(tokens(100)), false)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StakerError::ConfirmationRequired {
            action: ActionKind::IncreaseStake
        }
    );
    assert_eq!(err.to_string(), VESTING_RESTART_WARNING);
    let notification = notifications.try_recv().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.text, VESTING_RESTART_WARNING);

    let err = handle
        .submit(PendingAction::decrease_stake(tokens(50)), false)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StakerError::ConfirmationRequired {
            action: ActionKind::DecreaseStake
        }
    );

    // Validation comes first: an action that cannot go through never asks.
    let err = handle
        .submit(PendingAction::increase_stake(tokens(600)), false)
        .await
        .unwrap_err();
    assert_eq!(err, StakerError::Validation(GuardViolation::InsufficientBalance));

    assert_eq!(ledger.mutating_calls(), 0);
    assert_eq!(handle.current_state(), before);

    let state = handle
        .submit(PendingAction::increase_stake(tokens(100)), true)
        .await
        .unwrap();
    assert_eq!(state.balance(), tokens(400));
    assert_eq!(state.stake(), tokens(300));

    let state = handle
        .submit(PendingAction::decrease_stake(tokens(50)), true)
        .await
        .unwrap();
    assert_eq!(state.balance(), tokens(450));
    assert_eq!(state.stake(), tokens(250));
}

#[tokio::test]
async fn test_invalid_recipient_never_reaches_ledger() {
    let ledger = Arc::new(MockLedger::with_tokens(500, 0, 0));
    let handle = loaded(&ledger).await;
    let mut notifications = handle.subscribe();

    let err = handle
        .submit(PendingAction::transfer("", tokens(10)), false)
        .await
        .unwrap_err();

    assert_eq!(err, StakerError::Validation(GuardViolation::InvalidRecipient));
    assert_eq!(ledger.transfer_calls(), 0);

    let notification = notifications.try_recv().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.text, "invalid recipient");
}

#[tokio::test]
async fn test_insufficient_balance_never_reaches_ledger() {
    let ledger = Arc::new(MockLedger::with_tokens(500, 0, 0));
    let handle = loaded(&ledger).await;

    let err = handle
        .submit(PendingAction::increase_stake(tokens(600)), true)
        .await
        .unwrap_err();

    assert_eq!(err, StakerError::Validation(GuardViolation::InsufficientBalance));
    assert_eq!(ledger.mutating_calls(), 0);
}

#[tokio::test]
async fn test_remote_failure_leaves_state_untouched() {
    let ledger = Arc::new(MockLedger::with_tokens(100, 10, 0));
    let handle = loaded(&ledger).await;
    let before = handle.current_state();
    let mut notifications = handle.subscribe();

    ledger.revert_next("insufficient stake");
    let err = handle
        .submit(PendingAction::decrease_stake(tokens(10)), true)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StakerError::RemoteCall {
            action: ActionKind::DecreaseStake,
            reason: "insufficient stake".to_owned(),
        }
    );
    assert_eq!(handle.current_state(), before);

    let notification = notifications.try_recv().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.text, "insufficient stake");
}

#[tokio::test]
async fn test_decrease_without_stake_is_rejected_locally() {
    let ledger = Arc::new(MockLedger::with_tokens(100, 0, 0));
    let handle = loaded(&ledger).await;
    let before = handle.current_state();
    let mut notifications = handle.subscribe();

    let err = handle
        .submit(PendingAction::decrease_stake(tokens(10)), true)
        .await
        .unwrap_err();

    assert_eq!(err, StakerError::Validation(GuardViolation::InsufficientStake));
    assert_eq!(handle.current_state(), before);
    assert_eq!(ledger.mutating_calls(), 0);
    assert_eq!(notifications.try_recv().unwrap().text, "insufficient stake");
}

#[tokio::test]
async fn test_wallet_rejection_reason_is_verbatim() {
    let ledger = Arc::new(MockLedger::with_tokens(100, 0, 0));
    let handle = loaded(&ledger).await;

    ledger.respond_with(Err(RemoteError::user_rejected()));
    let err = handle
        .submit(
            PendingAction::transfer(format!("{}", Address::repeat_byte(0x11)), tokens(1)),
            false,
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "User denied transaction signature.");
    assert_eq!(handle.current_state().balance(), tokens(100));
}

#[tokio::test]
async fn test_unconfirmed_result_is_a_failure() {
    let ledger = Arc::new(MockLedger::with_tokens(100, 0, 0));
    let handle = loaded(&ledger).await;

    ledger.respond_with(Ok(false));
    let err = handle
        .submit(PendingAction::increase_stake(tokens(5)), true)
        .await
        .unwrap_err();

    assert_matches!(err, StakerError::RemoteCall { action: ActionKind::IncreaseStake, reason } if reason == "transaction was not confirmed");
    assert_eq!(handle.current_state().balance(), tokens(100));
}

#[tokio::test]
async fn test_actions_require_a_loaded_account() {
    let ledger = Arc::new(MockLedger::with_tokens(100, 0, 0));
    let handle = spawn_engine(Arc::clone(&ledger));

    let err = handle
        .submit(PendingAction::increase_stake(tokens(5)), true)
        .await
        .unwrap_err();

    assert_eq!(err, StakerError::NotLoaded);
    assert_eq!(ledger.mutating_calls(), 0);
}

#[tokio::test]
async fn test_fetch_failure_invalidates_snapshot() {
    let ledger = Arc::new(MockLedger::with_tokens(100, 20, 3));
    let handle = loaded(&ledger).await;
    let mut notifications = handle.subscribe();

    ledger.fail_fetch(RemoteError::new(None, "network unreachable"));
    let err = handle.load_account().await.unwrap_err();
    assert_eq!(
        err,
        StakerError::Fetch {
            reason: "network unreachable".to_owned()
        }
    );

    let state = handle.current_state();
    assert!(!state.is_loaded());
    assert_eq!(state.balance(), tokens(100));
    assert_eq!(notifications.try_recv().unwrap().level, NotificationLevel::Error);

    let err = handle
        .submit(PendingAction::claim_reward(), false)
        .await
        .unwrap_err();
    assert_eq!(err, StakerError::NotLoaded);

    ledger.set_balances(Balances {
        balance: tokens(1),
        stake: tokens(2),
        reward: tokens(3),
    });
    assert!(handle.load_account().await.unwrap().is_loaded());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_operation_while_pending_is_busy() {
    let ledger = Arc::new(MockLedger::with_tokens(500, 0, 10));
    let handle = loaded(&ledger).await;

    let mut held = ledger.hold_next();
    let first = tokio::spawn({
        let handle = handle.clone();
        async move { handle.submit(PendingAction::claim_reward(), false).await }
    });
    held.started().await;

    let err = handle
        .submit(PendingAction::increase_stake(tokens(1)), true)
        .await
        .unwrap_err();
    assert_eq!(err, StakerError::Busy);
    assert_eq!(handle.load_account().await.unwrap_err(), StakerError::Busy);

    // Nothing changed while the call is pending.
    assert_eq!(handle.current_state().reward(), tokens(10));

    held.release();
    let state = first.await.unwrap().unwrap();
    assert_eq!(state.balance(), tokens(510));

    assert_eq!(
        ledger.requests(),
        vec![LedgerRequest::FetchBalances, LedgerRequest::ClaimReward]
    );
}

#[tokio::test]
async fn test_exactly_one_notification_per_submit() {
    let ledger = Arc::new(MockLedger::with_tokens(50, 0, 0));
    let handle = loaded(&ledger).await;
    let mut notifications = handle.subscribe();

    let recipient = format!("{}", Address::repeat_byte(0x22));
    let _ = handle
        .submit(PendingAction::transfer(recipient.clone(), tokens(5)), false)
        .await;
    let _ = handle
        .submit(PendingAction::transfer(recipient.clone(), tokens(500)), false)
        .await;
    ledger.revert_next("paused");
    let _ = handle
        .submit(PendingAction::transfer(recipient, tokens(5)), false)
        .await;

    let levels: Vec<_> = std::iter::from_fn(|| notifications.try_recv().ok())
        .map(|n| n.level)
        .collect();
    assert_eq!(
        levels,
        vec![
            NotificationLevel::Success,
            NotificationLevel::Error,
            NotificationLevel::Error
        ]
    );
    assert_eq!(notifications.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn test_watchers_see_committed_snapshots() {
    let ledger = Arc::new(MockLedger::with_tokens(10, 0, 0));
    let handle = loaded(&ledger).await;
    let mut watcher = handle.watch_state();
    watcher.mark_unchanged();

    handle
        .submit(PendingAction::increase_stake(tokens(4)), true)
        .await
        .unwrap();

    assert!(watcher.has_changed().unwrap());
    assert_eq!(watcher.borrow_and_update().stake(), tokens(4));
}

#[tokio::test]
async fn test_engine_tracks_contract_ledger() {
    let account = Address::repeat_byte(0xaa);
    let ledger = Arc::new(ContractLedger::new(
        MemoryStaker::new(
            STAKER_ADDRESS,
            account,
            Balances {
                balance: tokens(500),
                stake: tokens(200),
                reward: tokens(15),
            },
        ),
        STAKER_ADDRESS,
    ));
    let handle = spawn_engine(Arc::clone(&ledger));
    handle.load_account().await.unwrap();

    let recipient = Address::repeat_byte(0x42).to_checksum(None);
    handle.submit(PendingAction::claim_reward(), false).await.unwrap();
    handle
        .submit(PendingAction::increase_stake(tokens(120)), true)
        .await
        .unwrap();
    handle
        .submit(PendingAction::decrease_stake(tokens(20)), true)
        .await
        .unwrap();
    handle
        .submit(PendingAction::transfer(recipient, tokens(15)), false)
        .await
        .unwrap();

    // The projected snapshot matches a fresh read of the ledger.
    let projected = handle.current_state();
    let remote = ledger.fetch_balances().await.unwrap();
    assert_eq!(
        projected,
        StakeAccountState::replace(remote.balance, remote.stake, remote.reward)
    );
    assert_eq!(projected.balance(), tokens(400));
    assert_eq!(projected.stake(), tokens(300));
    assert_eq!(ledger.transport().vesting_restarts(), 2);
    assert_eq!(
        ledger.transport().balance_of(Address::repeat_byte(0x42)),
        tokens(15)
    );
}

#[tokio::test]
async fn test_contract_revert_surfaces_reason() {
    let ledger = Arc::new(ContractLedger::new(
        MemoryStaker::new(
            STAKER_ADDRESS,
            Address::repeat_byte(0xaa),
            Balances {
                balance: tokens(100),
                stake: Amount::ZERO,
                reward: Amount::ZERO,
            },
        ),
        STAKER_ADDRESS,
    ));
    let handle = spawn_engine(Arc::clone(&ledger));
    handle.load_account().await.unwrap();

    ledger.transport().reject_next(RemoteError::user_rejected());
    let err = handle
        .submit(PendingAction::increase_stake(tokens(10)), true)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("User denied"));
    assert_eq!(handle.current_state().balance(), tokens(100));
    assert_eq!(ledger.transport().vesting_restarts(), 0);
}

#[tokio::test]
async fn test_service_stops_when_handles_dropped() {
    let (handle, service) = create_engine(MockLedger::with_tokens(1, 0, 0));
    let task = tokio::spawn(service.into_task());

    handle.load_account().await.unwrap();
    drop(handle);

    task.await.unwrap();
}

#[tokio::test]
async fn test_stopped_service_is_reported() {
    let (handle, service) = create_engine(MockLedger::with_tokens(1, 0, 0));
    drop(service);

    assert_eq!(
        handle.load_account().await.unwrap_err(),
        StakerError::ServiceStopped
    );
}
