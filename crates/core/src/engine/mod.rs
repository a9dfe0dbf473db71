//! Reconciliation engine.
//!
//! Keeps the local [`StakeAccountState`] in step with the remote ledger
//! across asynchronous, fallible, user-confirmed operations.
//!
//! # Actor Pattern
//!
//! - [`ReconciliationService`] owns the snapshot and runs in its own tokio task
//! - [`EngineHandle`] is cheap to clone and sends commands to the service
//!
//! Use [`create_engine`] to build the pair, or [`spawn_engine`] to build it
//! and spawn the service on the current runtime.
//!
//! # Serialisation
//!
//! At most one ledger operation (refresh or action) is in flight. Anything
//! submitted meanwhile is rejected with [`StakerError::Busy`](crate::StakerError::Busy)
//! rather than queued. Once sent, an operation always runs to completion.
//!
//! # Lifecycle of an action
//!
//! ```text
//! Idle -> Validating -> AwaitingRemote -> Applying | Reporting -> Idle
//! ```
//!
//! On confirmation the effect is projected onto the snapshot without a
//! re-fetch. On any failure the snapshot is left exactly as it was.

mod handle;
mod service;

pub use handle::EngineHandle;
pub use service::ReconciliationService;

use std::sync::Arc;

use staker_api::RemoteLedger;
use tokio::sync::{broadcast, mpsc, watch};

use crate::StakeAccountState;

/// Capacity of the notification channel. Slow subscribers miss the oldest
/// messages beyond this.
pub const NOTIFICATION_CAPACITY: usize = 64;

/// Create an engine (service and handle pair) over `ledger`.
///
/// The service must be spawned (see [`ReconciliationService::into_task`])
/// before the handle is used.
pub fn create_engine<L: RemoteLedger + 'static>(
    ledger: L,
) -> (EngineHandle, ReconciliationService<L>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(StakeAccountState::empty());
    let (notification_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

    let service = ReconciliationService::new(
        command_rx,
        Arc::new(ledger),
        state_tx,
        notification_tx.clone(),
    );
    let handle = EngineHandle::new(command_tx, state_rx, notification_tx);

    (handle, service)
}

/// Create an engine and spawn its service on the current tokio runtime.
pub fn spawn_engine<L: RemoteLedger + 'static>(ledger: L) -> EngineHandle {
    let (handle, service) = create_engine(ledger);
    tokio::spawn(service.into_task());
    handle
}
