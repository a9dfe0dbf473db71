//! Cloneable handle for interacting with the reconciliation service.

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::engine::service::EngineCommand;
use crate::{Notification, PendingAction, StakeAccountState, StakerError};

/// Cloneable handle for loading the account and submitting actions.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    state_rx: watch::Receiver<StakeAccountState>,
    notification_tx: broadcast::Sender<Notification>,
}

impl EngineHandle {
    pub(crate) fn new(
        command_tx: mpsc::UnboundedSender<EngineCommand>,
        state_rx: watch::Receiver<StakeAccountState>,
        notification_tx: broadcast::Sender<Notification>,
    ) -> Self {
        Self {
            command_tx,
            state_rx,
            notification_tx,
        }
    }

    /// Fetch balance, stake and reward from the ledger, replacing the
    /// snapshot wholesale.
    pub async fn load_account(&self) -> Result<StakeAccountState, StakerError> {
        self.request(|response_tx| EngineCommand::Load { response_tx })
            .await
    }

    /// Validate `action` and send it to the ledger.
    ///
    /// `confirmed` records that the user acknowledged the vesting restart;
    /// stake resizing actions are refused without it. Returns the snapshot
    /// after the confirmed effect was applied.
    pub async fn submit(
        &self,
        action: PendingAction,
        confirmed: bool,
    ) -> Result<StakeAccountState, StakerError> {
        self.request(|response_tx| EngineCommand::Submit {
            action,
            confirmed,
            response_tx,
        })
        .await
    }

    /// Latest committed snapshot.
    pub fn current_state(&self) -> StakeAccountState {
        *self.state_rx.borrow()
    }

    /// Receiver that observes every committed snapshot.
    pub fn watch_state(&self) -> watch::Receiver<StakeAccountState> {
        self.state_rx.clone()
    }

    /// Subscribe to notifications emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notification_tx.subscribe()
    }

    async fn request<F>(&self, command: F) -> Result<StakeAccountState, StakerError>
    where
        F: FnOnce(oneshot::Sender<Result<StakeAccountState, StakerError>>) -> EngineCommand,
    {
        let (tx, rx) = oneshot::channel();

        self.command_tx
            .send(command(tx))
            .map_err(|_| StakerError::ServiceStopped)?;

        rx.await.map_err(|_| StakerError::ServiceStopped)?
    }
}
