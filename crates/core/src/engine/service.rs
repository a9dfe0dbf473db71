//! Reconciliation service actor (runs in its own tokio task).

use std::sync::Arc;

use staker_api::{Balances, RemoteError, RemoteLedger};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::metrics::EngineMetrics;
use crate::{
    ActionGuard, ActionKind, LedgerCall, Notification, PendingAction, StakeAccountState,
    StakerError,
};

/// Reason reported when the ledger answers a call with `false`.
const UNCONFIRMED_REASON: &str = "transaction was not confirmed";

type Response = oneshot::Sender<Result<StakeAccountState, StakerError>>;

/// Commands from the handle to the service.
#[derive(Debug)]
pub(crate) enum EngineCommand {
    /// Refresh the snapshot from the ledger.
    Load {
        /// Channel to send the refreshed snapshot.
        response_tx: Response,
    },
    /// Validate and send an action.
    Submit {
        /// The requested action.
        action: PendingAction,
        /// Whether the user acknowledged the vesting restart.
        confirmed: bool,
        /// Channel to send the resulting snapshot.
        response_tx: Response,
    },
}

/// The single ledger operation currently awaiting the remote side.
enum InFlight {
    Refresh { response_tx: Response },
    Action { call: LedgerCall, response_tx: Response },
}

/// Result of a remote call, reported back by the task that awaited it.
enum Completion {
    Fetched(Result<Balances, RemoteError>),
    Confirmed(Result<bool, RemoteError>),
}

/// Owns the account snapshot and serialises every ledger operation.
///
/// Remote calls run on their own tasks and report back through a completion
/// channel, so the service keeps answering commands (with `Busy`) while a
/// call is in flight.
pub struct ReconciliationService<L> {
    /// Receive commands from handles.
    command_rx: mpsc::UnboundedReceiver<EngineCommand>,
    /// Completion channel handed to remote call tasks.
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    ledger: Arc<L>,
    /// Last committed snapshot.
    state: StakeAccountState,
    /// Publishes committed snapshots to readers.
    state_tx: watch::Sender<StakeAccountState>,
    notification_tx: broadcast::Sender<Notification>,
    in_flight: Option<InFlight>,
    metrics: EngineMetrics,
}

impl<L: RemoteLedger + 'static> ReconciliationService<L> {
    pub(crate) fn new(
        command_rx: mpsc::UnboundedReceiver<EngineCommand>,
        ledger: Arc<L>,
        state_tx: watch::Sender<StakeAccountState>,
        notification_tx: broadcast::Sender<Notification>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let state = *state_tx.borrow();
        Self {
            command_rx,
            completion_tx,
            completion_rx,
            ledger,
            state,
            state_tx,
            notification_tx,
            in_flight: None,
            metrics: EngineMetrics::default(),
        }
    }

    /// Run the service event loop.
    ///
    /// Runs until every handle is dropped and no operation is in flight.
    pub async fn run(mut self) {
        let mut accepting = true;
        loop {
            tokio::select! {
                cmd = self.command_rx.recv(), if accepting => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => accepting = false,
                },
                Some(done) = self.completion_rx.recv() => {
                    self.handle_completion(done);
                }
            }

            if !accepting && self.in_flight.is_none() {
                debug!("Reconciliation service shutting down");
                break;
            }
        }
    }

    /// Convert self into a spawnable future.
    pub async fn into_task(self) {
        self.run().await;
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Load { response_tx } => {
                if self.in_flight.is_some() {
                    self.metrics.inc_busy_rejections();
                    self.fail_refresh(StakerError::Busy, response_tx);
                    return;
                }

                debug!("Refreshing account from ledger");
                self.metrics.inc_refreshes();
                self.in_flight = Some(InFlight::Refresh { response_tx });

                let ledger = Arc::clone(&self.ledger);
                self.spawn_remote(
                    async move { ledger.fetch_balances().await },
                    Completion::Fetched,
                );
            }
            EngineCommand::Submit {
                action,
                confirmed,
                response_tx,
            } => {
                let kind = action.kind();
                match self.prepare(&action, confirmed) {
                    Ok(call) => {
                        debug!(action = %kind, ?call, "Sending action to ledger");
                        self.metrics.inc_submitted(kind);
                        self.in_flight = Some(InFlight::Action { call, response_tx });
                        self.dispatch(call);
                    }
                    Err(err) => self.fail_action(kind, err, response_tx),
                }
            }
        }
    }

    /// Everything that must hold before an action is sent.
    fn prepare(&self, action: &PendingAction, confirmed: bool) -> Result<LedgerCall, StakerError> {
        if self.in_flight.is_some() {
            self.metrics.inc_busy_rejections();
            return Err(StakerError::Busy);
        }
        if !self.state.is_loaded() {
            return Err(StakerError::NotLoaded);
        }

        let call = ActionGuard::check(&self.state, action)?;

        if call.kind().restarts_vesting() && !confirmed {
            return Err(StakerError::ConfirmationRequired {
                action: call.kind(),
            });
        }

        Ok(call)
    }

    fn dispatch(&self, call: LedgerCall) {
        let ledger = Arc::clone(&self.ledger);
        self.spawn_remote(
            async move {
                match call {
                    LedgerCall::IncreaseStake(amount) => ledger.increase_stake(amount).await,
                    LedgerCall::DecreaseStake(amount) => ledger.decrease_stake(amount).await,
                    LedgerCall::ClaimReward(_) => ledger.claim_reward().await,
                    LedgerCall::Transfer { recipient, amount } => {
                        ledger.transfer(recipient, amount).await
                    }
                }
            },
            Completion::Confirmed,
        );
    }

    /// Await `call` on its own task and report the result as a completion.
    ///
    /// A panicking ledger call is reported as a remote failure so the
    /// service never waits forever.
    fn spawn_remote<T, F>(&self, call: F, complete: fn(Result<T, RemoteError>) -> Completion)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, RemoteError>> + Send + 'static,
    {
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = tokio::spawn(call).await.unwrap_or_else(|e| {
                Err(RemoteError::new(None, format!("ledger call aborted: {e}")))
            });
            let _ = completion_tx.send(complete(result));
        });
    }

    fn handle_completion(&mut self, done: Completion) {
        match (self.in_flight.take(), done) {
            (Some(InFlight::Refresh { response_tx }), Completion::Fetched(result)) => {
                self.finish_refresh(result, response_tx);
            }
            (Some(InFlight::Action { call, response_tx }), Completion::Confirmed(result)) => {
                self.finish_action(call, result, response_tx);
            }
            (in_flight, _) => {
                warn!("Ledger completion does not match the operation in flight");
                self.in_flight = in_flight;
            }
        }
    }

    fn finish_refresh(&mut self, result: Result<Balances, RemoteError>, response_tx: Response) {
        match result {
            Ok(Balances {
                balance,
                stake,
                reward,
            }) => {
                self.commit(StakeAccountState::replace(balance, stake, reward));
                debug!(%balance, %stake, %reward, "Account loaded");
                let _ = response_tx.send(Ok(self.state));
            }
            Err(err) => {
                self.commit(self.state.invalidate());
                self.fail_refresh(
                    StakerError::Fetch {
                        reason: err.reason().to_owned(),
                    },
                    response_tx,
                );
            }
        }
    }

    fn finish_action(
        &mut self,
        call: LedgerCall,
        result: Result<bool, RemoteError>,
        response_tx: Response,
    ) {
        let kind = call.kind();
        let applied = match result {
            Ok(true) => call.apply(self.state).map_err(StakerError::from),
            Ok(false) => Err(StakerError::RemoteCall {
                action: kind,
                reason: UNCONFIRMED_REASON.to_owned(),
            }),
            Err(err) => Err(StakerError::RemoteCall {
                action: kind,
                reason: err.reason().to_owned(),
            }),
        };

        match applied {
            Ok(next) => {
                self.commit(next);
                self.metrics.inc_confirmed(kind);
                info!(
                    action = %kind,
                    balance = %next.balance(),
                    stake = %next.stake(),
                    reward = %next.reward(),
                    "Action confirmed"
                );
                self.notify(Notification::success(kind.success_message()));
                let _ = response_tx.send(Ok(next));
            }
            Err(err) => self.fail_action(kind, err, response_tx),
        }
    }

    fn fail_action(&self, kind: ActionKind, err: StakerError, response_tx: Response) {
        warn!(action = %kind, %err, "Action failed");
        self.metrics.inc_failed(kind);
        self.notify(Notification::error(err.to_string()));
        let _ = response_tx.send(Err(err));
    }

    fn fail_refresh(&self, err: StakerError, response_tx: Response) {
        warn!(%err, "Account refresh failed");
        self.notify(Notification::error(err.to_string()));
        let _ = response_tx.send(Err(err));
    }

    fn commit(&mut self, next: StakeAccountState) {
        self.state = next;
        self.state_tx.send_replace(next);
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine.
        let _ = self.notification_tx.send(notification);
    }
}
