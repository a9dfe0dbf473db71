//! Optimistic reconciliation of a stake account with a remote ledger.
//!
//! # Components
//!
//! - [`StakeAccountState`] - Immutable snapshot of balance, stake and reward
//! - [`PendingAction`] / [`LedgerCall`] - User request and its validated form
//! - [`ActionGuard`] - Pre-flight checks run before any remote call
//! - [`EngineHandle`] / [`ReconciliationService`] - The engine actor
//! - [`Notification`] - One user-visible message per outcome
//!
//! The snapshot shown to the user is a best-effort projection: confirmed
//! effects are derived locally rather than re-fetched, so anything the
//! ledger does beyond the requested delta (fees, reward accrual during the
//! call) only appears after an explicit refresh.

mod action;
mod engine;
mod error;
mod guard;
mod metrics;
mod notification;
mod state;

pub use action::{ActionKind, LedgerCall, PendingAction, VESTING_RESTART_WARNING};
pub use engine::{
    EngineHandle, NOTIFICATION_CAPACITY, ReconciliationService, create_engine, spawn_engine,
};
pub use error::StakerError;
pub use guard::{ActionGuard, GuardViolation};
pub use notification::{Notification, NotificationLevel};
pub use state::{Delta, StakeAccountState};
