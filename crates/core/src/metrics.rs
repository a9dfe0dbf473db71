//! Reconciliation engine metrics.

use metrics::Counter;

use crate::ActionKind;

/// Counters for engine activity.
#[derive(Clone, Debug)]
pub(crate) struct EngineMetrics {
    /// Number of account refreshes started
    refreshes_total: Counter,
    /// Number of operations rejected because another was in flight
    busy_rejections_total: Counter,
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self {
            refreshes_total: metrics::counter!("staker.engine.refreshes_total"),
            busy_rejections_total: metrics::counter!("staker.engine.busy_rejections_total"),
        }
    }
}

impl EngineMetrics {
    pub(crate) fn inc_refreshes(&self) {
        self.refreshes_total.increment(1);
    }

    pub(crate) fn inc_busy_rejections(&self) {
        self.busy_rejections_total.increment(1);
    }

    /// An action passed validation and was sent to the ledger.
    pub(crate) fn inc_submitted(&self, kind: ActionKind) {
        let action: &'static str = kind.into();
        metrics::counter!("staker.engine.actions_submitted_total", "action" => action).increment(1);
    }

    /// The ledger confirmed an action and its effect was applied.
    pub(crate) fn inc_confirmed(&self, kind: ActionKind) {
        let action: &'static str = kind.into();
        metrics::counter!("staker.engine.actions_confirmed_total", "action" => action).increment(1);
    }

    /// An action failed at any stage.
    pub(crate) fn inc_failed(&self, kind: ActionKind) {
        let action: &'static str = kind.into();
        metrics::counter!("staker.engine.actions_failed_total", "action" => action).increment(1);
    }
}
