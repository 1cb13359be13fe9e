//! Run ledger port — the audit trail of automation executions.

use std::future::Future;
use std::sync::Arc;

use fieldops_domain::error::FieldOpsError;
use fieldops_domain::id::{AutomationId, RunId};
use fieldops_domain::run::{Run, RunOutcome};
use fieldops_domain::trigger_data::TriggerData;

/// Creates, closes and queries [`Run`] records.
pub trait RunLedger {
    /// Create and persist a new `running` record.
    fn open(
        &self,
        automation_id: AutomationId,
        trigger_data: TriggerData,
    ) -> impl Future<Output = Result<Run, FieldOpsError>> + Send;

    /// Move a run into its terminal state and stamp `completed_at`.
    ///
    /// Only a run that is still `running` is changed. Returns `true` when
    /// this call closed the run and `false` when it was already terminal
    /// (or does not exist), in which case nothing is written.
    fn close(
        &self,
        run_id: RunId,
        outcome: RunOutcome,
    ) -> impl Future<Output = Result<bool, FieldOpsError>> + Send;

    /// Get a run by id.
    fn get(&self, run_id: RunId) -> impl Future<Output = Result<Option<Run>, FieldOpsError>> + Send;

    /// List the runs of one automation, newest first.
    fn list_for_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Run>, FieldOpsError>> + Send;

    /// Fail every run still `running`, keeping its `actions_executed`.
    ///
    /// Meant to be called once at startup: in a single-process deployment a
    /// run that is still `running` then was cut off mid-delay by a restart.
    /// Returns the number of runs closed.
    fn fail_interrupted(
        &self,
        error_message: &str,
    ) -> impl Future<Output = Result<u64, FieldOpsError>> + Send;
}

impl<T: RunLedger + Send + Sync> RunLedger for Arc<T> {
    fn open(
        &self,
        automation_id: AutomationId,
        trigger_data: TriggerData,
    ) -> impl Future<Output = Result<Run, FieldOpsError>> + Send {
        (**self).open(automation_id, trigger_data)
    }

    fn close(
        &self,
        run_id: RunId,
        outcome: RunOutcome,
    ) -> impl Future<Output = Result<bool, FieldOpsError>> + Send {
        (**self).close(run_id, outcome)
    }

    fn get(&self, run_id: RunId) -> impl Future<Output = Result<Option<Run>, FieldOpsError>> + Send {
        (**self).get(run_id)
    }

    fn list_for_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Run>, FieldOpsError>> + Send {
        (**self).list_for_automation(automation_id, limit)
    }

    fn fail_interrupted(
        &self,
        error_message: &str,
    ) -> impl Future<Output = Result<u64, FieldOpsError>> + Send {
        (**self).fail_interrupted(error_message)
    }
}
