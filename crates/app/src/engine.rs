//! Execution orchestrator — runs one automation against one trigger event.
//!
//! The orchestrator loads the automation, opens a run, walks the actions in
//! `sequence_order` (sleeping for each action's delay first), stops at the
//! first failure, closes the run and finally bumps the automation counters.
//!
//! Delays are plain in-process sleeps: a run that is waiting survives only
//! as long as the process does. At startup
//! [`RunLedger::fail_interrupted`](crate::ports::RunLedger::fail_interrupted)
//! closes whatever a restart cut off.

use fieldops_domain::error::{FieldOpsError, NotFoundError};
use fieldops_domain::id::{AutomationId, RunId};
use fieldops_domain::run::RunOutcome;
use fieldops_domain::time;
use fieldops_domain::trigger_data::TriggerData;

use crate::dispatch::{ActionDispatcher, DispatchContext};
use crate::ports::{AutomationRepository, RunLedger};

/// Message stored on runs closed by the startup sweep.
pub const INTERRUPTED_MESSAGE: &str = "run interrupted by engine restart";

/// What the caller of [`ExecutionOrchestrator::execute`] gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    pub run_id: RunId,
    pub actions_executed: u32,
    pub error: Option<String>,
}

impl ExecutionResult {
    fn from_outcome(run_id: RunId, outcome: &RunOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            run_id,
            actions_executed: outcome.actions_executed(),
            error: outcome.error_message().map(str::to_string),
        }
    }
}

/// Drives a single automation run from trigger to terminal state.
pub struct ExecutionOrchestrator<AR, RL, D> {
    automations: AR,
    runs: RL,
    dispatcher: D,
}

impl<AR, RL, D> ExecutionOrchestrator<AR, RL, D>
where
    AR: AutomationRepository + Send + Sync,
    RL: RunLedger + Send + Sync,
    D: ActionDispatcher + Send + Sync,
{
    pub fn new(automations: AR, runs: RL, dispatcher: D) -> Self {
        Self {
            automations,
            runs,
            dispatcher,
        }
    }

    /// Execute the automation `automation_id` for `trigger_data`.
    ///
    /// Action failures do not surface as `Err`: they end the run and are
    /// reported through [`ExecutionResult::error`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldOpsError::NotFound`] when the automation does not exist
    /// or is not active (no run is recorded), or a storage error when the run
    /// cannot be opened or closed.
    #[tracing::instrument(skip(self, trigger_data), fields(run_id = tracing::field::Empty))]
    pub async fn execute(
        &self,
        automation_id: AutomationId,
        trigger_data: TriggerData,
    ) -> Result<ExecutionResult, FieldOpsError> {
        let automation = self
            .automations
            .get_active(automation_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Automation",
                id: automation_id.to_string(),
            })?;

        let run = self.runs.open(automation_id, trigger_data).await?;
        tracing::Span::current().record("run_id", tracing::field::display(run.id));
        tracing::info!(
            automation = %automation.name,
            actions = automation.actions.len(),
            "run started"
        );

        let ctx = DispatchContext {
            run_id: run.id,
            trigger_data: &run.trigger_data,
        };

        let mut executed: u32 = 0;
        let mut failure = None;
        for action in &automation.actions {
            let delay = action.delay();
            if !delay.is_zero() {
                tracing::debug!(%action, ?delay, "waiting before action");
                tokio::time::sleep(delay).await;
            }

            match self.dispatcher.dispatch(action, &ctx).await {
                Ok(()) => executed += 1,
                Err(err) => {
                    tracing::warn!(%action, error = %err, "action failed, halting run");
                    failure = Some(err.to_string());
                    break;
                }
            }
        }

        let outcome = match failure {
            None => RunOutcome::Completed {
                actions_executed: executed,
            },
            Some(error_message) => RunOutcome::Failed {
                actions_executed: executed,
                error_message,
            },
        };

        if !self.runs.close(run.id, outcome.clone()).await? {
            tracing::warn!("run was already closed, keeping the stored outcome");
        }

        if let Err(err) = self
            .automations
            .record_run(automation_id, outcome.is_success(), time::now())
            .await
        {
            tracing::warn!(error = %err, "failed to update automation counters");
        }

        tracing::info!(
            success = outcome.is_success(),
            actions_executed = executed,
            "run finished"
        );
        Ok(ExecutionResult::from_outcome(run.id, &outcome))
    }
}
