//! Run service — read access to the run history.

use fieldops_domain::error::{FieldOpsError, NotFoundError};
use fieldops_domain::id::{AutomationId, RunId};
use fieldops_domain::run::Run;

use crate::ports::RunLedger;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_RUN_LIMIT: usize = 50;
/// Largest page a caller may request.
pub const MAX_RUN_LIMIT: usize = 500;

pub struct RunService<L> {
    ledger: L,
}

impl<L: RunLedger> RunService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// # Errors
    ///
    /// Returns [`FieldOpsError::NotFound`] when the run does not exist, or a
    /// storage error from the ledger.
    pub async fn get_run(&self, id: RunId) -> Result<Run, FieldOpsError> {
        self.ledger.get(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Run",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Newest-first runs of one automation. `limit` defaults to
    /// [`DEFAULT_RUN_LIMIT`] and is capped at [`MAX_RUN_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the ledger.
    pub async fn list_runs(
        &self,
        automation_id: AutomationId,
        limit: Option<usize>,
    ) -> Result<Vec<Run>, FieldOpsError> {
        let limit = limit.unwrap_or(DEFAULT_RUN_LIMIT).min(MAX_RUN_LIMIT);
        self.ledger.list_for_automation(automation_id, limit).await
    }
}
