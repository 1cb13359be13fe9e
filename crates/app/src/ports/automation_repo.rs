//! Automation repository port — the loader and the run counters.

use std::future::Future;
use std::sync::Arc;

use fieldops_domain::automation::Automation;
use fieldops_domain::error::FieldOpsError;
use fieldops_domain::id::AutomationId;
use fieldops_domain::time::Timestamp;

/// Repository for persisting and loading [`Automation`]s.
pub trait AutomationRepository {
    /// Persist a new automation together with all of its actions.
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, FieldOpsError>> + Send;

    /// Get an automation by id regardless of its status.
    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send;

    /// Get all automations, ordered by name.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, FieldOpsError>> + Send;

    /// Load an automation for execution.
    ///
    /// Returns `None` unless the automation exists **and** is active. The
    /// actions come back sorted by `sequence_order`, ties in insertion order.
    fn get_active(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send;

    /// Record the end of one run: `run_count += 1`, `success_count += 1` when
    /// `succeeded`, and `last_run_at = at`.
    ///
    /// Implementations must apply the increments atomically in storage so
    /// concurrent runs of the same automation never lose an update.
    fn record_run(
        &self,
        id: AutomationId,
        succeeded: bool,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), FieldOpsError>> + Send;
}

impl<T: AutomationRepository + Send + Sync> AutomationRepository for Arc<T> {
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, FieldOpsError>> + Send {
        (**self).create(automation)
    }

    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, FieldOpsError>> + Send {
        (**self).get_all()
    }

    fn get_active(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send {
        (**self).get_active(id)
    }

    fn record_run(
        &self,
        id: AutomationId,
        succeeded: bool,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), FieldOpsError>> + Send {
        (**self).record_run(id, succeeded, at)
    }
}
