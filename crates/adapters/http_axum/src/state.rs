//! Shared application state for axum handlers.

use std::sync::Arc;

use fieldops_app::dispatch::ActionDispatcher;
use fieldops_app::engine::ExecutionOrchestrator;
use fieldops_app::ports::{AutomationRepository, RunLedger};
use fieldops_app::services::automation_service::AutomationService;
use fieldops_app::services::run_service::RunService;

/// Application state shared across all axum handlers.
///
/// Generic over the automation repository, run ledger and dispatcher to
/// avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone`.
pub struct AppState<AR, RL, D> {
    pub orchestrator: Arc<ExecutionOrchestrator<AR, RL, D>>,
    pub automation_service: Arc<AutomationService<AR>>,
    pub run_service: Arc<RunService<RL>>,
}

impl<AR, RL, D> Clone for AppState<AR, RL, D> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            automation_service: Arc::clone(&self.automation_service),
            run_service: Arc::clone(&self.run_service),
        }
    }
}

impl<AR, RL, D> AppState<AR, RL, D>
where
    AR: AutomationRepository + Send + Sync + 'static,
    RL: RunLedger + Send + Sync + 'static,
    D: ActionDispatcher + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        orchestrator: ExecutionOrchestrator<AR, RL, D>,
        automation_service: AutomationService<AR>,
        run_service: RunService<RL>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            automation_service: Arc::new(automation_service),
            run_service: Arc::new(run_service),
        }
    }
}
