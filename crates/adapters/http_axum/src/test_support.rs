//! In-memory ports and helpers for the handler tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::Response;
use http_body_util::BodyExt;

use fieldops_app::dispatch::{ActionDispatcher, ActionError, DispatchContext};
use fieldops_app::engine::ExecutionOrchestrator;
use fieldops_app::ports::{AutomationRepository, ProviderError, RunLedger};
use fieldops_app::services::automation_service::AutomationService;
use fieldops_app::services::run_service::RunService;
use fieldops_domain::automation::{Action, ActionType, Automation};
use fieldops_domain::error::FieldOpsError;
use fieldops_domain::id::{AutomationId, RunId};
use fieldops_domain::run::{Run, RunOutcome};
use fieldops_domain::time::{self, Timestamp};
use fieldops_domain::trigger_data::TriggerData;

use crate::state::AppState;

#[derive(Default)]
pub struct MemAutomations(Mutex<Vec<Automation>>);

impl AutomationRepository for MemAutomations {
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, FieldOpsError>> + Send {
        self.0.lock().unwrap().push(automation.clone());
        async { Ok(automation) }
    }

    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send {
        let found = self.0.lock().unwrap().iter().find(|a| a.id == id).cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, FieldOpsError>> + Send {
        let all = self.0.lock().unwrap().clone();
        async { Ok(all) }
    }

    fn get_active(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send {
        let found = self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id && a.is_active())
            .cloned();
        async { Ok(found) }
    }

    fn record_run(
        &self,
        id: AutomationId,
        succeeded: bool,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), FieldOpsError>> + Send {
        if let Some(a) = self.0.lock().unwrap().iter_mut().find(|a| a.id == id) {
            a.run_count += 1;
            a.success_count += u64::from(succeeded);
            a.last_run_at = Some(at);
        }
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct MemRuns(Mutex<Vec<Run>>);

impl MemRuns {
    pub fn all(&self) -> Vec<Run> {
        self.0.lock().unwrap().clone()
    }
}

impl RunLedger for MemRuns {
    fn open(
        &self,
        automation_id: AutomationId,
        trigger_data: TriggerData,
    ) -> impl Future<Output = Result<Run, FieldOpsError>> + Send {
        let run = Run::start(automation_id, trigger_data, time::now());
        self.0.lock().unwrap().push(run.clone());
        async { Ok(run) }
    }

    fn close(
        &self,
        run_id: RunId,
        outcome: RunOutcome,
    ) -> impl Future<Output = Result<bool, FieldOpsError>> + Send {
        let changed = self
            .0
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.id == run_id)
            .is_some_and(|r| r.close(&outcome, time::now()));
        async move { Ok(changed) }
    }

    fn get(&self, run_id: RunId) -> impl Future<Output = Result<Option<Run>, FieldOpsError>> + Send {
        let found = self.0.lock().unwrap().iter().find(|r| r.id == run_id).cloned();
        async { Ok(found) }
    }

    fn list_for_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Run>, FieldOpsError>> + Send {
        let runs: Vec<Run> = self
            .0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.automation_id == automation_id)
            .take(limit)
            .cloned()
            .collect();
        async { Ok(runs) }
    }

    fn fail_interrupted(
        &self,
        _error_message: &str,
    ) -> impl Future<Output = Result<u64, FieldOpsError>> + Send {
        async { Ok(0) }
    }
}

/// Succeeds for every action except `webhook`, which is rejected with 502.
pub struct StubDispatcher;

impl ActionDispatcher for StubDispatcher {
    fn dispatch(
        &self,
        action: &Action,
        _ctx: &DispatchContext<'_>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        let result = if action.action_type == ActionType::Webhook.as_str() {
            Err(ActionError::Provider(ProviderError::Rejected {
                provider: "webhook",
                status: 502,
                body: "bad gateway".to_string(),
            }))
        } else {
            Ok(())
        };
        async { result }
    }
}

pub type TestState = AppState<Arc<MemAutomations>, Arc<MemRuns>, StubDispatcher>;

pub fn test_state() -> (TestState, Arc<MemAutomations>, Arc<MemRuns>) {
    let automations = Arc::new(MemAutomations::default());
    let runs = Arc::new(MemRuns::default());
    let state = AppState::new(
        ExecutionOrchestrator::new(Arc::clone(&automations), Arc::clone(&runs), StubDispatcher),
        AutomationService::new(Arc::clone(&automations)),
        RunService::new(Arc::clone(&runs)),
    );
    (state, automations, runs)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
