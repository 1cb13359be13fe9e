//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::time::Instant;

use fieldops_domain::automation::{Action, Automation};
use fieldops_domain::error::{FieldOpsError, NotFoundError};
use fieldops_domain::id::{AutomationId, RunId};
use fieldops_domain::run::{Run, RunOutcome, RunStatus};
use fieldops_domain::task::Task;
use fieldops_domain::time::{self, Timestamp};
use fieldops_domain::trigger_data::TriggerData;

use crate::dispatch::{ActionDispatcher, ActionError, DispatchContext};
use crate::ports::{
    AutomationRepository, EmailMessage, EmailTransport, ProviderError, RunLedger, SmsProvider,
    TaskRepository, VoiceProvider, WebhookClient, WebhookRequest,
};

// -- automations --

#[derive(Default)]
pub struct InMemoryAutomationRepo {
    store: Mutex<HashMap<AutomationId, Automation>>,
    fail_counters: bool,
}

impl InMemoryAutomationRepo {
    pub fn with(automations: impl IntoIterator<Item = Automation>) -> Self {
        Self {
            store: Mutex::new(automations.into_iter().map(|a| (a.id, a)).collect()),
            fail_counters: false,
        }
    }

    /// A repository whose `record_run` always fails.
    pub fn failing_counters(mut self) -> Self {
        self.fail_counters = true;
        self
    }

    pub fn snapshot(&self, id: AutomationId) -> Automation {
        self.store.lock().unwrap()[&id].clone()
    }
}

impl AutomationRepository for InMemoryAutomationRepo {
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, FieldOpsError>> + Send {
        let mut store = self.store.lock().unwrap();
        store.insert(automation.id, automation.clone());
        async { Ok(automation) }
    }

    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, FieldOpsError>> + Send {
        let store = self.store.lock().unwrap();
        let mut result: Vec<Automation> = store.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        async { Ok(result) }
    }

    fn get_active(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, FieldOpsError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.get(&id).filter(|a| a.is_active()).cloned().map(|mut a| {
            a.sort_actions();
            a
        });
        async { Ok(result) }
    }

    fn record_run(
        &self,
        id: AutomationId,
        succeeded: bool,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), FieldOpsError>> + Send {
        let result = if self.fail_counters {
            Err(FieldOpsError::Storage("counter update refused".into()))
        } else {
            let mut store = self.store.lock().unwrap();
            match store.get_mut(&id) {
                Some(automation) => {
                    automation.run_count += 1;
                    if succeeded {
                        automation.success_count += 1;
                    }
                    automation.last_run_at = Some(at);
                    Ok(())
                }
                None => Err(NotFoundError {
                    entity: "Automation",
                    id: id.to_string(),
                }
                .into()),
            }
        };
        async { result }
    }
}

// -- runs --

#[derive(Default)]
pub struct InMemoryRunLedger {
    runs: Mutex<Vec<Run>>,
    last_limit: Mutex<Option<usize>>,
}

impl InMemoryRunLedger {
    pub fn all(&self) -> Vec<Run> {
        self.runs.lock().unwrap().clone()
    }

    pub fn insert(&self, run: Run) {
        self.runs.lock().unwrap().push(run);
    }

    /// Limit passed to the latest `list_for_automation` call.
    pub fn last_limit(&self) -> Option<usize> {
        *self.last_limit.lock().unwrap()
    }
}

impl RunLedger for InMemoryRunLedger {
    fn open(
        &self,
        automation_id: AutomationId,
        trigger_data: TriggerData,
    ) -> impl Future<Output = Result<Run, FieldOpsError>> + Send {
        let run = Run::start(automation_id, trigger_data, time::now());
        self.runs.lock().unwrap().push(run.clone());
        async { Ok(run) }
    }

    fn close(
        &self,
        run_id: RunId,
        outcome: RunOutcome,
    ) -> impl Future<Output = Result<bool, FieldOpsError>> + Send {
        let mut runs = self.runs.lock().unwrap();
        let changed = runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .is_some_and(|r| r.close(&outcome, time::now()));
        async move { Ok(changed) }
    }

    fn get(&self, run_id: RunId) -> impl Future<Output = Result<Option<Run>, FieldOpsError>> + Send {
        let runs = self.runs.lock().unwrap();
        let result = runs.iter().find(|r| r.id == run_id).cloned();
        async { Ok(result) }
    }

    fn list_for_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Run>, FieldOpsError>> + Send {
        *self.last_limit.lock().unwrap() = Some(limit);
        let runs = self.runs.lock().unwrap();
        let result: Vec<Run> = runs
            .iter()
            .rev()
            .filter(|r| r.automation_id == automation_id)
            .take(limit)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn fail_interrupted(
        &self,
        error_message: &str,
    ) -> impl Future<Output = Result<u64, FieldOpsError>> + Send {
        let mut runs = self.runs.lock().unwrap();
        let now = time::now();
        let mut closed = 0;
        for run in runs.iter_mut().filter(|r| r.status == RunStatus::Running) {
            let outcome = RunOutcome::Failed {
                actions_executed: run.actions_executed,
                error_message: error_message.to_string(),
            };
            if run.close(&outcome, now) {
                closed += 1;
            }
        }
        async move { Ok(closed) }
    }
}

// -- tasks --

#[derive(Default)]
pub struct InMemoryTaskRepo {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTaskRepo {
    pub fn all(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }
}

impl TaskRepository for InMemoryTaskRepo {
    fn create(&self, task: Task) -> impl Future<Output = Result<Task, FieldOpsError>> + Send {
        self.tasks.lock().unwrap().push(task.clone());
        async { Ok(task) }
    }
}

pub struct FailingTaskRepo;

impl TaskRepository for FailingTaskRepo {
    fn create(&self, _task: Task) -> impl Future<Output = Result<Task, FieldOpsError>> + Send {
        async { Err(FieldOpsError::Storage("disk full".into())) }
    }
}

// -- providers --

type Triple = (String, String, String);

#[derive(Default)]
pub struct FakeSms {
    sent: Mutex<Vec<Triple>>,
    reject: Option<(u16, String)>,
}

impl FakeSms {
    pub fn rejecting(status: u16, body: &str) -> Self {
        Self {
            sent: Mutex::default(),
            reject: Some((status, body.to_string())),
        }
    }

    pub fn sent(&self) -> Vec<Triple> {
        self.sent.lock().unwrap().clone()
    }
}

impl SmsProvider for FakeSms {
    fn send_sms(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        let result = match &self.reject {
            Some((status, body)) => Err(ProviderError::Rejected {
                provider: "sms",
                status: *status,
                body: body.clone(),
            }),
            None => {
                let mut sent = self.sent.lock().unwrap();
                sent.push((from.to_string(), to.to_string(), body.to_string()));
                Ok(format!("SM{}", sent.len()))
            }
        };
        async { result }
    }
}

#[derive(Default)]
pub struct FakeVoice {
    calls: Mutex<Vec<Triple>>,
}

impl FakeVoice {
    pub fn calls(&self) -> Vec<Triple> {
        self.calls.lock().unwrap().clone()
    }
}

impl VoiceProvider for FakeVoice {
    fn place_call(
        &self,
        from: &str,
        to: &str,
        announcement_url: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        let mut calls = self.calls.lock().unwrap();
        calls.push((
            from.to_string(),
            to.to_string(),
            announcement_url.to_string(),
        ));
        let reference = format!("CA{}", calls.len());
        async { Ok(reference) }
    }
}

#[derive(Default)]
pub struct RecordingEmail {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmail {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl EmailTransport for RecordingEmail {
    fn send_email(
        &self,
        message: EmailMessage,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        self.sent.lock().unwrap().push(message);
        async { Ok(()) }
    }
}

pub struct RecordingWebhook {
    requests: Mutex<Vec<WebhookRequest>>,
    status: u16,
}

impl Default for RecordingWebhook {
    fn default() -> Self {
        Self::responding(200)
    }
}

impl RecordingWebhook {
    pub fn responding(status: u16) -> Self {
        Self {
            requests: Mutex::default(),
            status,
        }
    }

    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl WebhookClient for RecordingWebhook {
    fn send(
        &self,
        request: WebhookRequest,
    ) -> impl Future<Output = Result<u16, ProviderError>> + Send {
        self.requests.lock().unwrap().push(request);
        let status = self.status;
        async move {
            if (200..300).contains(&status) {
                Ok(status)
            } else {
                Err(ProviderError::Rejected {
                    provider: "webhook",
                    status,
                    body: String::new(),
                })
            }
        }
    }
}

// -- dispatcher --

/// Records every dispatched action and fails at a chosen `sequence_order`.
#[derive(Default)]
pub struct ScriptedDispatcher {
    seen: Mutex<Vec<(i32, Instant, TriggerData)>>,
    fail_at: Option<i32>,
}

impl ScriptedDispatcher {
    pub fn failing_at(sequence_order: i32) -> Self {
        Self {
            seen: Mutex::default(),
            fail_at: Some(sequence_order),
        }
    }

    /// The `sequence_order` of every dispatched action, in call order.
    pub fn calls(&self) -> Vec<i32> {
        self.seen.lock().unwrap().iter().map(|(seq, ..)| *seq).collect()
    }

    pub fn instants(&self) -> Vec<Instant> {
        self.seen.lock().unwrap().iter().map(|(_, at, _)| *at).collect()
    }

    pub fn trigger_data(&self) -> Vec<TriggerData> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(.., data)| data.clone())
            .collect()
    }
}

impl ActionDispatcher for ScriptedDispatcher {
    fn dispatch(
        &self,
        action: &Action,
        ctx: &DispatchContext<'_>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        self.seen.lock().unwrap().push((
            action.sequence_order,
            Instant::now(),
            ctx.trigger_data.clone(),
        ));
        let result = if self.fail_at == Some(action.sequence_order) {
            Err(ActionError::Provider(ProviderError::Rejected {
                provider: "scripted",
                status: 500,
                body: format!("action #{} failed", action.sequence_order),
            }))
        } else {
            Ok(())
        };
        async { result }
    }
}
