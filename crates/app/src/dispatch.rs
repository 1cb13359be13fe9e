//! Action dispatcher — executes one [`Action`] against its provider.
//!
//! Every action type has its own module owning a typed config (parsed and
//! validated from the stored JSON) and the side effect that consumes it.
//! [`Dispatcher`] resolves the stored tag, interpolates the whole config
//! against the run's trigger data, and routes to the matching handler with
//! an exhaustive `match`, so a new [`ActionType`] cannot be added without a
//! handler.

mod call;
mod email;
mod fields;
mod sms;
mod task;
mod webhook;

pub use call::CallConfig;
pub use email::EmailConfig;
pub use sms::SmsConfig;
pub use task::TaskConfig;
pub use webhook::WebhookConfig;

use std::future::Future;
use std::sync::Arc;

use fieldops_domain::automation::{Action, ActionType};
use fieldops_domain::error::FieldOpsError;
use fieldops_domain::id::RunId;
use fieldops_domain::interpolate::interpolate_value;
use fieldops_domain::trigger_data::TriggerData;

use crate::config::EngineConfig;
use crate::ports::{
    EmailTransport, ProviderError, SmsProvider, TaskRepository, VoiceProvider, WebhookClient,
};

/// What a handler knows about the run it executes in.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    pub run_id: RunId,
    /// The payload the run was opened with; every placeholder resolves
    /// against this, never against a later version.
    pub trigger_data: &'a TriggerData,
}

/// Why an action failed. Every variant ends the run.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The stored config is missing or has malformed fields.
    #[error("invalid {action_type} config: {issue}")]
    InvalidConfig {
        action_type: ActionType,
        issue: ConfigIssue,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Writing the task row failed.
    #[error("failed to store task: {0}")]
    Storage(#[source] FieldOpsError),

    #[error("unknown action type `{0}`")]
    UnknownActionType(String),
}

/// The specific problem with an action config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigIssue {
    #[error("config must be a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field has the wrong JSON type.
    #[error("{0}")]
    Malformed(String),

    #[error("field `{field}` is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Executes a single action. The orchestrator only ever talks to this trait.
pub trait ActionDispatcher {
    fn dispatch(
        &self,
        action: &Action,
        ctx: &DispatchContext<'_>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;
}

impl<T: ActionDispatcher + Send + Sync> ActionDispatcher for Arc<T> {
    fn dispatch(
        &self,
        action: &Action,
        ctx: &DispatchContext<'_>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).dispatch(action, ctx)
    }
}

/// The production dispatcher, generic over every outbound port.
pub struct Dispatcher<S, V, E, W, T> {
    config: EngineConfig,
    sms: S,
    voice: V,
    email: E,
    webhook: W,
    tasks: T,
}

impl<S, V, E, W, T> Dispatcher<S, V, E, W, T>
where
    S: SmsProvider + Send + Sync,
    V: VoiceProvider + Send + Sync,
    E: EmailTransport + Send + Sync,
    W: WebhookClient + Send + Sync,
    T: TaskRepository + Send + Sync,
{
    /// Create a dispatcher from the engine config and one implementation per port.
    pub fn new(config: EngineConfig, sms: S, voice: V, email: E, webhook: W, tasks: T) -> Self {
        Self {
            config,
            sms,
            voice,
            email,
            webhook,
            tasks,
        }
    }
}

impl<S, V, E, W, T> ActionDispatcher for Dispatcher<S, V, E, W, T>
where
    S: SmsProvider + Send + Sync,
    V: VoiceProvider + Send + Sync,
    E: EmailTransport + Send + Sync,
    W: WebhookClient + Send + Sync,
    T: TaskRepository + Send + Sync,
{
    async fn dispatch(&self, action: &Action, ctx: &DispatchContext<'_>) -> Result<(), ActionError> {
        let kind = action
            .kind()
            .map_err(|_| ActionError::UnknownActionType(action.action_type.clone()))?;
        let config = interpolate_value(&action.action_config, ctx.trigger_data);

        match kind {
            ActionType::SendSms => {
                sms::execute(&self.sms, &self.config, SmsConfig::parse(&config)?).await
            }
            ActionType::SendEmail => {
                email::execute(&self.email, EmailConfig::parse(&config)?).await
            }
            ActionType::MakeCall => {
                call::execute(&self.voice, &self.config, CallConfig::parse(&config)?).await
            }
            ActionType::CreateTask => {
                task::execute(&self.tasks, ctx, TaskConfig::parse(&config)?).await
            }
            ActionType::Webhook => {
                webhook::execute(&self.webhook, WebhookConfig::parse(&config)?).await
            }
        }
    }
}

/// The tenant sending number, or an `InvalidConfig` for `action_type`.
fn sending_number(action_type: ActionType, config: &EngineConfig) -> Result<&str, ActionError> {
    config
        .from_number
        .as_deref()
        .ok_or(ActionError::InvalidConfig {
            action_type,
            issue: ConfigIssue::MissingField("from_number"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldops_domain::id::AutomationId;
    use crate::testing::{
        FakeSms, FakeVoice, FailingTaskRepo, InMemoryTaskRepo, RecordingEmail, RecordingWebhook,
    };

    type TestDispatcher =
        Dispatcher<FakeSms, FakeVoice, RecordingEmail, RecordingWebhook, InMemoryTaskRepo>;

    fn dispatcher() -> TestDispatcher {
        Dispatcher::new(
            EngineConfig::new("+15550000", "https://example.test/announce.xml"),
            FakeSms::default(),
            FakeVoice::default(),
            RecordingEmail::default(),
            RecordingWebhook::default(),
            InMemoryTaskRepo::default(),
        )
    }

    fn action(kind: ActionType, config: serde_json::Value) -> Action {
        Action::new(AutomationId::new(), 1, kind, config)
    }

    fn ctx(data: &TriggerData) -> DispatchContext<'_> {
        DispatchContext {
            run_id: RunId::new(),
            trigger_data: data,
        }
    }

    #[tokio::test]
    async fn should_send_interpolated_sms_from_tenant_number() {
        let d = dispatcher();
        let data = TriggerData::new()
            .with("Name", "Ana")
            .with("Phone", "+15550111");
        let a = action(
            ActionType::SendSms,
            serde_json::json!({"to_number": "{Phone}", "message": "Hi {Name}"}),
        );

        d.dispatch(&a, &ctx(&data)).await.unwrap();

        let sent = d.sms.sent();
        assert_eq!(
            sent,
            vec![(
                "+15550000".to_string(),
                "+15550111".to_string(),
                "Hi Ana".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn should_fail_sms_with_invalid_config_when_message_missing() {
        let d = dispatcher();
        let a = action(ActionType::SendSms, serde_json::json!({"to_number": "+1"}));

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::InvalidConfig {
                action_type: ActionType::SendSms,
                issue: ConfigIssue::MissingField("message"),
            }
        ));
        assert!(d.sms.sent().is_empty());
    }

    #[tokio::test]
    async fn should_fail_sms_with_invalid_config_when_no_sending_number() {
        let mut d = dispatcher();
        d.config.from_number = None;
        let a = action(
            ActionType::SendSms,
            serde_json::json!({"to_number": "+1", "message": "hi"}),
        );

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::InvalidConfig {
                issue: ConfigIssue::MissingField("from_number"),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn should_surface_provider_rejection_body() {
        let mut d = dispatcher();
        d.sms = FakeSms::rejecting(400, r#"{"message":"invalid To"}"#);
        let a = action(
            ActionType::SendSms,
            serde_json::json!({"to_number": "nope", "message": "hi"}),
        );

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(err, ActionError::Provider(_)));
        assert!(err.to_string().contains("invalid To"));
    }

    #[tokio::test]
    async fn should_hand_interpolated_email_to_transport() {
        let d = dispatcher();
        let data = TriggerData::new().with("JobId", 42);
        let a = action(
            ActionType::SendEmail,
            serde_json::json!({
                "to_email": "ops@example.test",
                "subject": "Job {JobId} done",
                "body": "Job {JobId} is complete."
            }),
        );

        d.dispatch(&a, &ctx(&data)).await.unwrap();

        let sent = d.email.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@example.test");
        assert_eq!(sent[0].subject, "Job 42 done");
        assert_eq!(sent[0].body, "Job 42 is complete.");
    }

    #[tokio::test]
    async fn should_fail_email_when_subject_is_empty() {
        let d = dispatcher();
        let a = action(
            ActionType::SendEmail,
            serde_json::json!({"to_email": "a@b.test", "subject": "", "body": "x"}),
        );

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::InvalidConfig {
                issue: ConfigIssue::MissingField("subject"),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn should_place_call_to_announcement_flow() {
        let d = dispatcher();
        let a = action(ActionType::MakeCall, serde_json::json!({"to_number": "+15550222"}));

        d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap();

        assert_eq!(
            d.voice.calls(),
            vec![(
                "+15550000".to_string(),
                "+15550222".to_string(),
                "https://example.test/announce.xml".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn should_fail_call_without_to_number() {
        let d = dispatcher();
        let a = action(ActionType::MakeCall, serde_json::json!({}));

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::InvalidConfig {
                action_type: ActionType::MakeCall,
                issue: ConfigIssue::MissingField("to_number"),
            }
        ));
        assert!(d.voice.calls().is_empty());
    }

    #[tokio::test]
    async fn should_create_task_linked_to_trigger_context() {
        let d = dispatcher();
        let data = TriggerData::new()
            .with("job_id", "job-7")
            .with("user_id", "user-3")
            .with("Client", "Acme");
        let context = ctx(&data);
        let a = action(
            ActionType::CreateTask,
            serde_json::json!({
                "title": "Follow up with {Client}",
                "description": "Job {job_id}",
                "assigned_to": ""
            }),
        );

        d.dispatch(&a, &context).await.unwrap();

        let tasks = d.tasks.all();
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.title, "Follow up with Acme");
        assert_eq!(task.description.as_deref(), Some("Job job-7"));
        assert_eq!(task.assigned_to, None);
        assert_eq!(task.job_id.as_deref(), Some("job-7"));
        assert_eq!(task.user_id.as_deref(), Some("user-3"));
        assert_eq!(task.automation_run_id, context.run_id);
        assert_eq!(task.status, fieldops_domain::task::TaskStatus::Pending);
    }

    #[tokio::test]
    async fn should_map_task_storage_failure_to_storage_error() {
        let d = Dispatcher::new(
            EngineConfig::default(),
            FakeSms::default(),
            FakeVoice::default(),
            RecordingEmail::default(),
            RecordingWebhook::default(),
            FailingTaskRepo,
        );
        let a = action(ActionType::CreateTask, serde_json::json!({"title": "t"}));

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(err, ActionError::Storage(_)));
    }

    #[tokio::test]
    async fn should_send_webhook_with_interpolated_json_body() {
        let d = dispatcher();
        let data = TriggerData::new().with("JobId", "42");
        let a = action(
            ActionType::Webhook,
            serde_json::json!({
                "url": "https://hooks.example.test/jobs/{JobId}",
                "method": "put",
                "headers": {"X-Job": "{JobId}"},
                "body": {"job": "{JobId}", "count": 1}
            }),
        );

        d.dispatch(&a, &ctx(&data)).await.unwrap();

        let requests = d.webhook.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.url, "https://hooks.example.test/jobs/42");
        assert_eq!(request.headers["X-Job"], "42");
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"job": "42", "count": 1}));
    }

    #[tokio::test]
    async fn should_report_webhook_status_code_on_rejection() {
        let mut d = dispatcher();
        d.webhook = RecordingWebhook::responding(503);
        let a = action(
            ActionType::Webhook,
            serde_json::json!({"url": "https://hooks.example.test"}),
        );

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn should_reject_unknown_action_type() {
        let d = dispatcher();
        let mut a = action(ActionType::SendSms, serde_json::json!({}));
        a.action_type = "send_fax".to_string();

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(err, ActionError::UnknownActionType(tag) if tag == "send_fax"));
        assert_eq!(
            format!("{}", ActionError::UnknownActionType("x".into())),
            "unknown action type `x`"
        );
    }

    #[tokio::test]
    async fn should_reject_non_object_config() {
        let d = dispatcher();
        let a = action(ActionType::SendEmail, serde_json::json!([1, 2]));

        let err = d.dispatch(&a, &ctx(&TriggerData::new())).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::InvalidConfig {
                issue: ConfigIssue::NotAnObject,
                ..
            }
        ));
    }
}
