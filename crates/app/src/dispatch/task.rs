//! `create_task` — write a task row linked to the run's business context.

use serde::Deserialize;
use serde_json::Value;

use fieldops_domain::automation::ActionType;
use fieldops_domain::id::TaskId;
use fieldops_domain::task::{Task, TaskStatus};
use fieldops_domain::time;

use super::fields::{decode, non_empty, required};
use super::{ActionError, DispatchContext};
use crate::ports::TaskRepository;

/// Trigger-data key holding the originating job.
const JOB_KEY: &str = "job_id";
/// Trigger-data key holding the originating user.
const USER_KEY: &str = "user_id";

#[derive(Deserialize)]
struct Wire {
    #[serde(default, deserialize_with = "non_empty")]
    title: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    description: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    assigned_to: Option<String>,
}

/// `{ "title": …, "description"?: …, "assigned_to"?: … }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

impl TaskConfig {
    /// # Errors
    ///
    /// [`ActionError::InvalidConfig`] when `title` is missing or a field is not a string.
    pub fn parse(config: &Value) -> Result<Self, ActionError> {
        let wire: Wire = decode(ActionType::CreateTask, config)?;
        Ok(Self {
            title: required(ActionType::CreateTask, "title", wire.title)?,
            description: wire.description,
            assigned_to: wire.assigned_to,
        })
    }
}

pub(super) async fn execute<R>(
    repo: &R,
    ctx: &DispatchContext<'_>,
    config: TaskConfig,
) -> Result<(), ActionError>
where
    R: TaskRepository + Sync,
{
    let task = Task {
        id: TaskId::new(),
        title: config.title,
        description: config.description,
        assigned_to: config.assigned_to,
        job_id: ctx.trigger_data.get(JOB_KEY).map(|v| v.into_owned()),
        user_id: ctx.trigger_data.get(USER_KEY).map(|v| v.into_owned()),
        automation_run_id: ctx.run_id,
        status: TaskStatus::Pending,
        created_at: time::now(),
    };
    let task = repo.create(task).await.map_err(ActionError::Storage)?;
    tracing::info!(task_id = %task.id, "task created");
    Ok(())
}
