//! Task — a to-do row written by the `create_task` action.

use serde::{Deserialize, Serialize};

use crate::id::{RunId, TaskId};
use crate::time::Timestamp;

/// A task created on behalf of an automation run.
///
/// `job_id` and `user_id` link the task back to the business context the
/// automation was fired for (taken from the run's trigger data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub job_id: Option<String>,
    pub user_id: Option<String>,
    pub automation_run_id: RunId,
    pub status: TaskStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }
}
