//! Run — one audited execution attempt of an automation.
//!
//! A run is opened in [`RunStatus::Running`] and closed exactly once into
//! [`RunStatus::Completed`] or [`RunStatus::Failed`]. Terminal runs never
//! change again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::{AutomationId, RunId};
use crate::time::Timestamp;
use crate::trigger_data::TriggerData;

/// Lifecycle state of a [`Run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown run status `{other}`")),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every action succeeded.
    Completed { actions_executed: u32 },
    /// An action failed; `actions_executed` counts only the actions that
    /// fully succeeded before it.
    Failed {
        actions_executed: u32,
        error_message: String,
    },
}

impl RunOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    #[must_use]
    pub fn actions_executed(&self) -> u32 {
        match self {
            Self::Completed { actions_executed } | Self::Failed { actions_executed, .. } => {
                *actions_executed
            }
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error_message, .. } => Some(error_message),
        }
    }

    #[must_use]
    pub fn status(&self) -> RunStatus {
        match self {
            Self::Completed { .. } => RunStatus::Completed,
            Self::Failed { .. } => RunStatus::Failed,
        }
    }
}

/// The audit record of one execution of an automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub automation_id: AutomationId,
    pub trigger_data: TriggerData,
    pub status: RunStatus,
    pub actions_executed: u32,
    pub error_message: Option<String>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Run {
    /// Open a new run in the `running` state.
    #[must_use]
    pub fn start(automation_id: AutomationId, trigger_data: TriggerData, at: Timestamp) -> Self {
        Self {
            id: RunId::new(),
            automation_id,
            trigger_data,
            status: RunStatus::Running,
            actions_executed: 0,
            error_message: None,
            started_at: at,
            completed_at: None,
        }
    }

    /// Move a running run into its terminal state.
    ///
    /// Returns `false` (and leaves the run untouched) if the run was
    /// already terminal.
    pub fn close(&mut self, outcome: &RunOutcome, at: Timestamp) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = outcome.status();
        self.actions_executed = outcome.actions_executed();
        self.error_message = outcome.error_message().map(str::to_string);
        self.completed_at = Some(at);
        true
    }
}
