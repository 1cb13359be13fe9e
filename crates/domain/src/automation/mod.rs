//! Automation — a named, ordered sequence of actions fired by a business event.
//!
//! Trigger matching happens upstream: by the time an automation reaches
//! the engine it has already been selected. The engine only reads the
//! definition and updates the run counters.

mod action;

pub use action::{Action, ActionType};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FieldOpsError, ValidationError};
use crate::id::AutomationId;
use crate::time::Timestamp;

/// Whether an automation may be executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationStatus {
    #[default]
    Active,
    Inactive,
}

impl AutomationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AutomationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutomationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown automation status `{other}`")),
        }
    }
}

/// A user-authored workflow together with its cumulative run statistics.
///
/// `actions` are always held in execution order: ascending
/// `sequence_order`, ties kept in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automation {
    pub id: AutomationId,
    pub name: String,
    pub status: AutomationStatus,
    pub actions: Vec<Action>,
    pub run_count: u64,
    pub success_count: u64,
    pub last_run_at: Option<Timestamp>,
}

impl Automation {
    /// Create a builder for constructing an [`Automation`].
    #[must_use]
    pub fn builder() -> AutomationBuilder {
        AutomationBuilder::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AutomationStatus::Active
    }

    /// Stable-sort `actions` into execution order.
    pub fn sort_actions(&mut self) {
        self.actions.sort_by_key(|action| action.sequence_order);
    }

    /// Check domain invariants for a newly authored automation.
    ///
    /// # Errors
    ///
    /// Returns [`FieldOpsError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - an action has an unknown tag ([`ValidationError::UnknownActionType`])
    /// - an action config is not a JSON object ([`ValidationError::ConfigNotAnObject`])
    pub fn validate(&self) -> Result<(), FieldOpsError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        for action in &self.actions {
            action.kind()?;
            if !action.action_config.is_object() {
                return Err(ValidationError::ConfigNotAnObject {
                    sequence_order: action.sequence_order,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Automation`].
#[derive(Debug, Default)]
pub struct AutomationBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    status: Option<AutomationStatus>,
    actions: Vec<Action>,
}

impl AutomationBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: AutomationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Append a step. The owning automation id is rewritten at build time.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Convenience for appending a step of the given type with no delay.
    #[must_use]
    pub fn step(
        self,
        sequence_order: i32,
        action_type: ActionType,
        action_config: serde_json::Value,
    ) -> Self {
        self.action(Action::new(
            AutomationId::default(),
            sequence_order,
            action_type,
            action_config,
        ))
    }

    /// Consume the builder, validate, and return an [`Automation`] with its
    /// actions in execution order and zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`FieldOpsError::Validation`] if invariants fail.
    pub fn build(self) -> Result<Automation, FieldOpsError> {
        let id = self.id.unwrap_or_default();
        let actions = self
            .actions
            .into_iter()
            .map(|action| Action {
                automation_id: id,
                ..action
            })
            .collect();
        let mut automation = Automation {
            id,
            name: self.name.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            actions,
            run_count: 0,
            success_count: 0,
            last_run_at: None,
        };
        automation.sort_actions();
        automation.validate()?;
        Ok(automation)
    }
}
