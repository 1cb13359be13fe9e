//! Action — one step of an automation.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{ActionId, AutomationId};

/// The closed set of capabilities an action can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    SendSms,
    SendEmail,
    MakeCall,
    CreateTask,
    Webhook,
}

impl ActionType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::SendSms,
        Self::SendEmail,
        Self::MakeCall,
        Self::CreateTask,
        Self::Webhook,
    ];

    /// The storage / wire tag, e.g. `"send_sms"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SendSms => "send_sms",
            Self::SendEmail => "send_email",
            Self::MakeCall => "make_call",
            Self::CreateTask => "create_task",
            Self::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownActionType(s.to_string()))
    }
}

/// A stored step of an [`Automation`](super::Automation).
///
/// `action_type` is kept as the raw stored tag: rows written by a newer
/// authoring UI (or corrupted by hand) must still load, and only fail when
/// the engine actually reaches them. Use [`Action::kind`] to resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub automation_id: AutomationId,
    /// Execution order within the automation, ascending.
    pub sequence_order: i32,
    pub action_type: String,
    /// Variant-specific configuration, e.g. `{"to_number": …, "message": …}`.
    #[serde(default = "empty_config")]
    pub action_config: serde_json::Value,
    /// Minutes to wait *before* this action runs.
    #[serde(default)]
    pub delay_minutes: u32,
}

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Action {
    /// Create an action with no delay.
    #[must_use]
    pub fn new(
        automation_id: AutomationId,
        sequence_order: i32,
        action_type: ActionType,
        action_config: serde_json::Value,
    ) -> Self {
        Self {
            id: ActionId::new(),
            automation_id,
            sequence_order,
            action_type: action_type.as_str().to_string(),
            action_config,
            delay_minutes: 0,
        }
    }

    #[must_use]
    pub fn with_delay_minutes(mut self, minutes: u32) -> Self {
        self.delay_minutes = minutes;
        self
    }

    /// Resolve the stored tag into a known [`ActionType`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownActionType`] for unrecognised tags.
    pub fn kind(&self) -> Result<ActionType, ValidationError> {
        self.action_type.parse()
    }

    /// The pause to observe before executing this action.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.delay_minutes) * 60)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.sequence_order, self.action_type)?;
        if self.delay_minutes > 0 {
            write!(f, " (after {}m)", self.delay_minutes)?;
        }
        Ok(())
    }
}
