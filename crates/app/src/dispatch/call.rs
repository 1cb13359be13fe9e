//! `make_call` — outbound voice call into the fixed announcement flow.

use serde::Deserialize;
use serde_json::Value;

use fieldops_domain::automation::ActionType;

use super::fields::{decode, non_empty, required};
use super::{ActionError, ConfigIssue, sending_number};
use crate::config::EngineConfig;
use crate::ports::VoiceProvider;

#[derive(Deserialize)]
struct Wire {
    #[serde(default, deserialize_with = "non_empty")]
    to_number: Option<String>,
}

/// `{ "to_number": … }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallConfig {
    pub to_number: String,
}

impl CallConfig {
    /// # Errors
    ///
    /// [`ActionError::InvalidConfig`] when `to_number` is missing or not a string.
    pub fn parse(config: &Value) -> Result<Self, ActionError> {
        let wire: Wire = decode(ActionType::MakeCall, config)?;
        Ok(Self {
            to_number: required(ActionType::MakeCall, "to_number", wire.to_number)?,
        })
    }
}

pub(super) async fn execute<P>(
    provider: &P,
    engine: &EngineConfig,
    config: CallConfig,
) -> Result<(), ActionError>
where
    P: VoiceProvider + Sync,
{
    let from = sending_number(ActionType::MakeCall, engine)?;
    if engine.announcement_url.is_empty() {
        return Err(ActionError::InvalidConfig {
            action_type: ActionType::MakeCall,
            issue: ConfigIssue::MissingField("announcement_url"),
        });
    }
    let reference = provider
        .place_call(from, &config.to_number, &engine.announcement_url)
        .await?;
    tracing::info!(to = %config.to_number, %reference, "call placed");
    Ok(())
}
