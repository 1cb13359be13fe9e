//! `send_sms` — text message through the SMS provider.

use serde::Deserialize;
use serde_json::Value;

use fieldops_domain::automation::ActionType;

use super::fields::{decode, non_empty, required};
use super::{ActionError, sending_number};
use crate::config::EngineConfig;
use crate::ports::SmsProvider;

#[derive(Deserialize)]
struct Wire {
    #[serde(default, deserialize_with = "non_empty")]
    to_number: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    message: Option<String>,
}

/// `{ "to_number": …, "message": … }`, both required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsConfig {
    pub to_number: String,
    pub message: String,
}

impl SmsConfig {
    /// # Errors
    ///
    /// [`ActionError::InvalidConfig`] when a required field is missing or not a string.
    pub fn parse(config: &Value) -> Result<Self, ActionError> {
        const KIND: ActionType = ActionType::SendSms;
        let wire: Wire = decode(KIND, config)?;
        Ok(Self {
            to_number: required(KIND, "to_number", wire.to_number)?,
            message: required(KIND, "message", wire.message)?,
        })
    }
}

pub(super) async fn execute<P>(
    provider: &P,
    engine: &EngineConfig,
    config: SmsConfig,
) -> Result<(), ActionError>
where
    P: SmsProvider + Sync,
{
    let from = sending_number(ActionType::SendSms, engine)?;
    let reference = provider
        .send_sms(from, &config.to_number, &config.message)
        .await?;
    tracing::info!(to = %config.to_number, %reference, "sms accepted by provider");
    Ok(())
}
