//! `send_email` — hand an email to the configured transport.

use serde::Deserialize;
use serde_json::Value;

use fieldops_domain::automation::ActionType;

use super::ActionError;
use super::fields::{decode, non_empty, required};
use crate::ports::{EmailMessage, EmailTransport};

#[derive(Deserialize)]
struct Wire {
    #[serde(default, deserialize_with = "non_empty")]
    to_email: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    subject: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    body: Option<String>,
}

/// `{ "to_email": …, "subject": …, "body": … }`, all required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub to_email: String,
    pub subject: String,
    pub body: String,
}

impl EmailConfig {
    /// # Errors
    ///
    /// [`ActionError::InvalidConfig`] when a required field is missing or not a string.
    pub fn parse(config: &Value) -> Result<Self, ActionError> {
        const KIND: ActionType = ActionType::SendEmail;
        let wire: Wire = decode(KIND, config)?;
        Ok(Self {
            to_email: required(KIND, "to_email", wire.to_email)?,
            subject: required(KIND, "subject", wire.subject)?,
            body: required(KIND, "body", wire.body)?,
        })
    }
}

pub(super) async fn execute<E>(transport: &E, config: EmailConfig) -> Result<(), ActionError>
where
    E: EmailTransport + Sync,
{
    transport
        .send_email(EmailMessage {
            to: config.to_email,
            subject: config.subject,
            body: config.body,
        })
        .await?;
    Ok(())
}
