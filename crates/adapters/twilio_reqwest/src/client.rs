//! Messages and Calls resources of the Twilio REST API.

use fieldops_app::ports::{ProviderError, SmsProvider, VoiceProvider};

use crate::config::TwilioConfig;

const PROVIDER: &str = "twilio";

/// Failure to set up the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The part of a created Message/Call resource we keep.
#[derive(Debug, serde::Deserialize)]
struct Resource {
    sid: String,
}

/// Twilio client implementing both [`SmsProvider`] and [`VoiceProvider`].
#[derive(Debug, Clone)]
pub struct TwilioClient {
    config: TwilioConfig,
    http: reqwest::Client,
}

impl TwilioClient {
    /// # Errors
    ///
    /// Returns [`TwilioError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: TwilioConfig) -> Result<Self, TwilioError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// Create an account resource from form `params` and return its `sid`.
    async fn create(&self, resource: &str, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let url = self.config.resource_url(resource);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(params)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), %body, "twilio rejected request");
            return Err(ProviderError::Rejected {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let created: Resource = response.json().await.map_err(transport)?;
        Ok(created.sid)
    }
}

fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        provider: PROVIDER,
        source: Box::new(err),
    }
}

impl SmsProvider for TwilioClient {
    async fn send_sms(&self, from: &str, to: &str, body: &str) -> Result<String, ProviderError> {
        self.create("Messages.json", &[("From", from), ("To", to), ("Body", body)])
            .await
    }
}

impl VoiceProvider for TwilioClient {
    async fn place_call(
        &self,
        from: &str,
        to: &str,
        announcement_url: &str,
    ) -> Result<String, ProviderError> {
        self.create(
            "Calls.json",
            &[("From", from), ("To", to), ("Url", announcement_url)],
        )
        .await
    }
}
