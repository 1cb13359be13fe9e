//! Outbound communication ports — SMS, voice and email.
//!
//! Providers report failures as [`ProviderError`] so the dispatcher can keep
//! them apart from configuration mistakes.

use std::future::Future;
use std::sync::Arc;

/// A downstream provider did not accept the request.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Rejected {
        provider: &'static str,
        status: u16,
        /// Response body as sent by the provider (usually its error payload).
        body: String,
    },

    /// The request never got a response (DNS, TLS, timeout, …).
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Sends text messages.
pub trait SmsProvider {
    /// Submit `body` to `to` from the sending number `from`.
    ///
    /// Returns the provider's reference for the accepted message.
    fn send_sms(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// Places outbound voice calls.
pub trait VoiceProvider {
    /// Call `to` from `from`, handing the answered call to the announcement
    /// flow at `announcement_url`.
    ///
    /// Returns the provider's reference for the call.
    fn place_call(
        &self,
        from: &str,
        to: &str,
        announcement_url: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// An outgoing email, fully interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Hands emails to a mail transport.
pub trait EmailTransport {
    fn send_email(
        &self,
        message: EmailMessage,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

impl<T: SmsProvider + Send + Sync> SmsProvider for Arc<T> {
    fn send_sms(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        (**self).send_sms(from, to, body)
    }
}

impl<T: VoiceProvider + Send + Sync> VoiceProvider for Arc<T> {
    fn place_call(
        &self,
        from: &str,
        to: &str,
        announcement_url: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        (**self).place_call(from, to, announcement_url)
    }
}
