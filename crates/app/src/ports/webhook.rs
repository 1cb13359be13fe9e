//! Webhook port — generic outbound HTTP calls.

use std::collections::BTreeMap;
use std::future::Future;

use crate::ports::ProviderError;

/// A fully interpolated outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    /// Upper-case HTTP method, e.g. `POST`.
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Raw request body; sent with `Content-Type: application/json`.
    pub body: Option<String>,
}

/// Sends webhook requests.
pub trait WebhookClient {
    /// Send `request`, returning the response status on 2xx.
    ///
    /// # Errors
    ///
    /// Non-2xx responses are [`ProviderError::Rejected`]; network failures
    /// are [`ProviderError::Transport`].
    fn send(
        &self,
        request: WebhookRequest,
    ) -> impl Future<Output = Result<u16, ProviderError>> + Send;
}
