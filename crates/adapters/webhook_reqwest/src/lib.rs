//! # fieldops-adapter-webhook-reqwest
//!
//! Implements the `WebhookClient` port with [reqwest](https://docs.rs/reqwest).
//! Requests carry the configured method, headers verbatim and a JSON body;
//! any non-2xx response is a rejection carrying the status code.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use fieldops_app::ports::{ProviderError, WebhookClient, WebhookRequest};

const PROVIDER: &str = "webhook";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to set up the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A request that could not even be built from the action config.
#[derive(Debug, thiserror::Error)]
enum InvalidRequest {
    #[error("invalid HTTP method `{0}`")]
    Method(String),
    #[error("invalid header `{0}`")]
    Header(String),
}

#[derive(Debug, Clone)]
pub struct ReqwestWebhookClient {
    http: reqwest::Client,
}

impl ReqwestWebhookClient {
    /// # Errors
    ///
    /// Returns [`WebhookError::Client`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    fn build(&self, request: WebhookRequest) -> Result<reqwest::RequestBuilder, InvalidRequest> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| InvalidRequest::Method(request.method.clone()))?;
        let mut headers = HeaderMap::with_capacity(request.headers.len() + 1);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // Configured headers replace the default, including `Content-Type`.
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| InvalidRequest::Header(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| InvalidRequest::Header(name.as_str().to_string()))?;
            headers.insert(name, value);
        }
        let mut builder = self.http.request(method, &request.url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        Ok(builder)
    }
}

impl WebhookClient for ReqwestWebhookClient {
    async fn send(&self, request: WebhookRequest) -> Result<u16, ProviderError> {
        let url = request.url.clone();
        let method = request.method.clone();
        let builder = self.build(request).map_err(|err| ProviderError::Transport {
            provider: PROVIDER,
            source: Box::new(err),
        })?;

        let response = builder.send().await.map_err(|err| ProviderError::Transport {
            provider: PROVIDER,
            source: Box::new(err),
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%method, %url, status, "webhook rejected");
            return Err(ProviderError::Rejected {
                provider: PROVIDER,
                status,
                body,
            });
        }
        tracing::debug!(%method, %url, status, "webhook accepted");
        Ok(status)
    }
}
