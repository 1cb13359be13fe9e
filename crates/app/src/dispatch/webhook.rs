//! `webhook` — arbitrary HTTP request with an interpolated JSON body.

use std::collections::BTreeMap;

use http::{HeaderName, HeaderValue, Method};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use fieldops_domain::automation::ActionType;

use super::fields::{decode, invalid, non_empty, required};
use super::{ActionError, ConfigIssue};
use crate::ports::{WebhookClient, WebhookRequest};

const KIND: ActionType = ActionType::Webhook;
const DEFAULT_METHOD: &str = "POST";

#[derive(Deserialize)]
struct Wire {
    #[serde(default, deserialize_with = "non_empty")]
    url: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    method: Option<String>,
    #[serde(default)]
    headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    body: Option<Value>,
}

/// `{ "url": …, "method"?: …, "headers"?: {…}, "body"?: … }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: String,
    /// Upper-cased; `POST` when not configured.
    pub method: String,
    pub headers: BTreeMap<String, String>,
    /// Serialised request body. Objects and arrays are encoded as JSON,
    /// strings are sent verbatim.
    pub body: Option<String>,
}

fn invalid_value(field: &'static str, reason: String) -> ActionError {
    invalid(KIND, ConfigIssue::InvalidValue { field, reason })
}

impl WebhookConfig {
    /// # Errors
    ///
    /// [`ActionError::InvalidConfig`] when `url` is missing, unparseable or
    /// not http(s), the method is not an HTTP token, or a header name or
    /// value cannot be sent.
    pub fn parse(config: &Value) -> Result<Self, ActionError> {
        let wire: Wire = decode(KIND, config)?;

        let url = required(KIND, "url", wire.url)?;
        let parsed = Url::parse(&url).map_err(|err| invalid_value("url", err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid_value(
                "url",
                "must be an http:// or https:// URL".to_string(),
            ));
        }

        let method = wire
            .method
            .map_or_else(|| DEFAULT_METHOD.to_string(), |m| m.to_ascii_uppercase());
        if !method.bytes().all(|b| b.is_ascii_uppercase())
            || Method::from_bytes(method.as_bytes()).is_err()
        {
            return Err(invalid_value(
                "method",
                format!("`{method}` is not an HTTP method"),
            ));
        }

        let headers = wire.headers.unwrap_or_default();
        for (name, value) in &headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(invalid_value(
                    "headers",
                    format!("`{name}` is not a valid header name"),
                ));
            }
            if HeaderValue::from_str(value).is_err() {
                return Err(invalid_value(
                    "headers",
                    format!("value of `{name}` is not a valid header value"),
                ));
            }
        }

        let body = match wire.body {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };

        Ok(Self {
            url,
            method,
            headers,
            body,
        })
    }
}

pub(super) async fn execute<C>(client: &C, config: WebhookConfig) -> Result<(), ActionError>
where
    C: WebhookClient + Sync,
{
    let url = config.url.clone();
    let status = client
        .send(WebhookRequest {
            method: config.method,
            url: config.url,
            headers: config.headers,
            body: config.body,
        })
        .await?;
    tracing::info!(%url, status, "webhook delivered");
    Ok(())
}
