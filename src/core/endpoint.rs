//! Remote chat endpoint.
//!
//! Wire contract:
//!
//! ```text
//! POST {base_url}/api/chat/message
//! Authorization: Bearer {api_key}
//! {"modelId": "...", "message": "...", "temperature": 0.7, "maxTokens": 1000}
//! ```
//!
//! A usable answer is an HTTP 200 response carrying
//! `{"success": true, "data": {"response": "...", "cost": 0.002, "tokenCount": 15}}`.
//! Everything else is classified into a [`CostlensError`].

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::http::{self, DEFAULT_TIMEOUT};
use crate::error::{CostlensError, Result};
use crate::util::mask_secret;

/// Path of the chat message endpoint, relative to the base URL.
pub const CHAT_MESSAGE_PATH: &str = "/api/chat/message";

/// Connection settings for the chat endpoint.
#[derive(Clone)]
pub struct EndpointConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl EndpointConfig {
    /// Create settings with the default 30 second timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the chat message endpoint.
    #[must_use]
    pub fn message_url(&self) -> String {
        format!("{}{CHAT_MESSAGE_PATH}", self.base_url)
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &mask_secret(&self.api_key))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Outbound chat request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub model_id: String,
    pub message: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A successful model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub cost: Option<f64>,
    pub tokens: Option<u64>,
}

/// Something that can answer one chat message.
///
/// The session controller is generic over this so it can be driven by the
/// HTTP endpoint in production and by a scripted endpoint in tests.
#[allow(async_fn_in_trait)]
pub trait ChatEndpoint {
    /// Send one message and wait for the reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// [`ChatEndpoint`] backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpChatEndpoint {
    client: Client,
    config: EndpointConfig,
}

impl HttpChatEndpoint {
    /// Build an endpoint with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let client = http::build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Connection settings in use.
    #[must_use]
    pub const fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

impl ChatEndpoint for HttpChatEndpoint {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.config.message_url();
        tracing::debug!(
            %url,
            model = %request.model_id,
            chars = request.message.chars().count(),
            "Sending chat message"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| http::map_send_error(&e, self.config.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| http::map_send_error(&e, self.config.timeout))?;

        tracing::debug!(status, bytes = body.len(), "Chat endpoint responded");
        parse_reply(status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    data: Option<ReplyData>,
    message: Option<String>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyData {
    response: String,
    cost: Option<f64>,
    #[serde(alias = "tokens")]
    token_count: Option<u64>,
}

/// Classify an HTTP status and body into a reply or an error.
///
/// # Errors
///
/// - [`CostlensError::Api`] for any status other than 200 and for `success: false`
/// - [`CostlensError::ParseResponse`] for 200 bodies that are not a usable envelope
pub fn parse_reply(status: u16, body: &str) -> Result<ChatReply> {
    if status != 200 {
        let message =
            extract_error_message(body).unwrap_or_else(|| format!("request failed with HTTP {status}"));
        return Err(CostlensError::Api {
            status: Some(status),
            message,
        });
    }

    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| CostlensError::ParseResponse(e.to_string()))?;

    if !envelope.success {
        let message = envelope
            .message
            .or_else(|| envelope.error.as_ref().and_then(error_value_text))
            .unwrap_or_else(|| "backend reported an unsuccessful response".to_string());
        return Err(CostlensError::Api {
            status: None,
            message,
        });
    }

    let data = envelope
        .data
        .ok_or_else(|| CostlensError::ParseResponse("response has no data field".to_string()))?;

    Ok(ChatReply {
        content: data.response,
        cost: data.cost,
        tokens: data.token_count,
    })
}

/// Pull a human-readable message out of an error body, if it has one.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .or_else(|| value.get("error").and_then(error_value_text))
        .filter(|m| !m.trim().is_empty())
}

fn error_value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
