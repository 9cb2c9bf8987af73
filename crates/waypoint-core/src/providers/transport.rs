//! Transport and chat-client seams for provider dispatch.
//!
//! The dispatcher never talks to the network directly: it goes through
//! the [`Transport`] trait (post JSON, get text back) for REST
//! providers and the [`ChatClient`] trait for the local model runtime.
//! Production code binds [`HttpTransport`] and the Ollama client;
//! tests bind deterministic stubs so the branching logic is testable
//! without network access.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::error::{Result, WaypointError};
use crate::models::Message;

/// Bounded timeout applied to every outbound HTTP call. A hung
/// provider surfaces as a provider-unavailable failure after this.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// One-shot JSON POST capability.
///
/// All transport failures (non-2xx status, unreachable host) are
/// normalized to [`WaypointError::ProviderUnavailable`] carrying a
/// human-readable cause. Single attempt, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` as JSON to `url` with the given extra headers and
    /// returns the raw response body text.
    async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<String>;
}

/// Reply from the local model runtime, produced at the transport
/// boundary as a closed union so extraction is a total match rather
/// than speculative shape probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// A single complete reply message
    Message { content: String },
    /// Streamed chunk texts, already drained in arrival order
    Chunks(Vec<String>),
}

impl ChatReply {
    /// Collapses the reply to plain text: a message's content, or the
    /// concatenation of all chunks in arrival order.
    pub fn into_text(self) -> String {
        match self {
            ChatReply::Message { content } => content,
            ChatReply::Chunks(chunks) => chunks.concat(),
        }
    }
}

/// Chat capability of a local model runtime.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends a conversation to `model` and returns the reply; when
    /// `stream` is set, the implementation drains the chunk sequence
    /// before returning.
    async fn send(&self, model: &str, messages: &[Message], stream: bool) -> Result<ChatReply>;
}

/// Production [`Transport`] backed by reqwest with a bounded timeout.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates the transport with the standard 60 second timeout.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| WaypointError::configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<String> {
        debug!("POST {url}");
        let mut request = self.http.post(url).json(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            WaypointError::provider(format!("Failed to reach provider endpoint: {e}"))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            WaypointError::provider(format!("Failed to read provider response: {e}"))
        })?;

        if !status.is_success() {
            return Err(WaypointError::provider(format!(
                "Provider returned HTTP {}: {text}",
                status.as_u16()
            )));
        }

        Ok(text)
    }
}
