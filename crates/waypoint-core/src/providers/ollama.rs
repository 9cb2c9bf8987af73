//! Chat client for the local Ollama runtime.
//!
//! Binds the [`ChatClient`] seam to Ollama's HTTP API. Non-streaming
//! calls return one reply object; streaming calls drain the NDJSON
//! chunk sequence in arrival order. Reply decoding is tolerant:
//! unexpected shapes become empty text, never an error, since the
//! normalizer downstream has its own fallback tiers.

use async_trait::async_trait;
use futures::StreamExt;
use log::debug;

use super::transport::{ChatClient, ChatReply, HTTP_TIMEOUT};
use crate::error::{Result, WaypointError};
use crate::models::Message;

/// Default address of the local Ollama daemon.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// [`ChatClient`] implementation talking to a local Ollama daemon.
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    /// Creates a client for the daemon at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| WaypointError::configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Creates a client for the default local daemon address.
    pub fn local() -> Result<Self> {
        Self::new(DEFAULT_OLLAMA_URL)
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn send(&self, model: &str, messages: &[Message], stream: bool) -> Result<ChatReply> {
        debug!("ollama chat: model={model} stream={stream}");
        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": stream,
        });

        let response = self
            .http
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                WaypointError::provider(format!(
                    "Failed to reach the Ollama daemon at {}: {e}. Ensure `ollama serve` is running.",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WaypointError::provider(format!(
                "Ollama returned HTTP {}: {text}",
                status.as_u16()
            )));
        }

        if !stream {
            let text = response.text().await.map_err(|e| {
                WaypointError::provider(format!("Failed to read Ollama response: {e}"))
            })?;
            return Ok(ChatReply::Message {
                content: extract_message_content(&text),
            });
        }

        // Streaming replies arrive as newline-delimited JSON objects.
        let mut chunks: Vec<String> = Vec::new();
        let mut buffer = String::new();
        let mut byte_stream = response.bytes_stream();
        while let Some(part) = byte_stream.next().await {
            let part = part.map_err(|e| {
                WaypointError::provider(format!("Ollama stream interrupted: {e}"))
            })?;
            buffer.push_str(&String::from_utf8_lossy(&part));
            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer = buffer[line_end + 1..].to_string();
                if line.is_empty() {
                    continue;
                }
                let content = extract_message_content(&line);
                if !content.is_empty() {
                    chunks.push(content);
                }
            }
        }
        if !buffer.trim().is_empty() {
            let content = extract_message_content(buffer.trim());
            if !content.is_empty() {
                chunks.push(content);
            }
        }

        Ok(ChatReply::Chunks(chunks))
    }
}

/// Best-effort extraction of `message.content` from one reply object.
///
/// Unparseable or unexpectedly shaped replies yield an empty string.
fn extract_message_content(raw: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return String::new();
    };
    value
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .unwrap_or_default()
        .to_string()
}
