//! Payload and reply handling for OpenAI-compatible chat providers.
//!
//! Several REST providers (OpenRouter, Hugging Face inference) share
//! the Chat Completions wire format: `{model, messages}` out, a
//! `choices[].message.content` string back.

use serde::Deserialize;

use crate::error::{Result, WaypointError};
use crate::models::Message;

/// Builds the `{model, messages}` request body.
pub fn build_payload(messages: &[Message], model: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": messages,
    })
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts the first `choices[].message.content` string.
///
/// At this layer there is no further fallback, so a missing field is
/// a propagated provider failure rather than graceful degradation.
pub fn extract_content(raw: &str) -> Result<String> {
    let reply: ChatCompletionReply = serde_json::from_str(raw)
        .map_err(|_| WaypointError::provider("Unable to parse provider response as JSON."))?;

    reply
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.and_then(|message| message.content))
        .next()
        .ok_or_else(|| WaypointError::provider("Provider response did not include message content."))
}
