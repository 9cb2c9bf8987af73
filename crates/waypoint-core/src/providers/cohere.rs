//! Payload and reply handling for the Cohere chat API.
//!
//! Cohere folds a conversation into a single current message plus
//! history: the system message becomes `preamble`, the latest user
//! content becomes `message`, and earlier turns land in
//! `chat_history` with USER/CHATBOT role labels.

use serde::Deserialize;

use crate::error::{Result, WaypointError};
use crate::models::{Message, Role};

/// Default value for the `Cohere-Version` header.
pub const DEFAULT_VERSION: &str = "2024-10-22";

/// Builds the chat request body from a conversation.
pub fn build_payload(messages: &[Message], model: &str) -> serde_json::Value {
    let mut system_prompt = String::new();
    let mut chat_history: Vec<serde_json::Value> = Vec::new();
    let mut user_message = String::new();

    for message in messages {
        match message.role {
            Role::System => system_prompt = message.content.clone(),
            Role::User => {
                if !user_message.is_empty() {
                    chat_history.push(serde_json::json!({
                        "role": "USER",
                        "message": user_message,
                    }));
                }
                user_message = message.content.clone();
            }
            Role::Assistant => chat_history.push(serde_json::json!({
                "role": "CHATBOT",
                "message": message.content,
            })),
        }
    }

    let mut payload = serde_json::json!({
        "model": model,
        "message": user_message,
        "chat_history": chat_history,
    });
    if !system_prompt.is_empty() {
        payload["preamble"] = serde_json::json!(system_prompt);
    }
    payload
}

#[derive(Debug, Deserialize)]
struct CohereReply {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    text: Option<String>,
}

/// Extracts the top-level `text` field, falling back to the first
/// generation's text.
pub fn extract_content(raw: &str) -> Result<String> {
    let reply: CohereReply = serde_json::from_str(raw)
        .map_err(|_| WaypointError::provider("Unable to parse Cohere response."))?;

    if let Some(text) = reply.text {
        return Ok(text);
    }

    reply
        .generations
        .into_iter()
        .filter_map(|generation| generation.text)
        .next()
        .ok_or_else(|| WaypointError::provider("Cohere response did not include text content."))
}
