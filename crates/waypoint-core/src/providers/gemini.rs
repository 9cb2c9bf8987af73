//! Payload and reply handling for the Gemini generateContent API.
//!
//! Gemini uses a contents/parts wire format: the system message moves
//! into a separate `system_instruction` field, assistant turns map to
//! the `model` role, and everything else maps to `user`.

use serde::Deserialize;

use crate::error::{Result, WaypointError};
use crate::models::{Message, Role};

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Builds the generateContent request body from a conversation.
pub fn build_payload(messages: &[Message]) -> serde_json::Value {
    let mut system_prompt = String::new();
    let mut contents: Vec<serde_json::Value> = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system_prompt = message.content.clone(),
            role => {
                let mapped = if role == Role::Assistant { "model" } else { "user" };
                contents.push(serde_json::json!({
                    "role": mapped,
                    "parts": [{"text": message.content}],
                }));
            }
        }
    }

    let mut payload = serde_json::json!({ "contents": contents });
    if !system_prompt.is_empty() {
        payload["system_instruction"] = serde_json::json!({"parts": [{"text": system_prompt}]});
    }
    payload
}

#[derive(Debug, Deserialize)]
struct GenerateContentReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Extracts the first candidate's first text part.
pub fn extract_content(raw: &str) -> Result<String> {
    let reply: GenerateContentReply = serde_json::from_str(raw)
        .map_err(|_| WaypointError::provider("Unable to parse Gemini response."))?;

    reply
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .next()
        .ok_or_else(|| WaypointError::provider("Gemini response did not include text content."))
}
