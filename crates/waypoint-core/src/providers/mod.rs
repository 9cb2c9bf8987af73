//! Provider dispatch for plan generation.
//!
//! Maps a provider identifier to a transport (the local Ollama
//! runtime or one of several REST wire formats) and normalizes every
//! success path to plain response text. Configuration problems
//! (missing model, unresolvable API key) are detected before any
//! transport call; transport failures surface as
//! [`WaypointError::ProviderUnavailable`] and are never retried.

use std::collections::BTreeMap;

use log::debug;

pub mod cohere;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod transport;

pub use ollama::{OllamaClient, DEFAULT_OLLAMA_URL};
pub use transport::{ChatClient, ChatReply, HttpTransport, Transport};

use crate::conversation::build_conversation;
use crate::error::{Result, WaypointError};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co/v1/chat/completions";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const COHERE_URL: &str = "https://api.cohere.com/v1/chat";

/// One outbound planning request, before provider-specific encoding.
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    /// Provider identifier, matched case-insensitively
    pub provider: &'a str,
    /// Normalized task description
    pub description: &'a str,
    /// Remote model name, when the provider requires one
    pub model: Option<&'a str>,
    /// Whether the detected environment is Termux
    pub termux: bool,
    /// Ask the model to reason before emitting the plan
    pub chain_of_thought: bool,
    /// Stream responses where the provider supports it
    pub stream: bool,
    /// Provider-specific options (api_key, api_key_env, api_base,
    /// cohere_version)
    pub options: &'a BTreeMap<String, String>,
}

/// Returns the raw plan text for `request` using the injected
/// transport and chat capabilities.
pub async fn request_plan_text(
    request: &PlanRequest<'_>,
    http: &dyn Transport,
    chat: &dyn ChatClient,
) -> Result<String> {
    let provider = request.provider.trim().to_lowercase();
    debug!("dispatching plan request to provider '{provider}'");

    match provider.as_str() {
        "" | "heuristic" => Err(WaypointError::provider(
            "The heuristic provider does not produce remote responses.",
        )),
        "ollama" => {
            let Some(model) = request.model else {
                return Err(WaypointError::configuration(
                    "Specify --model when using the Ollama provider.",
                ));
            };
            let messages = build_conversation(
                request.description,
                request.chain_of_thought,
                request.termux,
                &[],
            );
            let reply = chat.send(model, &messages, request.stream).await?;
            Ok(reply.into_text())
        }
        "openrouter" | "huggingface" => {
            let default_url = if provider == "openrouter" {
                OPENROUTER_URL
            } else {
                HUGGINGFACE_URL
            };
            let api_key = resolve_api_key(request.options).ok_or_else(|| {
                WaypointError::configuration(
                    "An API key is required for OpenAI-compatible providers. Set --api-key \
                     or configure llm.api_key_env.",
                )
            })?;
            let Some(model) = request.model else {
                return Err(WaypointError::configuration(
                    "Specify --model for the selected provider.",
                ));
            };
            let messages = build_conversation(
                request.description,
                request.chain_of_thought,
                request.termux,
                &[],
            );
            let url = request
                .options
                .get("api_base")
                .map_or(default_url, String::as_str);
            let payload = openai::build_payload(&messages, model);
            let headers = vec![("Authorization".to_string(), format!("Bearer {api_key}"))];
            let raw = http.post(url, &payload, &headers).await?;
            openai::extract_content(&raw)
        }
        "gemini" => {
            let api_key = resolve_api_key(request.options).ok_or_else(|| {
                WaypointError::configuration(
                    "Gemini requires an API key. Configure llm.api_key_env or pass --api-key.",
                )
            })?;
            let model = request.model.unwrap_or(gemini::DEFAULT_MODEL);
            let base = request
                .options
                .get("api_base")
                .map_or(GEMINI_BASE_URL, String::as_str);
            // Gemini passes the key as a URL query parameter, not a header.
            let url = format!(
                "{}/models/{model}:generateContent?key={api_key}",
                base.trim_end_matches('/')
            );
            let messages = build_conversation(
                request.description,
                request.chain_of_thought,
                request.termux,
                &[],
            );
            let payload = gemini::build_payload(&messages);
            let raw = http.post(&url, &payload, &[]).await?;
            gemini::extract_content(&raw)
        }
        "cohere" => {
            let api_key = resolve_api_key(request.options).ok_or_else(|| {
                WaypointError::configuration(
                    "Cohere requires an API key. Configure llm.api_key_env or pass --api-key.",
                )
            })?;
            let Some(model) = request.model else {
                return Err(WaypointError::configuration(
                    "Specify --model for the Cohere provider.",
                ));
            };
            let url = request
                .options
                .get("api_base")
                .map_or(COHERE_URL, String::as_str);
            let messages = build_conversation(
                request.description,
                request.chain_of_thought,
                request.termux,
                &[],
            );
            let payload = cohere::build_payload(&messages, model);
            let version = request
                .options
                .get("cohere_version")
                .map_or(cohere::DEFAULT_VERSION, String::as_str);
            let headers = vec![
                ("Authorization".to_string(), format!("Bearer {api_key}")),
                ("Cohere-Version".to_string(), version.to_string()),
            ];
            let raw = http.post(url, &payload, &headers).await?;
            cohere::extract_content(&raw)
        }
        other => Err(WaypointError::provider(format!("Unknown provider '{other}'."))),
    }
}

/// Resolves the API key for a request: an explicit `api_key` option
/// wins; otherwise the environment variable named by `api_key_env` is
/// read; otherwise the key is unresolved.
fn resolve_api_key(options: &BTreeMap<String, String>) -> Option<String> {
    if let Some(direct) = options.get("api_key") {
        if !direct.is_empty() {
            return Some(direct.clone());
        }
    }
    options
        .get("api_key_env")
        .and_then(|name| std::env::var(name).ok())
        .filter(|key| !key.is_empty())
}
