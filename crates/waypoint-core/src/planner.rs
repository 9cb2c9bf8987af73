//! High-level planner API and the plan-normalization pipeline.
//!
//! [`Planner::generate_plan`] turns a plain-language task description
//! into a structured [`Plan`]. When a provider is selected, the raw
//! response text goes through a fixed fallback chain: strict JSON
//! parsing first, then listing-style line parsing, then the local
//! sentence-splitting heuristic. With no provider the heuristic runs
//! directly. A JSON object with no recognizable plan content is not a
//! plan and falls through to the next tier.

use std::sync::{Arc, LazyLock};

use log::debug;
use regex::Regex;

use crate::environment::{detect_termux, environment_note};
use crate::error::Result;
use crate::models::{Plan, PlanStep};
use crate::params::GeneratePlan;
use crate::providers::{
    request_plan_text, ChatClient, HttpTransport, OllamaClient, PlanRequest, Transport,
};

/// Main planner interface.
///
/// Holds the detected environment and the injectable transport/chat
/// capabilities; each [`Planner::generate_plan`] call is independent
/// and performs at most one outbound request.
pub struct Planner {
    termux: bool,
    transport: Arc<dyn Transport>,
    chat: Arc<dyn ChatClient>,
}

/// Builder for [`Planner`] instances.
///
/// Defaults bind the real HTTP transport, the local Ollama client,
/// and process-environment Termux detection; tests override any of
/// the three.
#[derive(Default)]
pub struct PlannerBuilder {
    termux: Option<bool>,
    transport: Option<Arc<dyn Transport>>,
    chat: Option<Arc<dyn ChatClient>>,
}

impl PlannerBuilder {
    /// Creates a builder with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides environment detection with a fixed boolean.
    pub fn with_termux(mut self, termux: bool) -> Self {
        self.termux = Some(termux);
        self
    }

    /// Overrides the HTTP transport used for REST providers.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Overrides the chat client used for the Ollama provider.
    pub fn with_chat_client(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Builds the planner, binding production defaults for anything
    /// not overridden.
    pub fn build(self) -> Result<Planner> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };
        let chat = match self.chat {
            Some(chat) => chat,
            None => Arc::new(OllamaClient::local()?),
        };
        Ok(Planner {
            termux: self.termux.unwrap_or_else(detect_termux),
            transport,
            chat,
        })
    }
}

impl Planner {
    /// Returns an actionable plan for the request's description.
    ///
    /// An empty or whitespace-only description short-circuits to an
    /// empty plan carrying only the environment note; it is not an
    /// error. Provider configuration problems and transport failures
    /// are surfaced to the caller untouched.
    pub async fn generate_plan(&self, params: &GeneratePlan) -> Result<Plan> {
        let normalized = params.description.replace('\n', " ").trim().to_string();
        let environment_message = environment_note(self.termux);
        if normalized.is_empty() {
            return Ok(Plan {
                summary: String::new(),
                steps: Vec::new(),
                environment_note: environment_message,
            });
        }

        let summary = derive_summary(&normalized);

        let resolved_provider = params
            .provider
            .clone()
            .or_else(|| params.ollama_model.as_ref().map(|_| "ollama".to_string()))
            .unwrap_or_else(|| "heuristic".to_string());
        let resolved_model = params.model.as_deref().or(params.ollama_model.as_deref());

        let mut plan = if !resolved_provider.is_empty()
            && resolved_provider.to_lowercase() != "heuristic"
        {
            let request = PlanRequest {
                provider: &resolved_provider,
                description: &normalized,
                model: resolved_model,
                termux: self.termux,
                chain_of_thought: params.chain_of_thought,
                stream: params.stream,
                options: &params.options,
            };
            let raw_plan =
                request_plan_text(&request, self.transport.as_ref(), self.chat.as_ref()).await?;
            debug!("provider returned {} bytes of plan text", raw_plan.len());

            match parse_plan_json(&raw_plan) {
                Some(mut parsed) => {
                    if parsed.summary.is_empty() {
                        parsed.summary = summary;
                    }
                    if parsed.environment_note.is_empty() {
                        parsed.environment_note = environment_message.clone();
                    }
                    parsed
                }
                None => {
                    let mut steps = parse_listing_lines(&raw_plan);
                    if steps.is_empty() {
                        steps = heuristic_steps(&normalized);
                    }
                    Plan {
                        summary,
                        steps,
                        environment_note: environment_message.clone(),
                    }
                }
            }
        } else {
            Plan {
                summary,
                steps: heuristic_steps(&normalized),
                environment_note: environment_message.clone(),
            }
        };

        if params.max_steps.is_some() {
            plan = plan.truncated(params.max_steps);
        }

        if plan.environment_note.is_empty() {
            plan.environment_note = environment_message;
        }

        Ok(plan)
    }
}

/// Uppercases the first character only, leaving the rest untouched.
/// Blank input maps to an empty string.
pub fn capitalize_first(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives a one-sentence summary: the first non-blank segment split
/// on sentence-terminating punctuation, falling back to the first 120
/// characters of the description.
fn derive_summary(description: &str) -> String {
    for part in description.split(['.', '!', '?']) {
        let cleaned = part.trim();
        if !cleaned.is_empty() {
            return capitalize_first(cleaned);
        }
    }
    capitalize_first(&description.chars().take(120).collect::<String>())
}

/// Heuristic generator: one step per sentence segment of the
/// description, in order.
fn heuristic_steps(normalized_description: &str) -> Vec<PlanStep> {
    normalized_description
        .replace(['?', '!'], ".")
        .split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(|sentence| PlanStep::new(capitalize_first(sentence)))
        .collect()
}

static LISTING_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*•]\s*|\d+[).:\-]\s*|step\s+\d+[:.\-]\s*)").expect("valid regex")
});

/// Strict-JSON parse of raw provider text.
///
/// Returns `None` when the text is not a JSON object or when the
/// object yields zero steps, an empty summary override, and no
/// environment text; the caller then falls through to the loose-line
/// parser. Summary and environment note in the returned plan may be
/// empty; the caller backfills them.
fn parse_plan_json(raw_plan: &str) -> Option<Plan> {
    let payload: serde_json::Value = serde_json::from_str(raw_plan).ok()?;
    let payload = payload.as_object()?;

    let summary = payload
        .get("task_summary")
        .and_then(|value| value.as_str())
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let environment_text = normalize_environment_text(payload.get("environment"));

    let steps: Vec<PlanStep> = payload
        .get("steps")
        .and_then(|value| value.as_array())
        .map(|entries| entries.iter().filter_map(parse_step_entry).collect())
        .unwrap_or_default();

    if steps.is_empty() && summary.is_empty() && environment_text.is_empty() {
        return None;
    }

    Some(Plan {
        summary,
        steps,
        environment_note: environment_text,
    })
}

/// Loose-line parse: every non-blank line with its listing marker
/// stripped becomes a step title.
fn parse_listing_lines(raw_plan: &str) -> Vec<PlanStep> {
    raw_plan
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| LISTING_PREFIX.replace(line, "").to_string())
        .filter(|line| !line.is_empty())
        .map(|line| PlanStep::new(capitalize_first(&line)))
        .collect()
}

/// Normalizes provider-supplied environment text: trims it and
/// prepends the `Environment:` tag unless already present
/// (case-insensitively). Anything non-string yields an empty string.
fn normalize_environment_text(value: Option<&serde_json::Value>) -> String {
    let Some(candidate) = value.and_then(|v| v.as_str()) else {
        return String::new();
    };
    let candidate = candidate.trim();
    if candidate.is_empty() {
        String::new()
    } else if candidate.to_lowercase().starts_with("environment:") {
        candidate.to_string()
    } else {
        format!("Environment: {candidate}")
    }
}

/// Parses one entry from a strict-JSON `steps` array.
///
/// Structured records pull the title from the first present and
/// non-blank of `title`/`summary`/`action`, notes from
/// `notes`/`note`/`details`, and fall back to the command text as the
/// title. Plain strings become informational steps. Everything else
/// is skipped.
fn parse_step_entry(entry: &serde_json::Value) -> Option<PlanStep> {
    if let Some(record) = entry.as_object() {
        let title = ["title", "summary", "action"]
            .iter()
            .find_map(|key| clean_text(record.get(*key)));
        let command = clean_text(record.get("command"));
        let notes = ["notes", "note", "details"]
            .iter()
            .find_map(|key| clean_text(record.get(*key)));

        let title = title.or_else(|| command.clone())?;
        return Some(PlanStep {
            title: capitalize_first(&title),
            command,
            notes,
        });
    }

    if let Some(text) = entry.as_str() {
        let cleaned = text.trim();
        if !cleaned.is_empty() {
            return Some(PlanStep::new(capitalize_first(cleaned)));
        }
    }

    None
}

/// Trims a JSON string value, mapping blanks and non-strings to
/// `None`.
fn clean_text(value: Option<&serde_json::Value>) -> Option<String> {
    let cleaned = value?.as_str()?.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
