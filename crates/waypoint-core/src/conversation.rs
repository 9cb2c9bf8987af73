//! Conversation assembly for provider requests.
//!
//! Every provider consumes the same ordered conversation: a fixed
//! system message carrying Waypoint's operating rules and the strict
//! JSON output contract, optional well-formed history, and exactly one
//! final user message composed from the task description. Output is
//! byte-identical for identical inputs.

use crate::models::Message;

/// Operating rules and output contract sent as the system message of
/// every planning conversation.
pub const SYSTEM_PROMPT: &str = "\
You are Waypoint, a Termux-aware planning assistant. You help developers working on
Android devices craft concise, actionable plans that can be executed inside the
Termux shell. Always consider:
- Package management relies on `pkg`/`apt` rather than `sudo` or Homebrew.
- Devices often have limited RAM and CPU resources, so prefer lightweight tools.
- File paths should avoid hard-coded `/data/data` prefixes and assume a POSIX shell.
- Networking may be unreliable; cache downloads when possible.

When asked for help you must respond with a single JSON object using the schema:
{
  \"task_summary\": \"Short description of the task in 1 sentence\",
  \"steps\": [
    {
      \"title\": \"High-level action title\",
      \"command\": \"Specific Termux-friendly shell command, if relevant\",
      \"notes\": \"Optional clarifications or cautions\"
    }
  ],
  \"environment\": \"One sentence reminder about Termux constraints\"
}

If a shell command is not required for a step, use an empty string for the
\"command\" field. Keep responses focused and avoid markdown outside the JSON.";

/// Reusable prompt fragments surfaced by the CLI for users who want
/// to steer a model by hand.
pub const CHAIN_OF_THOUGHT_PROMPTS: &[&str] = &[
    "Think step-by-step to ensure the plan is safe, then provide only the JSON object in the final response.",
    "List the preconditions each step relies on before writing the step itself.",
    "For every command, state what output indicates success before moving on.",
    "Identify the single riskiest step and add a verification step right after it.",
    "Assume the device has under 4 GB of RAM; prefer tools that fit that budget.",
    "If a step could fail on flaky networking, add a retry or a cached alternative.",
];

/// Builds the ordered message list for one planning request.
///
/// History entries are merged permissively: any value that is not a
/// well-formed `{role, content}` pair of strings is skipped without
/// error. The final user message contains the planning instruction,
/// the chain-of-thought instruction when requested (always the second
/// line), an environment hint chosen by `termux`, and the trimmed
/// task text.
pub fn build_conversation(
    description: &str,
    chain_of_thought: bool,
    termux: bool,
    history: &[serde_json::Value],
) -> Vec<Message> {
    let mut messages = vec![Message::system(SYSTEM_PROMPT)];
    for entry in history {
        if let Some(message) = Message::from_value(entry) {
            messages.push(message);
        }
    }

    let environment_hint = if termux {
        "The user is running inside Termux on Android."
    } else {
        "The user may be on a standard Linux distribution but wants Termux-compatible steps."
    };

    let mut instructions = vec![
        "Plan the work before execution and output valid JSON only.".to_string(),
        environment_hint.to_string(),
        format!("Task: {}", description.trim()),
    ];
    if chain_of_thought {
        instructions.insert(1, CHAIN_OF_THOUGHT_PROMPTS[0].to_string());
    }

    messages.push(Message::user(instructions.join("\n")));
    messages
}
