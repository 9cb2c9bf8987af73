//! Data models for plans, steps, and conversations.
//!
//! This module contains the core domain models of Waypoint: the
//! structured [`Plan`] produced by a planning request, its ordered
//! [`PlanStep`] entries, and the role-tagged [`Message`] values sent
//! to language-model providers.
//!
//! `Plan` and `PlanStep` serialize to the structured plan schema
//! consumed by rendering and by downstream tooling:
//!
//! ```json
//! {
//!   "summary": "Install dependencies",
//!   "steps": [{"title": "Install git", "command": "pkg install -y git"}],
//!   "environment": "Environment: Detected Termux. ..."
//! }
//! ```
//!
//! Optional step fields are omitted from the output entirely rather
//! than serialized as null, matching the wire contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed operating rules and output contract
    System,
    /// Input from the person asking for a plan
    User,
    /// Prior model output carried as conversation history
    Assistant,
}

impl Role {
    /// Wire-format string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parses a wire-format role string, rejecting unknown values.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One role-tagged message in a provider conversation.
///
/// Messages are built fresh per planning request and have no
/// persistent identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Who produced the content
    pub role: Role,

    /// Plain text body of the message
    pub content: String,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Builds a message from a loose JSON value.
    ///
    /// Returns `None` when the role or content is missing or not a
    /// string; callers merging untrusted history skip such entries
    /// instead of failing.
    pub fn from_value(value: &serde_json::Value) -> Option<Message> {
        let role = value.get("role").and_then(|r| r.as_str())?;
        let role = Role::parse(role)?;
        let content = value.get("content").and_then(|c| c.as_str())?;
        Some(Message {
            role,
            content: content.to_string(),
        })
    }
}

/// A single actionable step in a generated plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    /// Short description of the action to perform. Never empty on a
    /// normalized step: when only a command was extracted, the
    /// command text becomes the title.
    pub title: String,

    /// Shell command associated with the step, when one applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Free-form clarification for the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlanStep {
    /// Creates an informational step with a title only.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: None,
            notes: None,
        }
    }

    /// Formats the step for console output with a one-based index.
    pub fn format_lines(&self, index: usize) -> Vec<String> {
        let mut lines = vec![format!(" - Step {index}: {}", self.title)];
        if let Some(command) = &self.command {
            lines.push(format!("   Command: {command}"));
        }
        if let Some(notes) = &self.notes {
            lines.push(format!("   Notes: {notes}"));
        }
        lines
    }
}

/// Structured representation of an execution plan.
///
/// A plan is an immutable value: [`Plan::truncated`] returns a new
/// plan rather than mutating in place. The environment note is never
/// empty once a plan leaves the normalizer and always begins with the
/// literal tag `Environment:`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// One-sentence description of the overall task. Empty only when
    /// the source description was empty.
    pub summary: String,

    /// Ordered steps; order is execution order
    pub steps: Vec<PlanStep>,

    /// Human-readable runtime-constraint line, tagged `Environment:`
    #[serde(rename = "environment")]
    pub environment_note: String,
}

impl Plan {
    /// Returns a copy limited to `max_steps` entries.
    ///
    /// Summary and environment note are carried over unchanged.
    pub fn truncated(&self, max_steps: Option<usize>) -> Plan {
        match max_steps {
            Some(limit) if limit < self.steps.len() => Plan {
                summary: self.summary.clone(),
                steps: self.steps[..limit].to_vec(),
                environment_note: self.environment_note.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Returns `true` when no summary or steps were produced.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.summary.trim().is_empty()
    }

    /// Produces the console lines representing this plan.
    pub fn formatted_output(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            lines.extend(step.format_lines(index + 1));
        }
        if !self.environment_note.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(self.environment_note.clone());
        }
        lines
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.formatted_output() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
