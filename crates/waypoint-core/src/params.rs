//! Parameter structures for Waypoint operations
//!
//! This module contains shared parameter structures that can be used
//! across different interfaces (CLI, future APIs) without
//! framework-specific derives or dependencies. Interface layers wrap
//! these with their own derives (clap::Args in the CLI) and convert
//! via `From`, keeping core types interface-agnostic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameters for a single planning request.
///
/// Everything the plan normalizer needs: the task text, the optional
/// step cap, provider selection, and provider-specific options. The
/// CLI layer is responsible for merging configuration-file defaults
/// into these fields before calling the planner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePlan {
    /// Natural language task description supplied by the user
    pub description: String,

    /// Optional cap on the number of generated steps
    pub max_steps: Option<usize>,

    /// Provider identifier (e.g. heuristic, ollama, openrouter)
    pub provider: Option<String>,

    /// Preferred remote model name when using a provider
    pub model: Option<String>,

    /// Backwards compatible alias for `model`; when set and `provider`
    /// is omitted, the Ollama provider is implied
    pub ollama_model: Option<String>,

    /// Whether the provider should stream responses when supported
    pub stream: bool,

    /// Ask the model to reason step-by-step before emitting the plan
    pub chain_of_thought: bool,

    /// Provider-specific configuration values (api_key, api_key_env,
    /// api_base, cohere_version)
    pub options: BTreeMap<String, String>,
}

/// Parameters for executing a named playbook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunPlaybook {
    /// Name of the playbook to execute
    pub name: String,

    /// Print commands without executing them
    pub dry_run: bool,

    /// Run independent commands on a bounded worker pool
    pub parallel: bool,

    /// Optional limit for the worker pool size in parallel mode
    pub max_workers: Option<usize>,
}
