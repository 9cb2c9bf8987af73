//! Command-line argument definitions using clap's derive API.
//!
//! Implements the parameter wrapper pattern: each subcommand carries a
//! clap-specific Args struct here, converted into framework-agnostic
//! core parameter types before any business logic runs. CLI concerns
//! (flag names, help text, `key=value` splitting) stay in this layer.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use waypoint_core::params::RunPlaybook;

/// Waypoint turns plain-language task descriptions into structured,
/// Termux-friendly execution plans.
///
/// Plans come from a configured LLM provider when one is available and
/// from a deterministic sentence-splitting heuristic otherwise. Named
/// playbooks from the configuration file can be executed directly.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Cli {
    /// Directory containing the .waypoint.json configuration file.
    /// Defaults to the current directory
    #[arg(long, global = true, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Waypoint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Create the default configuration and workspace directory
    Init(InitArgs),
    /// Generate a structured plan from a task description
    #[command(alias = "p")]
    Plan(PlanArgs),
    /// Execute a named playbook from the configuration
    #[command(alias = "r")]
    Run(RunArgs),
    /// Show the active configuration and detected environment
    Show,
    /// Print the built-in Termux quick reference
    #[command(alias = "ref")]
    Reference(ReferenceArgs),
    /// List reusable chain-of-thought prompt fragments
    Prompts,
}

/// Initialize the configuration directory
#[derive(ClapArgs)]
pub struct InitArgs {
    /// Replace an existing configuration file
    #[arg(long)]
    pub overwrite: bool,
}

/// Generate a plan from a task description
///
/// Flags override the `llm` section of the configuration file; fields
/// left unset fall back to the configured defaults, and with neither a
/// flag nor a configured provider the local heuristic is used.
#[derive(ClapArgs)]
pub struct PlanArgs {
    /// Natural language description of the task
    pub description: String,

    /// Limit the number of generated steps
    #[arg(short = 'n', long, value_name = "N")]
    pub max_steps: Option<usize>,

    /// Provider to use (heuristic, ollama, openrouter, huggingface,
    /// gemini, cohere)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Remote model name for the selected provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama model name; implies the Ollama provider when --provider
    /// is omitted
    #[arg(long, value_name = "MODEL")]
    pub ollama_model: Option<String>,

    /// Stream the provider response where supported
    #[arg(long)]
    pub stream: bool,

    /// Ask the model to reason step-by-step before answering
    #[arg(long)]
    pub chain_of_thought: bool,

    /// API key passed directly instead of through the environment
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Name of the environment variable holding the API key
    #[arg(long, value_name = "VAR")]
    pub api_key_env: Option<String>,

    /// Override the provider's endpoint URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Additional provider option as key=value; repeatable
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Print the plan as pretty JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

/// Execute a named playbook
#[derive(ClapArgs)]
pub struct RunArgs {
    /// Name of the playbook as defined in the configuration
    pub name: String,

    /// Print the commands without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Run independent commands concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Worker pool size in parallel mode
    #[arg(long, value_name = "N", requires = "parallel")]
    pub max_workers: Option<usize>,
}

impl From<RunArgs> for RunPlaybook {
    fn from(val: RunArgs) -> Self {
        RunPlaybook {
            name: val.name,
            dry_run: val.dry_run,
            parallel: val.parallel,
            max_workers: val.max_workers,
        }
    }
}

/// Print the Termux quick reference
#[derive(ClapArgs)]
pub struct ReferenceArgs {
    /// Show only the named section (e.g. keyboard, package-management)
    pub section: Option<String>,

    /// Print the reference as JSON
    #[arg(long)]
    pub json: bool,
}
