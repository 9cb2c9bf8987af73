//! Core library for the Waypoint planning assistant.
//!
//! This crate turns a plain-language task description into a
//! structured [`models::Plan`]: an ordered list of steps with optional
//! shell commands and an environment reminder tuned for Termux on
//! Android. Plans come from a configured LLM provider when one is
//! available and from a deterministic heuristic otherwise; malformed
//! provider output degrades through parsing tiers instead of failing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use waypoint_core::{PlannerBuilder, params::GeneratePlan};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build()?;
//!
//! let params = GeneratePlan {
//!     description: "install rust and build the project".to_string(),
//!     max_steps: Some(5),
//!     ..Default::default()
//! };
//!
//! let plan = planner.generate_plan(&params).await?;
//! println!("{plan}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod conversation;
pub mod environment;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod playbooks;
pub mod providers;
pub mod reference;

// Re-export commonly used types
pub use config::{AppConfig, LlmConfig, CONFIG_FILE};
pub use conversation::{build_conversation, CHAIN_OF_THOUGHT_PROMPTS, SYSTEM_PROMPT};
pub use environment::{detect_termux, environment_note};
pub use error::{Result, WaypointError};
pub use models::{Message, Plan, PlanStep, Role};
pub use params::{GeneratePlan, RunPlaybook};
pub use planner::{Planner, PlannerBuilder};
pub use playbooks::{first_failure, run_command, run_parallel, CommandOutcome};
pub use providers::{
    ChatClient, ChatReply, HttpTransport, OllamaClient, PlanRequest, Transport,
};
pub use reference::{lookup_section, ReferenceSection, REFERENCE};
