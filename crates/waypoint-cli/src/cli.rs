//! Command handlers bridging parsed arguments and the core library.
//!
//! Each handler converts its clap Args struct into core parameters,
//! merging configuration-file defaults under explicit flags, then
//! calls into waypoint-core and renders the result. Business logic
//! stays in the core crate; this layer owns I/O and presentation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;
use waypoint_core::params::{GeneratePlan, RunPlaybook};
use waypoint_core::{
    detect_termux, environment_note, lookup_section, playbooks, AppConfig, LlmConfig, Plan,
    PlannerBuilder, WaypointError, CHAIN_OF_THOUGHT_PROMPTS, REFERENCE,
};

use crate::args::{InitArgs, PlanArgs, ReferenceArgs};
use crate::confetti;
use crate::renderer::TerminalRenderer;

/// CLI command handler holding the configuration directory and the
/// output renderer.
pub struct Cli {
    config_dir: PathBuf,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(config_dir: PathBuf, renderer: TerminalRenderer) -> Self {
        Self {
            config_dir,
            renderer,
        }
    }

    /// Creates the default configuration file and workspace directory.
    pub fn handle_init(&self, args: InitArgs) -> Result<()> {
        let config = AppConfig::initialize(&self.config_dir, args.overwrite)
            .context("Failed to initialize configuration")?;
        info!("initialized configuration at {}", config.path.display());

        println!("Created {}", config.path.display());
        println!(
            "Workspace directory: {}",
            self.config_dir.join(&config.workspace).display()
        );
        println!(
            "Playbooks: {}",
            config.playbooks.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        confetti::celebrate("Waypoint is ready.", self.renderer.rich_enabled());
        Ok(())
    }

    /// Generates a plan from the task description.
    pub async fn handle_plan(&self, args: PlanArgs) -> Result<()> {
        let defaults = self.llm_defaults()?;
        let json_output = args.json;
        let params = merge_plan_params(args, &defaults)?;

        let planner = PlannerBuilder::new()
            .build()
            .context("Failed to initialize planner")?;
        let plan = planner.generate_plan(&params).await?;

        if json_output {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            return Ok(());
        }

        if plan.is_empty() {
            bail!("No plan could be generated from an empty description.");
        }
        self.render_plan(&plan)
    }

    /// Executes a named playbook from the configuration.
    pub async fn handle_run(&self, params: RunPlaybook) -> Result<()> {
        let config = AppConfig::load(&self.config_dir)?;
        let Some(commands) = config.playbooks.get(&params.name) else {
            let available = config.playbooks.keys().cloned().collect::<Vec<_>>();
            bail!(
                "Unknown playbook '{}'. Available: {}",
                params.name,
                available.join(", ")
            );
        };

        if params.dry_run {
            println!("Playbook '{}' ({} commands):", params.name, commands.len());
            for command in commands {
                println!("  $ {command}");
            }
            return Ok(());
        }

        if params.parallel {
            let outcomes = playbooks::run_parallel(commands, params.max_workers).await?;
            for outcome in &outcomes {
                println!("[parallel] {} -> exit {}", outcome.command, outcome.exit_code);
            }
            let failure = playbooks::first_failure(&outcomes);
            if failure != 0 {
                bail!("Playbook '{}' failed with exit code {failure}", params.name);
            }
        } else {
            for command in commands {
                println!("$ {command}");
                let code = playbooks::run_command(command).await?;
                if code != 0 {
                    bail!("Playbook '{}' failed with exit code {code}", params.name);
                }
            }
        }

        confetti::celebrate(
            &format!("Playbook '{}' completed.", params.name),
            self.renderer.rich_enabled(),
        );
        Ok(())
    }

    /// Prints the active configuration and detected environment.
    pub fn handle_show(&self) -> Result<()> {
        let config = AppConfig::load(&self.config_dir)?;
        let termux = detect_termux();

        println!("Profile: {}", config.profile);
        println!("Config file: {}", config.path.display());
        println!(
            "Workspace: {}",
            self.config_dir.join(&config.workspace).display()
        );
        println!(
            "Provider: {}",
            config.llm.provider.as_deref().unwrap_or("heuristic")
        );
        if let Some(model) = &config.llm.model {
            println!("Model: {model}");
        }
        println!(
            "Playbooks: {}",
            config.playbooks.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        println!("{}", environment_note(termux));
        Ok(())
    }

    /// Prints the Termux quick reference, whole or one section.
    pub fn handle_reference(&self, args: ReferenceArgs) -> Result<()> {
        if let Some(name) = &args.section {
            let Some(section) = lookup_section(name) else {
                let names: Vec<&str> = REFERENCE.iter().map(|s| s.name).collect();
                bail!(
                    "Unknown reference section '{name}'. Available: {}",
                    names.join(", ")
                );
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(section)?);
            } else {
                self.render_section(section)?;
            }
            return Ok(());
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(REFERENCE)?);
        } else {
            for section in REFERENCE {
                self.render_section(section)?;
            }
        }
        Ok(())
    }

    /// Lists the reusable chain-of-thought prompt fragments.
    pub fn handle_prompts(&self) -> Result<()> {
        self.renderer.render_line("**Chain-of-thought prompts**")?;
        for (index, prompt) in CHAIN_OF_THOUGHT_PROMPTS.iter().enumerate() {
            println!("{:>2}. {prompt}", index + 1);
        }
        Ok(())
    }

    fn render_plan(&self, plan: &Plan) -> Result<()> {
        if !plan.summary.is_empty() {
            self.renderer.render_line(&format!("**Plan:** {}", plan.summary))?;
        }
        for line in plan.formatted_output() {
            println!("{line}");
        }
        Ok(())
    }

    fn render_section(&self, section: &waypoint_core::ReferenceSection) -> Result<()> {
        self.renderer.render_line(&format!("**{}**", section.title))?;
        for entry in section.entries {
            println!(" - {}: {}", entry.topic, entry.detail);
        }
        println!();
        Ok(())
    }

    /// Loads configured LLM defaults; a missing configuration file
    /// means plain defaults, any other load failure propagates.
    fn llm_defaults(&self) -> Result<LlmConfig> {
        match AppConfig::load(&self.config_dir) {
            Ok(config) => Ok(config.llm),
            Err(WaypointError::Configuration { .. }) => Ok(LlmConfig::default()),
            Err(other) => Err(other.into()),
        }
    }
}

/// Merges configuration defaults under explicit flags and produces
/// core planning parameters. Flags always win; `--option key=value`
/// pairs overlay the configured option map.
fn merge_plan_params(args: PlanArgs, defaults: &LlmConfig) -> Result<GeneratePlan> {
    let mut options: BTreeMap<String, String> = defaults.options.clone();
    if let Some(api_base) = &defaults.api_base {
        options.insert("api_base".to_string(), api_base.clone());
    }
    if let Some(api_key_env) = &defaults.api_key_env {
        options.insert("api_key_env".to_string(), api_key_env.clone());
    }

    for pair in &args.options {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Malformed --option '{pair}': expected key=value");
        };
        options.insert(key.trim().to_string(), value.trim().to_string());
    }

    if let Some(api_key) = args.api_key {
        options.insert("api_key".to_string(), api_key);
    }
    if let Some(api_key_env) = args.api_key_env {
        options.insert("api_key_env".to_string(), api_key_env);
    }
    if let Some(api_base) = args.api_base {
        options.insert("api_base".to_string(), api_base);
    }

    Ok(GeneratePlan {
        description: args.description,
        max_steps: args.max_steps,
        provider: args.provider.or_else(|| defaults.provider.clone()),
        model: args.model.or_else(|| defaults.model.clone()),
        ollama_model: args.ollama_model,
        stream: args.stream,
        chain_of_thought: args.chain_of_thought,
        options,
    })
}
