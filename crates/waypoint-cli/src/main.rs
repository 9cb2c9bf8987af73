//! Waypoint CLI application.
//!
//! Command-line interface for the Waypoint planning assistant.

mod args;
mod cli;
mod confetti;
mod renderer;

use anyhow::Result;
use args::{Cli as Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config,
        no_color,
        command,
    } = Args::parse();

    let config_dir = match config {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(config_dir, renderer);

    info!("Waypoint started");

    match command {
        Init(args) => cli.handle_init(args),
        Plan(args) => cli.handle_plan(args).await,
        Run(args) => cli.handle_run(args.into()).await,
        Show => cli.handle_show(),
        Reference(args) => cli.handle_reference(args),
        Prompts => cli.handle_prompts(),
    }
}
