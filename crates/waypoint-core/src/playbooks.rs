//! Playbook execution.
//!
//! A playbook is an ordered list of shell command strings from the
//! configuration file. Sequential execution stops at the first
//! failure; parallel execution runs independent commands on a bounded
//! worker pool, waits for all of them, and reports the first observed
//! failing exit code. The core only runs commands and reports
//! outcomes; all printing happens in the CLI layer.

use std::sync::Arc;

use log::debug;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{Result, WaypointError};

/// Result of running one playbook command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// The command string as configured
    pub command: String,
    /// Exit code of the shell; -1 when terminated by a signal
    pub exit_code: i32,
}

/// Runs one command through `sh -c` and returns its exit code.
pub async fn run_command(command: &str) -> Result<i32> {
    debug!("running command: {command}");
    let status = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .await
        .map_err(|e| {
            WaypointError::playbook(format!("Failed to spawn shell for '{command}': {e}"))
        })?;
    Ok(status.code().unwrap_or(-1))
}

/// Runs `commands` concurrently on a pool bounded by `max_workers`
/// (unbounded across the command list when `None`).
///
/// Outcomes are reported in completion order, so the first failing
/// entry is the first failure that was observed.
pub async fn run_parallel(
    commands: &[String],
    max_workers: Option<usize>,
) -> Result<Vec<CommandOutcome>> {
    if commands.is_empty() {
        return Ok(Vec::new());
    }

    let permits = max_workers.unwrap_or(commands.len()).max(1);
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut set = JoinSet::new();

    for command in commands {
        let command = command.clone();
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            // Semaphore bounds the pool; permit releases on drop.
            let _permit = semaphore.acquire_owned().await;
            let exit_code = run_command(&command).await?;
            Ok::<CommandOutcome, WaypointError>(CommandOutcome { command, exit_code })
        });
    }

    let mut outcomes = Vec::with_capacity(commands.len());
    while let Some(joined) = set.join_next().await {
        let outcome = joined
            .map_err(|e| WaypointError::playbook(format!("Worker task failed: {e}")))??;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Aggregate status for a set of outcomes: 0 when every command
/// passed, otherwise the first observed failing exit code.
pub fn first_failure(outcomes: &[CommandOutcome]) -> i32 {
    outcomes
        .iter()
        .map(|outcome| outcome.exit_code)
        .find(|code| *code != 0)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_command_reports_exit_codes() {
        assert_eq!(run_command("true").await.unwrap(), 0);
        assert_eq!(run_command("exit 7").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn parallel_runs_every_command() {
        let commands = vec![
            "true".to_string(),
            "exit 3".to_string(),
            "true".to_string(),
        ];
        let outcomes = run_parallel(&commands, Some(2)).await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(first_failure(&outcomes), 3);
    }

    #[tokio::test]
    async fn empty_playbook_passes() {
        let outcomes = run_parallel(&[], None).await.unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(first_failure(&outcomes), 0);
    }

    #[test]
    fn first_failure_prefers_earliest_observation() {
        let outcomes = vec![
            CommandOutcome {
                command: "a".to_string(),
                exit_code: 0,
            },
            CommandOutcome {
                command: "b".to_string(),
                exit_code: 2,
            },
            CommandOutcome {
                command: "c".to_string(),
                exit_code: 5,
            },
        ];
        assert_eq!(first_failure(&outcomes), 2);
    }
}
