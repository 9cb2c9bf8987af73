//! Configuration persisted as `.waypoint.json`.
//!
//! A flat record in the working directory: profile name, workspace
//! path, named playbooks, and LLM provider preferences. The planner
//! never reads this file itself; the CLI layer merges `llm.*` values
//! under explicit flags and hands the core resolved parameters.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaypointError};

/// Name of the configuration file inside its directory.
pub const CONFIG_FILE: &str = ".waypoint.json";

/// Provider preferences used as defaults when CLI flags are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LlmConfig {
    /// Default provider identifier
    #[serde(default)]
    pub provider: Option<String>,

    /// Default remote model name
    #[serde(default)]
    pub model: Option<String>,

    /// Override for the provider's endpoint URL
    #[serde(default)]
    pub api_base: Option<String>,

    /// Name of the environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Additional provider-specific options
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Persisted settings for Waypoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the file backing this instance (not serialized)
    #[serde(skip)]
    pub path: PathBuf,

    /// Active profile name for display purposes
    pub profile: String,

    /// Directory used for per-project workspaces
    pub workspace: PathBuf,

    /// Mapping of playbook names to ordered shell commands
    #[serde(default)]
    pub playbooks: BTreeMap<String, Vec<String>>,

    /// Provider preferences
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Loads the configuration from `directory`.
    ///
    /// A missing file is a configuration error directing the user to
    /// `wp init`.
    pub fn load(directory: &Path) -> Result<AppConfig> {
        let config_path = directory.join(CONFIG_FILE);
        if !config_path.exists() {
            return Err(WaypointError::configuration(format!(
                "No {CONFIG_FILE} configuration found in {}. Run `wp init` first.",
                directory.display()
            )));
        }
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| WaypointError::file_system(&config_path, e))?;
        let mut config: AppConfig = serde_json::from_str(&raw)?;
        config.path = config_path;
        Ok(config)
    }

    /// Creates the default configuration in `directory` and the
    /// workspace directory next to it.
    ///
    /// Refuses to replace an existing file unless `overwrite` is set.
    pub fn initialize(directory: &Path, overwrite: bool) -> Result<AppConfig> {
        let config_path = directory.join(CONFIG_FILE);
        if config_path.exists() && !overwrite {
            return Err(WaypointError::configuration(format!(
                "{CONFIG_FILE} already exists. Use --overwrite to replace it."
            )));
        }

        let defaults = AppConfig::default_for(&config_path);
        defaults.save()?;

        let workspace_dir = directory.join(&defaults.workspace);
        std::fs::create_dir_all(&workspace_dir)
            .map_err(|e| WaypointError::file_system(&workspace_dir, e))?;

        Self::load(directory)
    }

    /// Persists the configuration to its backing file.
    pub fn save(&self) -> Result<()> {
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.path, body).map_err(|e| WaypointError::file_system(&self.path, e))
    }

    fn default_for(config_path: &Path) -> AppConfig {
        let mut playbooks = BTreeMap::new();
        playbooks.insert(
            "bootstrap-termux".to_string(),
            vec![
                "pkg update -y".to_string(),
                "pkg install -y git python".to_string(),
            ],
        );
        playbooks.insert("run-tests".to_string(), vec!["cargo test".to_string()]);

        AppConfig {
            path: config_path.to_path_buf(),
            profile: "default".to_string(),
            workspace: PathBuf::from("workspace"),
            playbooks,
            llm: LlmConfig::default(),
        }
    }
}
