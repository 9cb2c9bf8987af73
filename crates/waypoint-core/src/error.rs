//! Error types for the waypoint library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all waypoint operations.
#[derive(Error, Debug)]
pub enum WaypointError {
    /// Configuration errors: missing model or API key, malformed
    /// `key=value` options, missing configuration file, unknown
    /// playbook. Always detected before any transport call.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// A provider could not be reached or returned an unusable reply.
    /// Carries a human-readable cause; requests are never retried.
    #[error("Provider unavailable: {message}")]
    ProviderUnavailable { message: String },
    /// Playbook execution errors (e.g. the shell could not be
    /// spawned). An unknown playbook name is a configuration error,
    /// not this.
    #[error("Playbook error: {message}")]
    Playbook { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl WaypointError {
    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        WaypointError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a provider-unavailable error from a cause.
    pub fn provider(message: impl Into<String>) -> Self {
        WaypointError::ProviderUnavailable {
            message: message.into(),
        }
    }

    /// Creates a playbook execution error from a message.
    pub fn playbook(message: impl Into<String>) -> Self {
        WaypointError::Playbook {
            message: message.into(),
        }
    }

    /// Creates a file system error for a path.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WaypointError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for waypoint operations
pub type Result<T> = std::result::Result<T, WaypointError>;
