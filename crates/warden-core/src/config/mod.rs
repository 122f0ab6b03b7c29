//! Configuration types for the Warden policy enforcer.
//!
//! All runtime settings live in a single `WardenConfig` structure loaded
//! from a YAML file at startup and injected into the components that need
//! them. Business logic never reads the process environment; the entry
//! point resolves environment overrides (config path, project id) before
//! construction.

pub mod api;
pub mod policies;
pub mod server;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use api::ApiConfig;
pub use policies::PoliciesConfig;
pub use server::ServerConfig;

/// Complete Warden configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Google Cloud project whose Dialogflow resources are enforced.
    ///
    /// Optional in the file; the entry point may fill it from the ambient
    /// execution context before wiring the enforcer.
    #[serde(default)]
    pub project: Option<String>,

    /// Dialogflow API client settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Policy toggles controlling the active rule set.
    #[serde(default)]
    pub policies: PoliciesConfig,

    /// Push endpoint server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl WardenConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}
