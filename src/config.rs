//! Tool configuration.
//!
//! A single optional TOML file in the per-user config directory provides
//! defaults (currently just the `[logging]` block); CLI flags override
//! whatever is loaded.

use crate::error::DiffError;
use crate::logging::LoggingConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Path of the per-user config file, when a home directory can be
/// determined.
pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "drivediff").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Loads configuration from the per-user file or an explicit path.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the per-user config file, or defaults when it is absent.
    pub fn load() -> Result<ToolConfig, DiffError> {
        match config_file_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => Ok(ToolConfig::default()),
        }
    }

    /// Load configuration from an explicit file path.
    pub fn load_from_file(path: &Path) -> Result<ToolConfig, DiffError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DiffError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| DiffError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}
