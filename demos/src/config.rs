//! Application configuration loaded from a TOML file.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use utilkit_log::LogConfig;
use utilkit_undo::UndoConfig;

/// Top-level configuration with one section per crate.
///
/// Every section and field is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UtilConfig {
    pub undo: UndoConfig,
    pub log: LogConfig,
}

/// Errors that can occur while loading a [`UtilConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl UtilConfig {
    /// Loads a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    /// Load a config, falling back to defaults if the file can't be used.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    fn parse(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}
