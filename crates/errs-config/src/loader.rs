use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{Config, env::ExpandError};

/// Failure while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A `{{ env.VAR }}` placeholder could not be expanded
    #[error("config variable expansion failed: {0}")]
    Expand(#[from] ExpandError),

    /// The expanded text is not valid TOML for [`Config`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but is inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, expansion or parsing
    /// fails, or validation rejects the result
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion or parsing fails, or validation
    /// rejects the result
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let expanded = crate::env::expand_env(raw)?;
        let config: Self = toml::from_str(&expanded)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the health path is not absolute or the log
    /// filter is blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        let health = &self.server.health;
        if health.enabled && !health.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.health.path must start with '/': `{}`",
                health.path
            )));
        }

        if self.telemetry.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("telemetry.filter must not be empty".to_owned()));
        }

        Ok(())
    }
}
