//! Configuration loading utilities

use crate::schema::Config;
use msgcat_common::{ErrorPolicy, LogFormat, MsgcatError};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "MSGCAT_CONFIG_PATH";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "msgcat.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid {
        /// Dotted config key
        field: String,
        /// Why the value was rejected
        message: String,
    },
}

impl ConfigError {
    /// Create a validation error for `field`
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for MsgcatError {
    fn from(err: ConfigError) -> Self {
        MsgcatError::config_with_source("Configuration loading error", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from the environment and the usual file locations.
    ///
    /// `MSGCAT_CONFIG_PATH` wins, then `msgcat.toml` in the working directory,
    /// then built-in defaults. Environment overrides apply in every case.
    pub fn load() -> Result<Config, ConfigError> {
        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            return Self::load_config(config_path);
        }
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::load_config(DEFAULT_CONFIG_FILE);
        }

        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text without overrides or validation
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply process environment overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides resolved through `lookup`.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("MSGCAT_LOCALE_DIR") {
            config.catalog.locale_dir = PathBuf::from(dir);
        }

        if let Some(policy) = lookup("MSGCAT_ERROR_POLICY") {
            config.catalog.error_policy =
                policy
                    .parse::<ErrorPolicy>()
                    .map_err(|e| ConfigError::EnvParseError {
                        var: "MSGCAT_ERROR_POLICY".to_string(),
                        source: Box::new(e),
                    })?;
        }

        if let Some(extensions) = lookup("MSGCAT_SOURCE_EXTENSIONS") {
            config.catalog.source_extensions = extensions
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(level) = lookup("MSGCAT_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("MSGCAT_LOG_FORMAT") {
            config.logging.format =
                format
                    .parse::<LogFormat>()
                    .map_err(|e| ConfigError::EnvParseError {
                        var: "MSGCAT_LOG_FORMAT".to_string(),
                        source: Box::new(e),
                    })?;
        }

        if let Some(file) = lookup("MSGCAT_LOG_FILE") {
            config.logging.file = Some(PathBuf::from(file));
        }

        Ok(())
    }
}
