//! Runtime validation of loaded configuration.

use crate::loader::ConfigError;
use crate::schema::Config;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        validate_locale_dir(&config.catalog.locale_dir.to_string_lossy())?;
        validate_source_extensions(&config.catalog.source_extensions)?;
        validate_log_level(&config.logging.level)?;
        Ok(())
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigValidator::validate(self)
    }
}

/// Validate the locale directory path (basic check for usable path characters)
pub fn validate_locale_dir(path: &str) -> Result<(), ConfigError> {
    if path.trim().is_empty() {
        return Err(ConfigError::invalid("catalog.locale_dir", "must not be empty"));
    }

    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ConfigError::invalid(
            "catalog.locale_dir",
            format!("'{path}' contains invalid path characters"),
        ));
    }

    Ok(())
}

/// Validate the skipped source extensions.
///
/// Each must be a bare extension, and `toml` can never be skipped since it is
/// the locale file format itself.
pub fn validate_source_extensions(extensions: &[String]) -> Result<(), ConfigError> {
    for ext in extensions {
        if ext.is_empty() || ext.contains('.') {
            return Err(ConfigError::invalid(
                "catalog.source_extensions",
                format!("'{ext}' is not a bare file extension"),
            ));
        }
        if ext.eq_ignore_ascii_case("toml") {
            return Err(ConfigError::invalid(
                "catalog.source_extensions",
                "'toml' is the locale file format and cannot be skipped",
            ));
        }
    }
    Ok(())
}

/// Validate the log filter directive is present.
pub fn validate_log_level(level: &str) -> Result<(), ConfigError> {
    if level.trim().is_empty() {
        return Err(ConfigError::invalid("logging.level", "must not be empty"));
    }
    Ok(())
}
