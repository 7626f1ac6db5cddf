//! Application-wide error type for msgcat

use thiserror::Error;

/// Result type alias for msgcat operations
pub type Result<T> = std::result::Result<T, MsgcatError>;

/// Top-level error shared by the msgcat crates
#[derive(Error, Debug)]
pub enum MsgcatError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Catalog loading, validation, or rendering errors
    #[error("Localization error: {message}")]
    Localization {
        /// What went wrong
        message: String,
        /// Locale involved, if known
        locale: Option<String>,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Logging setup errors
    #[error("Logging error: {message}")]
    Logging {
        /// What went wrong
        message: String,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// What went wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MsgcatError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error
    pub fn localization(msg: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: None,
            source: None,
        }
    }

    /// Create a new localization error tied to a locale
    pub fn localization_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: Some(locale.into()),
            source: None,
        }
    }

    /// Create a new localization error with source
    pub fn localization_with_source(
        msg: impl Into<String>,
        locale: Option<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Localization {
            message: msg.into(),
            locale,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging {
            message: msg.into(),
        }
    }

    /// Locale associated with the error, if any
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Localization { locale, .. } => locale.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = MsgcatError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = MsgcatError::config("config issue");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("config issue"));

        let localization_error =
            MsgcatError::localization_with_locale("Translation missing", "en-US");
        assert!(localization_error.to_string().contains("Localization error"));
        assert!(localization_error.to_string().contains("Translation missing"));
        assert_eq!(localization_error.locale(), Some("en-US"));

        let logging_error = MsgcatError::logging("subscriber already set");
        assert_eq!(
            logging_error.to_string(),
            "Logging error: subscriber already set"
        );
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = MsgcatError::with_source("Failed to read file", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read file"));
        assert!(wrapped_error.source().is_some());

        let config_source_error = MsgcatError::config_with_source(
            "Config loading failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );
        assert!(config_source_error.source().is_some());
        assert!(config_source_error.locale().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let msgcat_error: MsgcatError = io_error.into();

        assert!(msgcat_error.to_string().contains("I/O error"));
        assert!(msgcat_error.source().is_some());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = MsgcatError::localization_with_source(
            "Middle layer",
            Some("zh-CN".to_string()),
            root_error,
        );
        let top_error = MsgcatError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut error_count = 0;

        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert_eq!(error_count, 2);
        assert_eq!(current_error.to_string(), "Root cause");
    }
}
