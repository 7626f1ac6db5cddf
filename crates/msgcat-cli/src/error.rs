//! Error types for the command line tool.

use msgcat_i18n::I18nError;

/// Command line tool error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Catalog loading, validation, or rendering error.
    #[error(transparent)]
    Catalog(#[from] I18nError),

    /// `--data` is not valid JSON.
    #[error("invalid --data JSON: {0}")]
    Data(#[source] serde_json::Error),

    /// `--data` is valid JSON but not an object.
    #[error("--data must be a JSON object, got {0}")]
    DataNotObject(&'static str),
}

/// Result type for the command line tool.
pub type CliResult<T> = Result<T, CliError>;
