//! Configuration schema definitions using serde.

use msgcat_common::{ErrorPolicy, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for msgcat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog configuration.
    pub catalog: CatalogSettings,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Catalog loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory holding `<module>.<locale>.toml` files.
    pub locale_dir: PathBuf,
    /// What to do when loading, validation, or translation fails.
    pub error_policy: ErrorPolicy,
    /// Extensions of two-segment files the loader silently skips.
    pub source_extensions: Vec<String>,
}
