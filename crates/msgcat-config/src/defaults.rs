//! Default values for the configuration schema.

use crate::schema::{CatalogSettings, Config};
use msgcat_common::{ErrorPolicy, LoggingConfig};
use std::path::PathBuf;

/// Directory scanned when no locale directory is configured.
pub const DEFAULT_LOCALE_DIR: &str = "locales";

/// Source extensions skipped by default.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["rs", "go"];

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            locale_dir: PathBuf::from(DEFAULT_LOCALE_DIR),
            error_policy: ErrorPolicy::Propagate,
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }
}
