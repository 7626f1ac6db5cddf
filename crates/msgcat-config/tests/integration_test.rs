//! Integration tests for msgcat-config crate.

use msgcat_common::test_utils::{create_temp_dir, write_file};
use msgcat_common::{ErrorPolicy, LogFormat};
use msgcat_config::{Config, ConfigError, ConfigLoader, DEFAULT_LOCALE_DIR};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.catalog.locale_dir, PathBuf::from(DEFAULT_LOCALE_DIR));
    assert_eq!(config.catalog.error_policy, ErrorPolicy::Propagate);

    config.catalog.locale_dir = PathBuf::new();
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::Invalid { ref field, .. } if field == "catalog.locale_dir"
    ));
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = create_temp_dir();
    let path = write_file(
        dir.path(),
        "msgcat.toml",
        "[logging]\nformat = \"compact\"\n",
    );

    let config = ConfigLoader::parse(&std::fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(config.logging.format, LogFormat::Compact);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.catalog, Config::default().catalog);
}

#[test]
fn test_rejects_skipping_locale_extension() {
    let config = ConfigLoader::parse("[catalog]\nsource_extensions = [\"toml\"]\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_roundtrips_through_toml() {
    let mut config = Config::default();
    config.catalog.error_policy = ErrorPolicy::Terminate;
    config.logging.format = LogFormat::Json;

    let text = toml::to_string(&config).unwrap();
    let parsed = ConfigLoader::parse(&text).unwrap();

    assert_eq!(parsed, config);
}
