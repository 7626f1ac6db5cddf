//! Integration tests for msgcat-common crate.

use msgcat_common::{LogFormat, LoggingConfig, MsgcatError};

#[test]
fn test_logging_config_from_toml() {
    let config: LoggingConfig = toml::from_str(
        r#"
level = "msgcat_i18n=debug,info"
format = "compact"
file = "/tmp/msgcat.log"
include_targets = false
"#,
    )
    .unwrap();

    assert_eq!(config.level, "msgcat_i18n=debug,info");
    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.file.as_deref().unwrap().to_str(), Some("/tmp/msgcat.log"));
    assert!(!config.include_targets);
    assert!(!config.include_spans);
}

#[test]
fn test_unknown_log_format_is_rejected() {
    let result: Result<LoggingConfig, _> = toml::from_str("format = \"xml\"");
    assert!(result.is_err());
}

#[test]
fn test_error_display_formatting() {
    let error = MsgcatError::new("test error");
    assert_eq!(format!("{error}"), "test error");

    let config_error = MsgcatError::config("missing field");
    assert_eq!(
        format!("{config_error}"),
        "Configuration error: missing field"
    );

    let localization_error = MsgcatError::localization("unknown locale fr-FR");
    assert_eq!(
        format!("{localization_error}"),
        "Localization error: unknown locale fr-FR"
    );
}

#[test]
fn test_serde_json_error_wraps_as_source() {
    let serde_error = serde_json::from_str::<serde_json::Value>("{\"invalid\": json}").unwrap_err();
    let error = MsgcatError::with_source("bad template data", serde_error);

    assert_eq!(error.to_string(), "bad template data");
    assert!(std::error::Error::source(&error).is_some());
}
