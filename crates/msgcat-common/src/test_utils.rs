//! Test utilities and shared test helpers for msgcat.
//!
//! Available to other crates through the `testing` feature.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `dir/name` and return the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Create a temporary directory populated with the given `(filename, contents)` pairs.
pub fn create_locale_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = create_temp_dir();
    for (name, contents) in files {
        write_file(dir.path(), name, contents);
    }
    dir
}

/// Locale file fixtures shared by the catalog tests.
pub mod locale_fixtures {
    /// English messages for the `order` module.
    pub const ORDER_EN_US: &str = r#"
[Order.NotFound]
Description = "Order not found"
Solution = "Check the order id {{.OrderId}} and try again"

[Order.Cancelled]
Description = "Order {{.OrderId}} was cancelled"
"#;

    /// Chinese messages for the `order` module.
    pub const ORDER_ZH_CN: &str = r#"
[Order.NotFound]
Description = "订单不存在"
Solution = "请检查订单号 {{.OrderId}} 后重试"

[Order.Cancelled]
Description = "订单 {{.OrderId}} 已取消"
"#;

    /// English messages for the `common` module.
    pub const COMMON_EN_US: &str = r#"
Greeting = "Hello, {{.Name}}"
Farewell = "Goodbye"
"#;

    /// Chinese messages for the `common` module.
    pub const COMMON_ZH_CN: &str = r#"
Greeting = "你好，{{.Name}}"
Farewell = "再见"
"#;

    /// A consistent two-locale, two-module catalog.
    pub fn consistent_catalog() -> Vec<(&'static str, &'static str)> {
        vec![
            ("order.en-US.toml", ORDER_EN_US),
            ("order.zh-CN.toml", ORDER_ZH_CN),
            ("common.en-US.toml", COMMON_EN_US),
            ("common.zh-CN.toml", COMMON_ZH_CN),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        // Should not panic when called multiple times
        init_test_logging();
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_create_locale_dir() {
        let dir = create_locale_dir(&locale_fixtures::consistent_catalog());

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "common.en-US.toml",
                "common.zh-CN.toml",
                "order.en-US.toml",
                "order.zh-CN.toml"
            ]
        );
    }

    #[test]
    fn test_fixtures_are_valid_toml() {
        for (_, contents) in locale_fixtures::consistent_catalog() {
            let parsed: Result<toml::Value, _> = toml::from_str(contents);
            assert!(parsed.is_ok(), "fixture failed to parse: {contents}");
        }
    }
}
