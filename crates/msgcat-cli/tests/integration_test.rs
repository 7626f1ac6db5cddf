//! Integration tests for the msgcat binary.
//!
//! These run the compiled binary against temporary locale directories.

use msgcat_common::test_utils::{create_locale_dir, create_temp_dir, locale_fixtures, write_file};
use msgcat_common::FATAL_EXIT_CODE;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::{Command, Output};

const ENV_VARS: [&str; 7] = [
    "MSGCAT_CONFIG_PATH",
    "MSGCAT_LOCALE_DIR",
    "MSGCAT_ERROR_POLICY",
    "MSGCAT_SOURCE_EXTENSIONS",
    "MSGCAT_LOG_LEVEL",
    "MSGCAT_LOG_FORMAT",
    "MSGCAT_LOG_FILE",
];

fn msgcat(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_msgcat"));
    command.current_dir(cwd).args(args);
    for var in ENV_VARS {
        command.env_remove(var);
    }
    command.env("MSGCAT_LOG_FORMAT", "json");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("failed to run msgcat")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn inconsistent_dir() -> tempfile::TempDir {
    create_locale_dir(&[
        ("a.en-US.toml", "[A]\nB = \"b\"\nC = \"c\""),
        ("a.zh-CN.toml", "[A]\nC = \"c\""),
    ])
}

#[test]
fn test_check_consistent_directory() {
    let dir = create_locale_dir(&locale_fixtures::consistent_catalog());
    let dir_arg = dir.path().to_string_lossy().into_owned();

    let output = msgcat(dir.path(), &["check", "--dir", &dir_arg], &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "OK: 2 locale(s) [en-US, zh-CN], 5 message(s) each, 10 total\n"
    );
}

#[test]
fn test_translate_prints_rendered_message() {
    let dir = create_locale_dir(&locale_fixtures::consistent_catalog());
    let dir_arg = dir.path().to_string_lossy().into_owned();

    let output = msgcat(
        dir.path(),
        &[
            "translate",
            "--dir",
            &dir_arg,
            "--locale",
            "en-US",
            "--id",
            "Greeting",
            "--data",
            r#"{"Name": "Ana"}"#,
        ],
        &[],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "Hello, Ana\n");
}

#[test]
fn test_locale_dir_from_config_file() {
    let locales = create_locale_dir(&locale_fixtures::consistent_catalog());
    let cwd = create_temp_dir();
    write_file(
        cwd.path(),
        "msgcat.toml",
        &format!(
            "[catalog]\nlocale_dir = '{}'\n\n[logging]\nlevel = \"warn\"\n",
            locales.path().display()
        ),
    );

    let output = msgcat(cwd.path(), &["check"], &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("OK: 2 locale(s)"));
}

#[test]
fn test_locale_dir_from_environment() {
    let locales = create_locale_dir(&locale_fixtures::consistent_catalog());
    let cwd = create_temp_dir();
    let dir = locales.path().to_string_lossy().into_owned();

    let output = msgcat(
        cwd.path(),
        &["translate", "-l", "zh-CN", "-i", "Farewell"],
        &[("MSGCAT_LOCALE_DIR", dir.as_str())],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "再见\n");
}

#[test]
fn test_inconsistent_directory_propagates_error() {
    let dir = inconsistent_dir();
    let dir_arg = dir.path().to_string_lossy().into_owned();

    let output = msgcat(dir.path(), &["check", "--dir", &dir_arg], &[]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("locale directory failed validation"), "stderr: {err}");
    assert!(err.contains("missing message A.B"), "stderr: {err}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_terminate_policy_exits_with_fatal_code() {
    let dir = inconsistent_dir();
    let dir_arg = dir.path().to_string_lossy().into_owned();

    let output = msgcat(
        dir.path(),
        &["check", "--dir", &dir_arg],
        &[("MSGCAT_ERROR_POLICY", "terminate")],
    );

    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    let err = stderr(&output);
    assert!(err.contains("fatal error, terminating"), "stderr: {err}");
    assert!(!err.contains("locale directory failed validation"), "stderr: {err}");
}

#[test]
fn test_terminate_policy_on_unknown_message() {
    let dir = create_locale_dir(&locale_fixtures::consistent_catalog());
    let dir_arg = dir.path().to_string_lossy().into_owned();

    let output = msgcat(
        dir.path(),
        &["translate", "--dir", &dir_arg, "-l", "en-US", "-i", "Nope"],
        &[("MSGCAT_ERROR_POLICY", "terminate")],
    );

    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_invalid_data_is_rejected() {
    let dir = create_locale_dir(&locale_fixtures::consistent_catalog());
    let dir_arg = dir.path().to_string_lossy().into_owned();

    let output = msgcat(
        dir.path(),
        &[
            "translate", "--dir", &dir_arg, "-l", "en-US", "-i", "Greeting", "--data", "[1]",
        ],
        &[],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("must be a JSON object"));
}
