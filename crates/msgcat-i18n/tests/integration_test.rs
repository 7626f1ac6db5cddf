//! Integration tests for msgcat-i18n.
//!
//! These load real locale directories and exercise the loader, validator and
//! translator together.

use msgcat_common::test_utils::{create_locale_dir, init_test_logging, locale_fixtures};
use msgcat_common::{ErrorPolicy, MsgcatError};
use msgcat_i18n::{template_data, Catalog, CompileState, I18nError, LoaderOptions};
use pretty_assertions::assert_eq;

fn register(files: &[(&str, &str)]) -> Result<Catalog, I18nError> {
    init_test_logging();
    let dir = create_locale_dir(files);
    Catalog::register(dir.path(), ErrorPolicy::Propagate)
}

#[test]
fn test_register_consistent_catalog() {
    let catalog = register(&locale_fixtures::consistent_catalog()).unwrap();

    let locales: Vec<&str> = catalog.locales().map(|l| l.as_str()).collect();
    assert_eq!(locales, vec!["en-US", "zh-CN"]);
    assert_eq!(catalog.len(), 10);

    let ids: Vec<&str> = catalog.message_ids("zh-CN").unwrap().collect();
    assert_eq!(
        ids,
        vec![
            "Farewell",
            "Greeting",
            "Order.Cancelled.Description",
            "Order.NotFound.Description",
            "Order.NotFound.Solution",
        ]
    );
}

#[test]
fn test_translate_across_locales() {
    let catalog = register(&locale_fixtures::consistent_catalog()).unwrap();
    let data = template_data! { "Name" => "Ana", "OrderId" => 42 };

    assert_eq!(
        catalog.translate("en-US", "Greeting", Some(&data)).unwrap(),
        "Hello, Ana"
    );
    assert_eq!(
        catalog.translate("zh-CN", "Greeting", Some(&data)).unwrap(),
        "你好，Ana"
    );
    assert_eq!(
        catalog
            .translate("en-US", "Order.Cancelled.Description", Some(&data))
            .unwrap(),
        "Order 42 was cancelled"
    );
    assert_eq!(
        catalog
            .translate("zh-CN", "Order.NotFound.Description", None)
            .unwrap(),
        "订单不存在"
    );
}

#[test]
fn test_literal_messages_are_never_compiled() {
    let catalog = register(&locale_fixtures::consistent_catalog()).unwrap();
    let data = template_data! { "Name" => "ignored" };

    assert_eq!(
        catalog.translate("en-US", "Farewell", Some(&data)).unwrap(),
        "Goodbye"
    );

    let message = catalog.message("en-US", "Farewell").unwrap();
    assert_eq!(message.compile_state(), CompileState::Uncompiled);
    assert_eq!(message.compile_attempts(), 0);
}

#[test]
fn test_missing_key_renders_empty() {
    let catalog = register(&[
        ("hi.en-US.toml", "Hi = \"Hi {{.Missing}}\""),
        ("hi.zh-CN.toml", "Hi = \"嗨 {{.Missing}}\""),
    ])
    .unwrap();

    let empty = template_data! {};
    assert_eq!(catalog.translate("en-US", "Hi", Some(&empty)).unwrap(), "Hi ");
    assert_eq!(catalog.translate("en-US", "Hi", None).unwrap(), "Hi ");
}

#[test]
fn test_source_files_and_directories_are_skipped() {
    init_test_logging();
    let dir = create_locale_dir(&[
        ("i18n.go", "package i18n"),
        ("mod.rs", "pub mod i18n;"),
        ("common.en-US.toml", locale_fixtures::COMMON_EN_US),
    ]);
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let catalog = Catalog::register(dir.path(), ErrorPolicy::Propagate).unwrap();
    assert_eq!(catalog.len(), 2);
}

#[test]
fn test_custom_source_extensions() {
    init_test_logging();
    let dir = create_locale_dir(&[
        ("gen.py", "print('hi')"),
        ("common.en-US.toml", locale_fixtures::COMMON_EN_US),
    ]);

    let options = LoaderOptions::default().with_source_extensions(["py"]);
    let catalog = Catalog::register_with(dir.path(), options, ErrorPolicy::Propagate).unwrap();
    assert_eq!(catalog.len(), 2);

    let err = Catalog::register(dir.path(), ErrorPolicy::Propagate).unwrap_err();
    assert!(matches!(err, I18nError::InvalidFileName { ref file_name } if file_name == "gen.py"));
}

#[test]
fn test_invalid_file_name() {
    let err = register(&[("README.md", "# locales")]).unwrap_err();
    assert!(matches!(err, I18nError::InvalidFileName { .. }));
}

#[test]
fn test_invalid_locale_tag() {
    let err = register(&[("order.xx_!!.toml", "A = \"a\"")]).unwrap_err();
    assert!(matches!(err, I18nError::InvalidLocale { ref tag, .. } if tag == "xx_!!"));
}

#[test]
fn test_duplicate_across_files_reports_both_sides() {
    let err = register(&[
        ("a.en-US.toml", "[Shared]\nKey = \"from a\""),
        ("b.en-US.toml", "[Shared]\nKey = \"from b\""),
    ])
    .unwrap_err();

    match err {
        I18nError::DuplicateMessage {
            locale,
            message_id,
            existing,
            existing_origin,
            conflicting,
            conflicting_origin,
        } => {
            assert_eq!(locale, "en-US");
            assert_eq!(message_id, "Shared.Key");
            assert_eq!(existing, "from a");
            assert_eq!(existing_origin, "a.en-US.toml");
            assert_eq!(conflicting, "from b");
            assert_eq!(conflicting_origin, "b.en-US.toml");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_value_names_path_and_type() {
    let err = register(&[("a.en-US.toml", "[Limits]\nMax = 10")]).unwrap_err();

    assert_eq!(
        err.to_string(),
        "unsupported data format integer for message Limits.Max in locale en-US"
    );
}

#[test]
fn test_inconsistent_locales_blame_missing_id() {
    let err = register(&[
        ("a.en-US.toml", "[A]\nB = \"b\"\nC = \"c\""),
        ("a.zh-CN.toml", "[A]\nC = \"c\""),
    ])
    .unwrap_err();

    assert_eq!(err.locale(), Some("zh-CN"));
    assert_eq!(err.message_id(), Some("A.B"));
    assert!(err.to_string().contains("en-US"));
}

#[test]
fn test_locale_tags_are_canonicalized() {
    let catalog = register(&[
        ("a.en-us.toml", "A = \"a\""),
        ("b.en-US.toml", "B = \"b\""),
    ])
    .unwrap();

    let locales: Vec<&str> = catalog.locales().map(|l| l.as_str()).collect();
    assert_eq!(locales, vec!["en-US"]);
    assert_eq!(catalog.translate("en-us", "B", None).unwrap(), "b");
}

#[test]
fn test_empty_directory_is_valid() {
    let catalog = register(&[]).unwrap();
    assert!(catalog.is_empty());
    assert!(matches!(
        catalog.translate("en-US", "A", None),
        Err(I18nError::UnknownLocale { .. })
    ));
}

#[test]
fn test_missing_directory() {
    init_test_logging();
    let err = Catalog::register("/nonexistent/msgcat/locales", ErrorPolicy::Propagate)
        .unwrap_err();
    assert!(matches!(err, I18nError::ReadDir { .. }));
}

#[test]
fn test_compile_failure_is_reported_with_raw_text() {
    let catalog = register(&[("a.en-US.toml", "Bad = \"Hello {{.Name\"")]).unwrap();

    for _ in 0..2 {
        match catalog.translate("en-US", "Bad", None).unwrap_err() {
            I18nError::Compile { raw, message_id, .. } => {
                assert_eq!(raw, "Hello {{.Name");
                assert_eq!(message_id, "Bad");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(catalog.message("en-US", "Bad").unwrap().compile_attempts(), 1);
}

#[test]
fn test_i18n_error_converts_to_msgcat_error() {
    let err = register(&[
        ("a.en-US.toml", "A = \"a\""),
        ("a.fr-FR.toml", "A = \"a\"\nB = \"b\""),
    ])
    .unwrap_err();

    let app_err: MsgcatError = err.into();
    assert_eq!(app_err.locale(), Some("fr-FR"));
    assert!(app_err.to_string().contains("unexpected message B"));
}
