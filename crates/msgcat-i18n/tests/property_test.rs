//! Property tests for flattening, validation and literal rendering

use msgcat_i18n::{
    Catalog, CatalogLoader, CatalogValidator, I18nError, LoaderOptions, TemplateData, Value,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn load(documents: &[(&str, toml::Table)]) -> Result<Catalog, I18nError> {
    let mut loader = CatalogLoader::new(LoaderOptions::default());
    for (locale, table) in documents {
        let source = toml::to_string(table).expect("table should serialize");
        loader.load_str("prop", locale, &source)?;
    }
    Ok(loader.into_catalog())
}

fn flat_table(ids: &BTreeSet<String>) -> toml::Table {
    ids.iter()
        .map(|id| (id.clone(), toml::Value::String(format!("text for {id}"))))
        .collect()
}

proptest! {
    #[test]
    fn literal_text_is_returned_verbatim(
        text in "\\PC{1,40}".prop_filter("no actions", |s| !s.contains("{{")),
        name in "[a-z]{0,10}",
    ) {
        let mut table = toml::Table::new();
        table.insert("Msg".to_string(), toml::Value::String(text.clone()));
        let catalog = load(&[("en-US", table)]).unwrap();

        let mut data = TemplateData::new();
        data.insert("Msg".to_string(), Value::from(name));

        prop_assert_eq!(catalog.translate("en-US", "Msg", Some(&data)).unwrap(), text.clone());
        prop_assert_eq!(catalog.translate("en-US", "Msg", None).unwrap(), text);
    }

    #[test]
    fn nested_tables_flatten_to_dot_paths(
        groups in prop::collection::btree_map(
            "[A-Z][a-z]{0,6}",
            prop::collection::btree_map("[A-Z][a-z]{0,6}", "[a-zA-Z ]{1,20}", 0..4),
            1..5,
        ),
    ) {
        let mut table = toml::Table::new();
        let mut expected = BTreeMap::new();
        for (group, entries) in &groups {
            let mut nested = toml::Table::new();
            for (key, text) in entries {
                nested.insert(key.clone(), toml::Value::String(text.clone()));
                expected.insert(format!("{group}.{key}"), text.clone());
            }
            table.insert(group.clone(), toml::Value::Table(nested));
        }

        let catalog = load(&[("en-US", table)]).unwrap();
        let ids: Vec<String> = catalog
            .message_ids("en-US")
            .map(|ids| ids.map(ToString::to_string).collect())
            .unwrap_or_default();

        prop_assert_eq!(ids, expected.keys().cloned().collect::<Vec<_>>());
        for (id, text) in &expected {
            prop_assert_eq!(&catalog.translate("en-US", id, None).unwrap(), text);
        }
    }

    #[test]
    fn identical_id_sets_validate(
        ids in prop::collection::btree_set("[a-z]{1,6}(\\.[a-z]{1,6}){0,2}", 1..12),
    ) {
        let catalog = load(&[
            ("en-US", flat_table(&ids)),
            ("zh-CN", flat_table(&ids)),
            ("fr-FR", flat_table(&ids)),
        ]).unwrap();

        prop_assert!(CatalogValidator::validate(&catalog).is_ok());
    }

    #[test]
    fn dropped_id_is_blamed_on_the_other_locale(
        ids in prop::collection::btree_set("[a-z]{1,6}(\\.[a-z]{1,6}){0,2}", 2..12),
        index in any::<prop::sample::Index>(),
    ) {
        let dropped = index.get(&ids.iter().collect::<Vec<_>>()).to_string();
        let mut fewer = ids.clone();
        fewer.remove(&dropped);

        let catalog = load(&[
            ("en-US", flat_table(&ids)),
            ("zh-CN", flat_table(&fewer)),
        ]).unwrap();

        match CatalogValidator::validate(&catalog) {
            Err(I18nError::MissingMessage { locale, message_id, reference }) => {
                prop_assert_eq!(locale, "zh-CN");
                prop_assert_eq!(message_id, dropped);
                prop_assert_eq!(reference, "en-US");
            }
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }
}
