//! The message catalog and its translation entry points.

use crate::error::{I18nError, I18nResult};
use crate::loader::{CatalogLoader, LoaderOptions, LocaleMessages};
use crate::locale::LocaleTag;
use crate::message::{CompileState, Message};
use crate::template::TemplateData;
use crate::validator::CatalogValidator;
use msgcat_common::ErrorPolicy;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Summary counts for a catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Number of locales
    pub locales: usize,
    /// Number of messages across all locales
    pub messages: usize,
    /// Messages whose template compiled
    pub compiled: usize,
    /// Messages whose template failed to compile
    pub failed: usize,
}

/// Localized messages keyed by locale and message id.
///
/// Built once by [`CatalogLoader`] and read-only afterwards, apart from each
/// message's lazily compiled template. Safe to share across threads.
#[derive(Debug)]
pub struct Catalog {
    locales: BTreeMap<LocaleTag, LocaleMessages>,
    policy: ErrorPolicy,
}

impl Catalog {
    pub(crate) fn from_locales(locales: BTreeMap<LocaleTag, LocaleMessages>) -> Self {
        Self {
            locales,
            policy: ErrorPolicy::default(),
        }
    }

    /// Load and validate every locale file in `dir`.
    ///
    /// Under [`ErrorPolicy::Terminate`] any failure ends the process.
    pub fn register<P: AsRef<Path>>(dir: P, policy: ErrorPolicy) -> I18nResult<Self> {
        Self::register_with(dir, LoaderOptions::default(), policy)
    }

    /// Like [`Catalog::register`] with explicit loader options
    pub fn register_with<P: AsRef<Path>>(
        dir: P,
        options: LoaderOptions,
        policy: ErrorPolicy,
    ) -> I18nResult<Self> {
        let result = Self::build(dir.as_ref(), options).map(|catalog| catalog.with_policy(policy));
        policy.enforce(result)
    }

    fn build(dir: &Path, options: LoaderOptions) -> I18nResult<Self> {
        let mut loader = CatalogLoader::new(options);
        loader.load_dir(dir)?;

        let catalog = loader.into_catalog();
        CatalogValidator::validate(&catalog)?;

        info!(
            dir = %dir.display(),
            locales = catalog.locales.len(),
            messages = catalog.len(),
            "registered message catalog"
        );
        Ok(catalog)
    }

    /// Replace the error policy used by [`Catalog::translate`]
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Error policy applied by [`Catalog::translate`]
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Render `message_id` for `locale`, applying the catalog's error policy.
    pub fn translate(
        &self,
        locale: &str,
        message_id: &str,
        data: Option<&TemplateData>,
    ) -> I18nResult<String> {
        self.policy.enforce(self.try_translate(locale, message_id, data))
    }

    /// Render `message_id` for `locale`, always returning errors.
    ///
    /// Text without template actions is returned verbatim and never compiled.
    /// Templates compile on first use; missing data keys render empty.
    pub fn try_translate(
        &self,
        locale: &str,
        message_id: &str,
        data: Option<&TemplateData>,
    ) -> I18nResult<String> {
        let (tag, messages) = self
            .locale_entry(locale)
            .ok_or_else(|| I18nError::UnknownLocale {
                locale: locale.to_string(),
            })?;
        let message = messages
            .get(message_id)
            .ok_or_else(|| I18nError::UnknownMessage {
                locale: tag.to_string(),
                message_id: message_id.to_string(),
            })?;

        if !message.is_template() {
            return Ok(message.raw().to_string());
        }

        let template = message.template().map_err(|source| I18nError::Compile {
            locale: tag.to_string(),
            message_id: message_id.to_string(),
            raw: message.raw().to_string(),
            source: source.clone(),
        })?;

        template.render(data).map_err(|source| I18nError::Render {
            locale: tag.to_string(),
            message_id: message_id.to_string(),
            raw: message.raw().to_string(),
            source,
        })
    }

    /// Look up a message
    pub fn message(&self, locale: &str, message_id: &str) -> Option<&Message> {
        self.locale_entry(locale)
            .and_then(|(_, messages)| messages.get(message_id))
    }

    /// Whether `locale` defines `message_id`
    pub fn contains(&self, locale: &str, message_id: &str) -> bool {
        self.message(locale, message_id).is_some()
    }

    /// Loaded locales in tag order
    pub fn locales(&self) -> impl Iterator<Item = &LocaleTag> {
        self.locales.keys()
    }

    /// Message ids of `locale` in sorted order
    pub fn message_ids(&self, locale: &str) -> Option<impl Iterator<Item = &str>> {
        self.locale_entry(locale)
            .map(|(_, messages)| messages.keys().map(String::as_str))
    }

    /// Total number of messages across all locales
    pub fn len(&self) -> usize {
        self.locales.values().map(BTreeMap::len).sum()
    }

    /// Whether the catalog holds no messages
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locale, message and compilation counts
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            locales: self.locales.len(),
            ..CatalogStats::default()
        };

        for message in self.locales.values().flat_map(BTreeMap::values) {
            stats.messages += 1;
            match message.compile_state() {
                CompileState::Compiled => stats.compiled += 1,
                CompileState::Failed => stats.failed += 1,
                CompileState::Uncompiled => {}
            }
        }

        stats
    }

    pub(crate) fn iter_locales(&self) -> impl Iterator<Item = (&LocaleTag, &LocaleMessages)> {
        self.locales.iter()
    }

    /// Exact tag first, then the canonical form of `locale`.
    fn locale_entry(&self, locale: &str) -> Option<(&LocaleTag, &LocaleMessages)> {
        self.locales.get_key_value(locale).or_else(|| {
            LocaleTag::parse(locale)
                .ok()
                .and_then(|tag| self.locales.get_key_value(&tag))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_data;

    fn catalog() -> Catalog {
        let mut loader = CatalogLoader::new(LoaderOptions::default());
        loader
            .load_str(
                "common",
                "en-US",
                "Greeting = \"Hello, {{.Name}}\"\nBroken = \"{{.Name\"\nDeep = \"{{.Name.First}}\"",
            )
            .unwrap();
        loader.into_catalog()
    }

    #[test]
    fn test_translate_template() {
        let catalog = catalog();
        let data = template_data! { "Name" => "Ana" };

        assert_eq!(
            catalog.translate("en-US", "Greeting", Some(&data)).unwrap(),
            "Hello, Ana"
        );
    }

    #[test]
    fn test_locale_lookup_is_canonicalized() {
        let catalog = catalog();
        assert!(catalog.contains("en-us", "Greeting"));
        assert!(!catalog.contains("fr-FR", "Greeting"));
    }

    #[test]
    fn test_unknown_locale_and_message() {
        let catalog = catalog();

        assert!(matches!(
            catalog.try_translate("de-DE", "Greeting", None),
            Err(I18nError::UnknownLocale { .. })
        ));
        assert!(matches!(
            catalog.try_translate("en-US", "Nope", None),
            Err(I18nError::UnknownMessage { .. })
        ));
    }

    #[test]
    fn test_compile_and_render_errors() {
        let catalog = catalog();

        assert!(matches!(
            catalog.try_translate("en-US", "Broken", None),
            Err(I18nError::Compile { .. })
        ));
        let data = template_data! { "Name" => "Ana" };
        assert!(matches!(
            catalog.try_translate("en-US", "Deep", Some(&data)),
            Err(I18nError::Render { .. })
        ));
    }

    #[test]
    fn test_stats_track_compilation() {
        let catalog = catalog();
        let _ = catalog.try_translate("en-US", "Greeting", None);
        let _ = catalog.try_translate("en-US", "Broken", None);

        assert_eq!(
            catalog.stats(),
            CatalogStats {
                locales: 1,
                messages: 3,
                compiled: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_empty_locale_is_empty() {
        let mut loader = CatalogLoader::new(LoaderOptions::default());
        loader.load_str("common", "en-US", "").unwrap();
        let catalog = loader.into_catalog();

        assert_eq!(catalog.locales().count(), 1);
        assert_eq!(catalog.len(), 0);
        assert!(catalog.is_empty());
        assert!(!self::catalog().is_empty());
    }
}
