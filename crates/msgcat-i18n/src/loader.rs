//! Locale file discovery, parsing and flattening.

use crate::catalog::Catalog;
use crate::error::{I18nError, I18nResult};
use crate::locale::LocaleTag;
use crate::message::Message;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Messages of one locale, keyed by dot-separated message id
pub type LocaleMessages = BTreeMap<String, Message>;

/// Extension of locale files.
pub const LOCALE_EXTENSION: &str = "toml";

/// Source file extensions skipped by default.
pub const DEFAULT_SOURCE_EXTENSIONS: [&str; 2] = ["rs", "go"];

/// Settings that control which files the loader accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Extension locale files must carry
    pub locale_extension: String,
    /// Extensions of `<name>.<ext>` files silently skipped in the locale dir
    pub source_extensions: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            locale_extension: LOCALE_EXTENSION.to_string(),
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl LoaderOptions {
    /// Replace the skipped source extensions
    #[must_use]
    pub fn with_source_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug)]
enum FileKind {
    Locale { module: String, locale: LocaleTag },
    Source,
}

/// Accumulates locale documents into per-locale message tables.
///
/// Several files may contribute to the same locale. Any structural problem
/// aborts loading with the first error found.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    options: LoaderOptions,
    locales: BTreeMap<LocaleTag, LocaleMessages>,
}

impl CatalogLoader {
    /// Create an empty loader
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            locales: BTreeMap::new(),
        }
    }

    /// Load every locale file in `dir`, in sorted file name order.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> I18nResult<()> {
        let dir = dir.as_ref();
        let read_dir_error = |source| I18nError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_dir_error)? {
            paths.push(entry.map_err(read_dir_error)?.path());
        }
        paths.sort();

        for path in paths {
            if path.is_dir() {
                debug!(path = %path.display(), "skipping directory in locale dir");
                continue;
            }
            self.load_file(&path)?;
        }

        Ok(())
    }

    /// Load a single file, which must be named `<module>.<locale>.toml` or be
    /// a skipped source file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> I18nResult<()> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.classify(&file_name)? {
            FileKind::Source => {
                debug!(file = %file_name, "skipping source file");
                Ok(())
            }
            FileKind::Locale { module, locale } => {
                let source = fs::read_to_string(path).map_err(|source| I18nError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                let count = self.insert_document(&file_name, &locale, &source)?;
                info!(
                    file = %file_name,
                    module = %module,
                    locale = %locale,
                    messages = count,
                    "loaded locale file"
                );
                Ok(())
            }
        }
    }

    /// Load an in-memory document as if it were `<module>.<locale>.toml`.
    pub fn load_str(&mut self, module: &str, locale: &str, source: &str) -> I18nResult<()> {
        let locale = LocaleTag::parse(locale)?;
        let origin = format!("{module}.{locale}.{}", self.options.locale_extension);
        let count = self.insert_document(&origin, &locale, source)?;
        debug!(origin = %origin, messages = count, "loaded in-memory locale document");
        Ok(())
    }

    /// Finish loading. The result is not validated.
    pub fn into_catalog(self) -> Catalog {
        Catalog::from_locales(self.locales)
    }

    fn classify(&self, file_name: &str) -> I18nResult<FileKind> {
        let parts: Vec<&str> = file_name.split('.').collect();

        match parts.as_slice() {
            [name, ext]
                if !name.is_empty() && self.options.source_extensions.iter().any(|s| s == ext) =>
            {
                Ok(FileKind::Source)
            }
            [module, locale, ext]
                if !module.is_empty() && *ext == self.options.locale_extension =>
            {
                Ok(FileKind::Locale {
                    module: (*module).to_string(),
                    locale: LocaleTag::parse(locale)?,
                })
            }
            _ => Err(I18nError::InvalidFileName {
                file_name: file_name.to_string(),
            }),
        }
    }

    /// Parse, flatten and merge one document. Returns the number of messages
    /// it contributed.
    fn insert_document(
        &mut self,
        origin: &str,
        locale: &LocaleTag,
        source: &str,
    ) -> I18nResult<usize> {
        let table: toml::Table = toml::from_str(source).map_err(|source| I18nError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        let mut entries = Vec::new();
        flatten("", &table, locale, &mut entries)?;
        let count = entries.len();

        let messages = self.locales.entry(locale.clone()).or_default();
        for (message_id, raw) in entries {
            match messages.entry(message_id) {
                Entry::Occupied(existing) => {
                    return Err(I18nError::DuplicateMessage {
                        locale: locale.to_string(),
                        message_id: existing.key().clone(),
                        existing: existing.get().raw().to_string(),
                        existing_origin: existing.get().origin().to_string(),
                        conflicting: raw,
                        conflicting_origin: origin.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(Message::new(raw, origin));
                }
            }
        }

        Ok(count)
    }
}

/// Walk `table`, emitting `(dot.path, text)` for every string leaf.
fn flatten(
    prefix: &str,
    table: &toml::Table,
    locale: &LocaleTag,
    out: &mut Vec<(String, String)>,
) -> I18nResult<()> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            toml::Value::String(text) if text.is_empty() => {
                return Err(I18nError::EmptyMessage {
                    locale: locale.to_string(),
                    message_id: path,
                });
            }
            toml::Value::String(text) => out.push((path, text.clone())),
            toml::Value::Table(nested) => flatten(&path, nested, locale, out)?,
            other => {
                return Err(I18nError::UnsupportedValue {
                    locale: locale.to_string(),
                    message_id: path,
                    kind: other.type_str(),
                });
            }
        }
    }

    Ok(())
}
