//! Subcommand implementations.

use crate::error::{CliError, CliResult};
use msgcat_config::CatalogSettings;
use msgcat_i18n::{Catalog, LoaderOptions, TemplateData, Value};
use std::fmt;
use std::path::Path;

/// Outcome of `msgcat check`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Loaded locales in tag order
    pub locales: Vec<String>,
    /// Messages defined by every locale
    pub messages_per_locale: usize,
    /// Messages across all locales
    pub total: usize,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OK: {} locale(s) [{}], {} message(s) each, {} total",
            self.locales.len(),
            self.locales.join(", "),
            self.messages_per_locale,
            self.total
        )
    }
}

/// Load and validate the locale directory.
pub fn check(settings: &CatalogSettings, dir: Option<&Path>) -> CliResult<CheckReport> {
    let catalog = load_catalog(settings, dir)?;
    let locales: Vec<String> = catalog.locales().map(ToString::to_string).collect();
    let messages_per_locale = locales
        .first()
        .and_then(|locale| catalog.message_ids(locale))
        .map_or(0, Iterator::count);

    Ok(CheckReport {
        locales,
        messages_per_locale,
        total: catalog.len(),
    })
}

/// Render one message from the locale directory.
pub fn translate(
    settings: &CatalogSettings,
    dir: Option<&Path>,
    locale: &str,
    message_id: &str,
    data: Option<&str>,
) -> CliResult<String> {
    let data = data.map(parse_data).transpose()?;
    let catalog = load_catalog(settings, dir)?;
    Ok(catalog.translate(locale, message_id, data.as_ref())?)
}

/// Parse `--data` into template data; it must be a JSON object.
pub fn parse_data(json: &str) -> CliResult<TemplateData> {
    match serde_json::from_str::<Value>(json).map_err(CliError::Data)? {
        Value::Object(map) => Ok(map),
        Value::Null => Err(CliError::DataNotObject("null")),
        Value::Bool(_) => Err(CliError::DataNotObject("boolean")),
        Value::Number(_) => Err(CliError::DataNotObject("number")),
        Value::String(_) => Err(CliError::DataNotObject("string")),
        Value::Array(_) => Err(CliError::DataNotObject("array")),
    }
}

fn load_catalog(settings: &CatalogSettings, dir: Option<&Path>) -> CliResult<Catalog> {
    let dir = dir.unwrap_or(&settings.locale_dir);
    let options =
        LoaderOptions::default().with_source_extensions(settings.source_extensions.iter().cloned());
    Ok(Catalog::register_with(dir, options, settings.error_policy)?)
}
