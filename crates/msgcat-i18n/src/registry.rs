//! Process-wide catalog registration

use crate::catalog::Catalog;
use crate::error::{I18nError, I18nResult};
use crate::template::TemplateData;
use msgcat_common::ErrorPolicy;
use once_cell::sync::OnceCell;
use std::path::Path;

static CATALOG: OnceCell<Catalog> = OnceCell::new();

/// Load, validate and install the process-wide catalog from `dir`.
///
/// Loading errors follow `policy`. Registering twice is an
/// [`I18nError::AlreadyRegistered`] error.
pub fn register_catalog<P: AsRef<Path>>(
    dir: P,
    policy: ErrorPolicy,
) -> I18nResult<&'static Catalog> {
    if CATALOG.get().is_some() {
        return policy.enforce(Err(I18nError::AlreadyRegistered));
    }
    let catalog = Catalog::register(dir, policy)?;
    install(catalog)
}

/// Install an already built catalog as the process-wide one
pub fn install(catalog: Catalog) -> I18nResult<&'static Catalog> {
    let policy = catalog.policy();
    let result = match CATALOG.set(catalog) {
        Ok(()) => global(),
        Err(_) => Err(I18nError::AlreadyRegistered),
    };
    policy.enforce(result)
}

/// The process-wide catalog, if one was registered
pub fn global() -> I18nResult<&'static Catalog> {
    CATALOG.get().ok_or(I18nError::NotRegistered)
}

/// Translate through the process-wide catalog using its error policy
pub fn translate(
    locale: &str,
    message_id: &str,
    data: Option<&TemplateData>,
) -> I18nResult<String> {
    global()?.translate(locale, message_id, data)
}
