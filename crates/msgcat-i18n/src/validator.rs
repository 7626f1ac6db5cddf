//! Cross-locale consistency checks.

use crate::catalog::Catalog;
use crate::error::{I18nError, I18nResult};
use tracing::{debug, warn};

/// Checks that every locale defines the same message ids.
pub struct CatalogValidator;

impl CatalogValidator {
    /// Compare every locale against the first one.
    ///
    /// The reference is the smallest locale tag, so which locale gets blamed
    /// for a mismatch is deterministic. Message text is not compared.
    pub fn validate(catalog: &Catalog) -> I18nResult<()> {
        let mut locales = catalog.iter_locales();
        let Some((reference, reference_messages)) = locales.next() else {
            warn!("message catalog is empty");
            return Ok(());
        };

        for (locale, messages) in locales {
            if let Some(missing) = reference_messages
                .keys()
                .find(|id| !messages.contains_key(id.as_str()))
            {
                return Err(I18nError::MissingMessage {
                    locale: locale.to_string(),
                    message_id: missing.clone(),
                    reference: reference.to_string(),
                });
            }

            if messages.len() != reference_messages.len() {
                let extra = messages
                    .keys()
                    .find(|id| !reference_messages.contains_key(id.as_str()))
                    .cloned()
                    .unwrap_or_default();
                return Err(I18nError::UnexpectedMessage {
                    locale: locale.to_string(),
                    message_id: extra,
                    reference: reference.to_string(),
                });
            }

            debug!(locale = %locale, reference = %reference, "locale matches reference");
        }

        Ok(())
    }
}
