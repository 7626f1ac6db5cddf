//! Locale tags used as the catalog's top-level key

use crate::error::{I18nError, I18nResult};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A validated, canonicalized language tag such as `en-US` or `zh-CN`.
///
/// Equality, ordering and hashing use the canonical text, so `zh-cn` and
/// `zh-CN` are the same locale.
#[derive(Debug, Clone)]
pub struct LocaleTag {
    id: LanguageIdentifier,
    tag: String,
}

impl LocaleTag {
    /// Parse and canonicalize a language tag
    pub fn parse(input: &str) -> I18nResult<Self> {
        if input.trim().is_empty() {
            return Err(I18nError::InvalidLocale {
                tag: input.to_string(),
                reason: "empty language tag".to_string(),
            });
        }

        let id: LanguageIdentifier = input.parse().map_err(|e| I18nError::InvalidLocale {
            tag: input.to_string(),
            reason: format!("{e}"),
        })?;
        let tag = id.to_string();

        Ok(Self { id, tag })
    }

    /// Canonical text form
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The parsed identifier
    pub fn language_identifier(&self) -> &LanguageIdentifier {
        &self.id
    }

    /// Primary language subtag, e.g. `zh` for `zh-CN`
    pub fn language(&self) -> &str {
        self.id.language.as_str()
    }

    /// Region subtag, if present
    pub fn region(&self) -> Option<&str> {
        self.id.region.as_ref().map(|r| r.as_str())
    }
}

impl FromStr for LocaleTag {
    type Err = I18nError;

    fn from_str(s: &str) -> I18nResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl PartialEq for LocaleTag {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for LocaleTag {}

impl PartialOrd for LocaleTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocaleTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag.cmp(&other.tag)
    }
}

impl Hash for LocaleTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
    }
}

impl Borrow<str> for LocaleTag {
    fn borrow(&self) -> &str {
        &self.tag
    }
}

impl AsRef<str> for LocaleTag {
    fn as_ref(&self) -> &str {
        &self.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes() {
        let tag = LocaleTag::parse("zh-cn").unwrap();
        assert_eq!(tag.as_str(), "zh-CN");
        assert_eq!(tag.language(), "zh");
        assert_eq!(tag.region(), Some("CN"));

        let tag = LocaleTag::parse("EN-us").unwrap();
        assert_eq!(tag.to_string(), "en-US");
    }

    #[test]
    fn test_language_only() {
        let tag = LocaleTag::parse("fr").unwrap();
        assert_eq!(tag.as_str(), "fr");
        assert_eq!(tag.region(), None);
    }

    #[test]
    fn test_equality_uses_canonical_form() {
        assert_eq!(
            LocaleTag::parse("en-us").unwrap(),
            LocaleTag::parse("en-US").unwrap()
        );
        assert!(LocaleTag::parse("en-US").unwrap() < LocaleTag::parse("zh-CN").unwrap());
    }

    #[test]
    fn test_invalid_tags() {
        for input in ["", "  ", "e", "toolonglanguagetag", "12-34", "en-US-!"] {
            let err = LocaleTag::parse(input).unwrap_err();
            assert!(
                matches!(err, I18nError::InvalidLocale { .. }),
                "expected invalid locale for {input:?}, got {err}"
            );
        }
    }
}
