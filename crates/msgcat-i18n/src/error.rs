//! Error types for catalog operations

use crate::template::TemplateError;
use msgcat_common::MsgcatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating, or rendering the catalog
#[derive(Error, Debug)]
pub enum I18nError {
    /// The locale directory could not be listed
    #[error("failed to read locale directory {}: {source}", .path.display())]
    ReadDir {
        /// Path that failed
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// A locale file could not be read
    #[error("failed to read locale file {}: {source}", .path.display())]
    ReadFile {
        /// Path that failed
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// A file name does not follow `<module>.<locale>.toml`
    #[error("locale file {file_name} has an invalid name, expected <module>.<locale>.toml")]
    InvalidFileName {
        /// Offending file name
        file_name: String,
    },

    /// A locale tag failed to parse
    #[error("invalid locale tag '{tag}': {reason}")]
    InvalidLocale {
        /// Tag as written
        tag: String,
        /// Why the tag was rejected
        reason: String,
    },

    /// A locale document is not valid TOML
    #[error("failed to parse locale file {origin}: {source}")]
    Parse {
        /// Where the document came from
        origin: String,
        /// Underlying cause
        #[source]
        source: toml::de::Error,
    },

    /// A leaf value is neither a string nor a table
    #[error("unsupported data format {kind} for message {message_id} in locale {locale}")]
    UnsupportedValue {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
        /// Kind of the rejected value
        kind: &'static str,
    },

    /// A leaf value is the empty string
    #[error("message {message_id} in locale {locale} is an empty string")]
    EmptyMessage {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
    },

    /// A message id was defined twice for the same locale
    #[error(
        "message {message_id} already exists in locale {locale}, \
         old data: '{existing}' ({existing_origin}), \
         new data: '{conflicting}' ({conflicting_origin})"
    )]
    DuplicateMessage {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
        /// Text already registered
        existing: String,
        /// Origin of the registered text
        existing_origin: String,
        /// Text that collided with it
        conflicting: String,
        /// Origin of the colliding text
        conflicting_origin: String,
    },

    /// A locale lacks a message the reference locale defines
    #[error("locale {locale} is not equal to {reference}, missing message {message_id}")]
    MissingMessage {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
        /// Locale every other locale is checked against
        reference: String,
    },

    /// A locale defines a message the reference locale lacks
    #[error("locale {locale} is not equal to {reference}, unexpected message {message_id}")]
    UnexpectedMessage {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
        /// Locale every other locale is checked against
        reference: String,
    },

    /// No messages were loaded for the requested locale
    #[error("the locale {locale} does not exist")]
    UnknownLocale {
        /// Requested locale
        locale: String,
    },

    /// The message id is absent for the requested locale
    #[error("the message {message_id} does not exist in locale {locale}")]
    UnknownMessage {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
    },

    /// The message template failed to compile
    #[error("message {message_id} in locale {locale} failed to compile, message data is '{raw}'")]
    Compile {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
        /// Raw template text
        raw: String,
        /// Underlying cause
        #[source]
        source: TemplateError,
    },

    /// The compiled template failed while rendering
    #[error("message {message_id} in locale {locale} failed to render, message data is '{raw}'")]
    Render {
        /// Locale the message belongs to
        locale: String,
        /// Dotted message id
        message_id: String,
        /// Raw template text
        raw: String,
        /// Underlying cause
        #[source]
        source: TemplateError,
    },

    /// A process-wide catalog is already installed
    #[error("a message catalog is already registered")]
    AlreadyRegistered,

    /// No process-wide catalog has been installed
    #[error("no message catalog has been registered")]
    NotRegistered,
}

impl I18nError {
    /// Locale the error refers to, if any
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::UnsupportedValue { locale, .. }
            | Self::EmptyMessage { locale, .. }
            | Self::DuplicateMessage { locale, .. }
            | Self::MissingMessage { locale, .. }
            | Self::UnexpectedMessage { locale, .. }
            | Self::UnknownLocale { locale }
            | Self::UnknownMessage { locale, .. }
            | Self::Compile { locale, .. }
            | Self::Render { locale, .. } => Some(locale),
            Self::InvalidLocale { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Message id the error refers to, if any
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::UnsupportedValue { message_id, .. }
            | Self::EmptyMessage { message_id, .. }
            | Self::DuplicateMessage { message_id, .. }
            | Self::MissingMessage { message_id, .. }
            | Self::UnexpectedMessage { message_id, .. }
            | Self::UnknownMessage { message_id, .. }
            | Self::Compile { message_id, .. }
            | Self::Render { message_id, .. } => Some(message_id),
            _ => None,
        }
    }
}

impl From<I18nError> for MsgcatError {
    fn from(err: I18nError) -> Self {
        let locale = err.locale().map(ToString::to_string);
        MsgcatError::localization_with_source(err.to_string(), locale, err)
    }
}

/// Result type for catalog operations
pub type I18nResult<T> = Result<T, I18nError>;
