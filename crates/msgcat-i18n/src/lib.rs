//! # msgcat i18n
//!
//! Localized message catalog built from TOML locale files.
//!
//! Locale files are named `<module>.<locale>.toml` and hold strings or nested
//! tables; nested keys flatten into dot-separated message ids such as
//! `Order.NotFound.Description`. After loading, every locale must define the
//! same set of ids. Messages containing `{{` are templates, compiled once on
//! first use and rendered against caller data.
//!
//! ```no_run
//! use msgcat_common::ErrorPolicy;
//! use msgcat_i18n::{template_data, Catalog};
//!
//! let catalog = Catalog::register("locales", ErrorPolicy::Propagate)?;
//! let text = catalog.translate(
//!     "en-US",
//!     "Order.NotFound.Solution",
//!     Some(&template_data! { "OrderId" => 42 }),
//! )?;
//! println!("{text}");
//! # Ok::<(), msgcat_i18n::I18nError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod error;
pub mod loader;
pub mod locale;
pub mod message;
pub mod registry;
pub mod template;
pub mod validator;

pub use catalog::{Catalog, CatalogStats};
pub use error::{I18nError, I18nResult};
pub use loader::{CatalogLoader, LoaderOptions, LocaleMessages};
pub use locale::LocaleTag;
pub use message::{CompileState, Message};
pub use registry::{global, install, register_catalog, translate};
pub use serde_json::Value;
pub use template::{Template, TemplateData, TemplateError};
pub use validator::CatalogValidator;
