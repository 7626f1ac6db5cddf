//! # msgcat common
//!
//! Shared error type, error policy, logging setup, and test helpers for msgcat.
//!
//! This crate provides the foundational pieces used across all other crates
//! in the msgcat workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod policy;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{MsgcatError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use policy::{ErrorPolicy, FATAL_EXIT_CODE};
