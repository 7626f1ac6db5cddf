//! # msgcat CLI
//!
//! Command line front end for msgcat: validate a locale directory or render a
//! single message from it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Args, Command};
pub use commands::{check, parse_data, translate, CheckReport};
pub use error::{CliError, CliResult};
