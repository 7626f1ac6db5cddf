//! Command line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Check and render localized message catalogs
#[derive(Parser, Debug)]
#[command(name = "msgcat", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive, overrides the configured level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a locale directory
    Check {
        /// Locale directory, overrides the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Render one message
    Translate {
        /// Locale tag, e.g. en-US
        #[arg(short, long)]
        locale: String,

        /// Message id, e.g. Order.NotFound.Description
        #[arg(short, long)]
        id: String,

        /// Template data as a JSON object
        #[arg(long)]
        data: Option<String>,

        /// Locale directory, overrides the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}
