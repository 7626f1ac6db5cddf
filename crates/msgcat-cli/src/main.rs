//! msgcat - main entry point

use anyhow::{Context, Result};
use clap::Parser;
use msgcat_cli::{commands, Args, Command};
use msgcat_common::init_logging;
use msgcat_config::ConfigLoader;
use tracing::{debug, info};

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("failed to load configuration")?,
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging).context("failed to initialize logging")?;
    debug!(?config, "configuration loaded");

    match args.command {
        Command::Check { dir } => {
            let report = commands::check(&config.catalog, dir.as_deref())
                .context("locale directory failed validation")?;
            info!(locales = report.locales.len(), total = report.total, "catalog is consistent");
            println!("{report}");
        }
        Command::Translate {
            locale,
            id,
            data,
            dir,
        } => {
            let text = commands::translate(
                &config.catalog,
                dir.as_deref(),
                &locale,
                &id,
                data.as_deref(),
            )
            .with_context(|| format!("failed to translate {id} for {locale}"))?;
            println!("{text}");
        }
    }

    Ok(())
}
