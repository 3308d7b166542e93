//! Init-config command: write the default configuration as JSON

use super::shared::{CommandStats, setup_logging};
use crate::cli::args::InitConfigArgs;
use crate::config::GoalsConfig;
use crate::error::GoalsError;
use anyhow::{Context, Result};
use colored::*;
use tracing::info;

pub async fn run_init_config(args: InitConfigArgs) -> Result<CommandStats> {
    setup_logging(&args.log)?;

    let path = match args.path {
        Some(path) => path,
        None => GoalsConfig::default_config_path()?,
    };

    if path.exists() && !args.force {
        return Err(GoalsError::OutputExists { path }.into());
    }

    GoalsConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());

    if !args.log.quiet {
        println!("{} {}", "wrote".green(), path.display());
    }

    Ok(CommandStats {
        files_written: vec![path],
        ..CommandStats::default()
    })
}
