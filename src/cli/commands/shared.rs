//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, cache construction and
//! the fetch spinner used by every subcommand.

use crate::cache::{Snapshot, SnapshotCache};
use crate::cli::args::{GoalArgs, LogArgs, SelectionArgs, SourceArgs};
use crate::config::GoalsConfig;
use crate::loader::open_source;
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Statistics reported back to `main`
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Sheets with a non-empty selection
    pub sheets_reported: usize,
    /// Records evaluated across all sheets
    pub records_evaluated: usize,
    /// Workbook fetches performed
    pub fetches: usize,
    pub files_written: Vec<PathBuf>,
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &LogArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("support_goals={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Defaults, then the config file, then CLI overrides
pub fn load_configuration(source: &SourceArgs, goals: &GoalArgs) -> Result<GoalsConfig> {
    let config = GoalsConfig::load(source.config_file.as_deref())
        .context("Failed to load configuration")?;
    let config = goals
        .apply(config)
        .context("Invalid goal override on the command line")?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Reject a `--sheet` that is not configured
pub fn check_selection(selection: &SelectionArgs, config: &GoalsConfig) -> Result<()> {
    if let Some(sheet) = &selection.sheet {
        if config.sheet(sheet).is_none() {
            bail!(
                "Unknown sheet '{}'; configured sheets: {}",
                sheet,
                config.sheet_names().join(", ")
            );
        }
    }
    Ok(())
}

pub fn build_cache(source: &SourceArgs, config: GoalsConfig) -> Result<SnapshotCache> {
    let path = source.resolve_source(&config)?;
    let workbook_source =
        open_source(&path).with_context(|| format!("Cannot open {}", path.display()))?;
    Ok(SnapshotCache::new(workbook_source, config))
}

/// Read through the cache, with a spinner while a fetch is running
pub fn fetch_snapshot(cache: &SnapshotCache, show_progress: bool) -> Result<Arc<Snapshot>> {
    let spinner = show_progress.then(|| create_spinner(&format!("Loading {}", cache.source_description())));
    let result = cache.get();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result.context("Failed to load workbook; no data available for either sheet")
}

pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
