//! Watch command: redraw on an interval, reload when the snapshot expires
//!
//! Typing `r` and Enter forces a reload, `q` quits. Ctrl+C is handled by
//! `main`.

use super::shared::{
    CommandStats, build_cache, check_selection, load_configuration, setup_logging,
};
use super::show::render_snapshot;
use crate::cache::SnapshotCache;
use crate::cli::args::WatchArgs;
use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

enum Trigger {
    Tick,
    Reload,
    Quit,
}

pub async fn run_watch(args: WatchArgs) -> Result<CommandStats> {
    setup_logging(&args.view.log)?;

    let config = load_configuration(&args.view.source, &args.view.goals)?;
    check_selection(&args.view.selection, &config)?;
    let interval = Duration::from_secs(args.interval_secs.unwrap_or(config.cache_ttl_secs).max(1));
    let cache = Arc::new(build_cache(&args.view.source, config)?);
    info!("Watching {} every {:?}", cache.source_description(), interval);

    let mut ticker = tokio::time::interval(interval);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut stats = CommandStats::default();

    loop {
        let trigger = tokio::select! {
            _ = ticker.tick() => Trigger::Tick,
            line = input.next_line(), if input_open => match line {
                Ok(Some(line)) => match line.trim().to_lowercase().as_str() {
                    "r" => Trigger::Reload,
                    "q" => Trigger::Quit,
                    _ => continue,
                },
                Ok(None) | Err(_) => {
                    debug!("Standard input closed; manual reload disabled");
                    input_open = false;
                    continue;
                }
            },
        };

        match trigger {
            Trigger::Quit => break,
            Trigger::Reload => {
                cache.invalidate();
                ticker.reset();
            }
            Trigger::Tick => {}
        }

        stats = refresh(&cache, &args).await?;
    }

    Ok(stats)
}

async fn refresh(cache: &Arc<SnapshotCache>, args: &WatchArgs) -> Result<CommandStats> {
    let loader = Arc::clone(cache);
    let loaded = tokio::task::spawn_blocking(move || loader.get())
        .await
        .context("Workbook loader task failed")?;

    if !args.view.log.quiet {
        // Clear screen and home the cursor
        print!("\x1B[2J\x1B[H");
    }

    match loaded {
        Ok(snapshot) => {
            let stats = render_snapshot(cache, &snapshot, &args.view);
            println!(
                "{}",
                "Type r + Enter to reload now, q + Enter to quit".bright_black()
            );
            Ok(stats)
        }
        Err(error) => {
            // Keep watching; the next tick or manual reload tries again
            warn!("Refresh failed: {}", error);
            println!("{} {}", "Error:".red().bold(), error);
            println!("{}", "No data available for either sheet.".yellow());
            Ok(CommandStats {
                fetches: cache.loads(),
                ..CommandStats::default()
            })
        }
    }
}
