//! Command implementations for the goals dashboard CLI
//!
//! Each subcommand is implemented in its own module:
//! - `show`: load once and render the dashboard
//! - `watch`: keep the dashboard on screen with periodic refreshes
//! - `export`: write goal and detail tables or JSON reports
//! - `init_config`: write the default configuration file

pub mod export;
pub mod init_config;
pub mod shared;
pub mod show;
pub mod watch;

pub use shared::CommandStats;

use crate::cli::args::{Args, Commands};
use anyhow::{Result, bail};

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<CommandStats> {
    match args.command {
        Some(Commands::Show(show_args)) => show::run_show(show_args).await,
        Some(Commands::Watch(watch_args)) => watch::run_watch(watch_args).await,
        Some(Commands::Export(export_args)) => export::run_export(export_args).await,
        Some(Commands::InitConfig(init_args)) => init_config::run_init_config(init_args).await,
        None => bail!("No command given; run with --help to list commands"),
    }
}
