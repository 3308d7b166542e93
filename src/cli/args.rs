//! Command-line argument definitions for the goals dashboard
//!
//! Defines the CLI using the clap derive API. Source, selection, goal and
//! logging options are shared between subcommands through flattened groups.

use crate::config::GoalsConfig;
use crate::error::{GoalsError, Result};
use crate::evaluator::SelectionFilter;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the support goals dashboard
///
/// Reads the team performance workbook, normalizes its two sheets and shows
/// per-agent goal results in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "support-goals",
    version,
    about = "Per-agent goal tracking over the support and customer service performance sheets",
    long_about = "Reads a hand-maintained performance workbook (xlsx, xls, ods, or a directory \
                  of per-sheet CSV exports), normalizes the support and customer service sheets \
                  and evaluates every agent against the configured goals. Volume goals are the \
                  average of the current selection."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show the dashboard once
    Show(ShowArgs),
    /// Keep the dashboard on screen, refreshing on an interval
    Watch(WatchArgs),
    /// Write goal and detail tables to files
    Export(ExportArgs),
    /// Write the default configuration file
    InitConfig(InitConfigArgs),
}

/// Where the workbook and configuration come from
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    /// Workbook file (xlsx, xlsm, xlsb, xls, ods)
    #[arg(
        short = 'w',
        long = "workbook",
        value_name = "FILE",
        conflicts_with = "csv_dir"
    )]
    pub workbook: Option<PathBuf>,

    /// Directory holding one CSV export per sheet (`<sheet>.csv`)
    #[arg(long = "csv-dir", value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// Defaults to <user config dir>/support-goals/goals.json when present.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

/// Team and shift selection
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SelectionArgs {
    /// Only this sheet (default: both)
    #[arg(short = 's', long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Teams to include; repeat for several (default: all)
    #[arg(short = 't', long = "team", value_name = "TEAM")]
    pub teams: Vec<String>,

    /// Shifts to include; repeat for several (default: all)
    #[arg(long = "shift", value_name = "SHIFT")]
    pub shifts: Vec<String>,
}

impl SelectionArgs {
    /// The filter for one sheet; empty lists select every value present
    pub fn filter_for(&self, default: &SelectionFilter) -> SelectionFilter {
        let teams = if self.teams.is_empty() {
            default.teams.clone()
        } else {
            self.teams.iter().cloned().collect()
        };
        let shifts = if self.shifts.is_empty() {
            default.shifts.clone()
        } else {
            self.shifts.iter().cloned().collect()
        };
        SelectionFilter { teams, shifts }
    }

    pub fn includes_sheet(&self, name: &str) -> bool {
        self.sheet.as_deref().is_none_or(|sheet| sheet == name)
    }
}

/// Goal overrides applied on top of the configuration file
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GoalArgs {
    /// Minimum chat rating for a sheet, as SHEET=VALUE; repeatable
    #[arg(long = "min-chat-rating", value_name = "SHEET=VALUE", value_parser = parse_sheet_rating)]
    pub min_chat_rating: Vec<(String, f64)>,

    /// Minimum chat rating percentage, as a fraction (0.5 = 50%)
    #[arg(long = "min-rating-pct", value_name = "FRACTION")]
    pub min_rating_pct: Option<f64>,

    /// Maximum chat response time (HH:MM:SS)
    #[arg(long = "max-chat-tme", value_name = "HH:MM:SS")]
    pub max_chat_response_time: Option<String>,

    /// Maximum phone response time (HH:MM:SS)
    #[arg(long = "max-phone-tme", value_name = "HH:MM:SS")]
    pub max_phone_response_time: Option<String>,

    /// Snapshot lifetime in seconds
    #[arg(long = "cache-ttl", value_name = "SECONDS")]
    pub cache_ttl_secs: Option<u64>,
}

impl GoalArgs {
    /// Apply CLI overrides; the result is validated again
    pub fn apply(&self, mut config: GoalsConfig) -> Result<GoalsConfig> {
        for (sheet, rating) in &self.min_chat_rating {
            config = config.with_min_chat_rating(sheet, *rating)?;
        }
        if let Some(pct) = self.min_rating_pct {
            config = config.with_min_rating_pct(pct);
        }
        if let Some(time) = &self.max_chat_response_time {
            config = config.with_max_chat_response_time(time.clone());
        }
        if let Some(time) = &self.max_phone_response_time {
            config = config.with_max_phone_response_time(time.clone());
        }
        if let Some(ttl) = self.cache_ttl_secs {
            config = config.with_cache_ttl_secs(ttl);
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_sheet_rating(value: &str) -> std::result::Result<(String, f64), String> {
    let (sheet, rating) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SHEET=VALUE, got '{}'", value))?;
    let rating: f64 = rating
        .trim()
        .parse()
        .map_err(|_| format!("invalid rating '{}'", rating))?;
    Ok((sheet.trim().to_string(), rating))
}

/// Logging verbosity
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LogArgs {
    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl LogArgs {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub goals: GoalArgs,

    #[command(flatten)]
    pub log: LogArgs,

    /// Entries per ranking (0 hides rankings)
    #[arg(long = "top", value_name = "N", default_value_t = crate::constants::DEFAULT_RANKING_SIZE)]
    pub top: usize,

    /// Also show the per-queue breakdown
    #[arg(long = "detail")]
    pub detail: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    pub view: ShowArgs,

    /// Seconds between refreshes (default: the cache TTL)
    #[arg(long = "interval", value_name = "SECONDS")]
    pub interval_secs: Option<u64>,
}

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One CSV file per sheet and table
    Csv,
    /// One JSON report per sheet
    Json,
    /// One Parquet file per sheet and table
    Parquet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub goals: GoalArgs,

    #[command(flatten)]
    pub log: LogArgs,

    /// Output directory, created if missing
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Overwrite existing files
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct InitConfigArgs {
    /// Where to write (default: <user config dir>/support-goals/goals.json)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long = "force")]
    pub force: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl SourceArgs {
    /// CLI source first, then the configured one
    pub fn resolve_source(&self, config: &GoalsConfig) -> Result<PathBuf> {
        self.workbook
            .clone()
            .or_else(|| self.csv_dir.clone())
            .or_else(|| config.source.clone())
            .ok_or_else(|| {
                GoalsError::configuration(
                    "No workbook given: pass --workbook or --csv-dir, or set \"source\" in the config file",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_with_selection() {
        let args = Args::try_parse_from([
            "support-goals",
            "show",
            "--workbook",
            "metas.xlsx",
            "--team",
            "Alpha",
            "--team",
            "Beta",
            "--shift",
            "Manha",
            "-vv",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Show(show)) => {
                assert_eq!(show.source.workbook, Some(PathBuf::from("metas.xlsx")));
                assert_eq!(show.selection.teams, vec!["Alpha", "Beta"]);
                assert_eq!(show.selection.shifts, vec!["Manha"]);
                assert_eq!(show.log.get_log_level(), "debug");
                assert_eq!(show.top, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_workbook_and_csv_dir_conflict() {
        let result = Args::try_parse_from([
            "support-goals",
            "show",
            "--workbook",
            "a.xlsx",
            "--csv-dir",
            "exports",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_log_level() {
        let log = LogArgs {
            verbose: 0,
            quiet: true,
        };
        assert_eq!(log.get_log_level(), "error");
        assert!(!log.show_progress());
    }

    #[test]
    fn test_sheet_rating_parser() {
        assert_eq!(
            parse_sheet_rating("SAC=4.6").unwrap(),
            ("SAC".to_string(), 4.6)
        );
        assert!(parse_sheet_rating("SAC").is_err());
        assert!(parse_sheet_rating("SAC=abc").is_err());
    }

    #[test]
    fn test_goal_overrides_apply() {
        let goals = GoalArgs {
            min_chat_rating: vec![("SAC".to_string(), 4.7)],
            min_rating_pct: Some(0.6),
            max_chat_response_time: Some("00:02:00".to_string()),
            ..GoalArgs::default()
        };
        let config = goals.apply(GoalsConfig::default()).unwrap();

        assert_eq!(config.sheet("SAC").unwrap().min_chat_rating, 4.7);
        assert_eq!(config.min_rating_pct, 0.6);
        assert_eq!(
            config.thresholds_for(&config.sheets[0]).max_chat_response_secs,
            120
        );
    }

    #[test]
    fn test_invalid_override_rejected() {
        let goals = GoalArgs {
            min_rating_pct: Some(2.0),
            ..GoalArgs::default()
        };
        assert!(goals.apply(GoalsConfig::default()).is_err());
    }

    #[test]
    fn test_empty_selection_defaults_to_everything() {
        let default = SelectionFilter::new(["Alpha", "Beta"], ["Manha"]);
        let selection = SelectionArgs {
            teams: vec!["Beta".to_string()],
            ..SelectionArgs::default()
        };

        let filter = selection.filter_for(&default);
        assert_eq!(filter.teams.len(), 1);
        assert!(filter.teams.contains("Beta"));
        assert_eq!(filter.shifts, default.shifts);
        assert!(selection.includes_sheet("SAC"));
    }

    #[test]
    fn test_export_format_default() {
        let args = Args::try_parse_from(["support-goals", "export", "--csv-dir", "in"]).unwrap();
        match args.command {
            Some(Commands::Export(export)) => {
                assert_eq!(export.format, ExportFormat::Csv);
                assert_eq!(export.output_dir, PathBuf::from("."));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
