//! Export command: write the goal and detail tables, or JSON reports

use super::shared::{
    CommandStats, build_cache, check_selection, fetch_snapshot, load_configuration, setup_logging,
};
use crate::cli::args::{ExportArgs, ExportFormat};
use crate::dashboard::sheet_views;
use crate::export::{ExportOptions, TableFormat, export_sheet};
use anyhow::{Context, Result};
use colored::*;
use tracing::info;

pub async fn run_export(args: ExportArgs) -> Result<CommandStats> {
    setup_logging(&args.log)?;

    let config = load_configuration(&args.source, &args.goals)?;
    check_selection(&args.selection, &config)?;
    let cache = build_cache(&args.source, config)?;
    let snapshot = fetch_snapshot(&cache, args.log.show_progress())?;

    let table_format = match args.format {
        ExportFormat::Csv => Some(TableFormat::Csv),
        ExportFormat::Parquet => Some(TableFormat::Parquet),
        ExportFormat::Json => None,
    };
    let options = ExportOptions::new(&args.output_dir)
        .with_table_format(table_format)
        .with_overwrite(args.force);
    info!(
        "Exporting as {} to {}",
        args.format.extension(),
        options.output_dir.display()
    );

    let mut stats = CommandStats {
        fetches: cache.loads(),
        ..CommandStats::default()
    };

    for view in sheet_views(&snapshot, cache.config()) {
        if !args.selection.includes_sheet(view.name()) {
            continue;
        }
        let filter = args.selection.filter_for(&view.default_filter());
        let written = export_sheet(&view, &filter, &options)
            .with_context(|| format!("Failed to export sheet '{}'", view.name()))?;

        if written.is_empty() {
            if !args.log.quiet {
                println!("{} {}: no data for the selected filters", "skipped".yellow(), view.name());
            }
            continue;
        }

        stats.sheets_reported += 1;
        if !args.log.quiet {
            for path in &written {
                println!("{} {}", "wrote".green(), path.display());
            }
        }
        stats.files_written.extend(written);
    }

    Ok(stats)
}
