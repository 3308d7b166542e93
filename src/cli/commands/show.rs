//! Show command: load once, render every selected sheet

use super::shared::{
    CommandStats, build_cache, check_selection, fetch_snapshot, load_configuration, setup_logging,
};
use crate::cache::{Snapshot, SnapshotCache};
use crate::cli::args::ShowArgs;
use crate::dashboard::{SheetReport, sheet_views};
use crate::render::{render_detail, render_no_data, render_report, render_status};
use anyhow::Result;
use tracing::info;

pub async fn run_show(args: ShowArgs) -> Result<CommandStats> {
    setup_logging(&args.log)?;
    info!("Starting support goals dashboard");

    let config = load_configuration(&args.source, &args.goals)?;
    check_selection(&args.selection, &config)?;
    let cache = build_cache(&args.source, config)?;

    let snapshot = fetch_snapshot(&cache, args.log.show_progress())?;
    Ok(render_snapshot(&cache, &snapshot, &args))
}

/// Render every selected sheet of `snapshot`
pub fn render_snapshot(cache: &SnapshotCache, snapshot: &Snapshot, args: &ShowArgs) -> CommandStats {
    let mut stats = CommandStats {
        fetches: cache.loads(),
        ..CommandStats::default()
    };

    for view in sheet_views(snapshot, cache.config()) {
        if !args.selection.includes_sheet(view.name()) {
            continue;
        }

        let filter = args.selection.filter_for(&view.default_filter());
        match SheetReport::build(&view, &filter, args.top) {
            None => render_no_data(view.name()),
            Some(report) => {
                render_report(&report, args.top);
                if args.detail {
                    render_detail(&report, &view.detail_queues());
                }
                stats.sheets_reported += 1;
                stats.records_evaluated += report.evaluation.records.len();
            }
        }
    }

    render_status(
        &cache.source_description(),
        &snapshot.loaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        cache.loads(),
    );
    stats
}
