//! Terminal rendering of sheet reports
//!
//! Goal cells are painted green when the goal is met, red when it is not,
//! and left plain when the goal does not apply.

use crate::codec::format_seconds_to_time;
use crate::dashboard::{
    RankEntry, SheetReport, format_percent, format_rating, format_volume, status_values,
};
use crate::evaluator::GoalStatus;
use crate::models::QueueDefinition;
use colored::*;

/// One table cell: display text plus the goal status that colors it
struct TableCell {
    text: String,
    status: Option<GoalStatus>,
}

impl TableCell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: None,
        }
    }

    fn goal(text: impl Into<String>, status: GoalStatus) -> Self {
        Self {
            text: text.into(),
            status: Some(status),
        }
    }

    fn paint(&self, width: usize) -> String {
        let padded = format!("{:<width$}", self.text, width = width);
        match self.status {
            Some(GoalStatus::Meets) => padded.green().to_string(),
            Some(GoalStatus::Fails) => padded.red().to_string(),
            Some(GoalStatus::NotApplicable) | None => padded,
        }
    }
}

/// Render the overview, rankings, rules and goal table of one sheet
pub fn render_report(report: &SheetReport, ranking_size: usize) {
    println!();
    println!("{}", format!("━━ {} ━━", report.sheet).bright_cyan().bold());
    println!();

    let summary = &report.summary;
    println!("{}", "Overview".bright_white().bold());
    println!(
        "  Chat contacts: {}   Mean chat rating: {}",
        format_volume(summary.total_chat_volume).bright_white(),
        optional_rating(summary.mean_chat_rating).bright_white()
    );
    println!(
        "  Phone contacts: {}   Mean phone rating: {}",
        format_volume(summary.total_phone_volume).bright_white(),
        optional_rating(summary.mean_phone_rating).bright_white()
    );
    println!(
        "  Agents: {}   Goals met: {}/{}",
        summary.agents, summary.goals_met, summary.goals_applicable
    );

    if ranking_size > 0 {
        println!();
        let rankings = &report.rankings;
        render_ranking(&format!("Top {} chat rating", ranking_size), &rankings.chat_rating, format_rating);
        render_ranking(&format!("Top {} phone rating", ranking_size), &rankings.phone_rating, format_rating);
        render_ranking(&format!("Top {} chat volume", ranking_size), &rankings.chat_volume, |v| {
            format!("{:.0}", v)
        });
        render_ranking(&format!("Top {} phone volume", ranking_size), &rankings.phone_volume, |v| {
            format!("{:.0}", v)
        });
    }

    println!();
    println!("{}", "Active rules".bright_white().bold());
    for rule in &report.rules {
        println!("  - {}", rule);
    }

    println!();
    render_goal_table(report);
}

fn optional_rating(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_rating)
}

fn render_ranking(title: &str, entries: &[RankEntry], format: impl Fn(f64) -> String) {
    println!("{}", title.bright_yellow());
    if entries.is_empty() {
        println!("  {}", "(no data)".bright_black());
        return;
    }
    let width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    for (position, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {}",
            position + 1,
            entry.name,
            format(entry.value),
            width = width
        );
    }
}

fn render_goal_table(report: &SheetReport) {
    let headers = [
        "Name", "Team", "Shift", "Chat", "Chat rating", "Rating %", "Chat TME", "Phone",
        "Phone rating", "Phone TME",
    ];

    let rows: Vec<Vec<TableCell>> = report
        .evaluation
        .records
        .iter()
        .map(|evaluated| {
            let r = &evaluated.record;
            let [chat_volume, chat_rating, rating_pct, chat_tme, phone_volume, phone_rating, phone_tme] =
                status_values(&evaluated.statuses);
            vec![
                TableCell::plain(r.name.clone()),
                TableCell::plain(r.team.clone()),
                TableCell::plain(r.shift.clone()),
                TableCell::goal(format_volume(r.chat_volume), chat_volume),
                TableCell::goal(format_rating(r.chat_rating), chat_rating),
                TableCell::goal(format_percent(r.chat_rating_pct), rating_pct),
                TableCell::goal(format_seconds_to_time(r.chat_response_time_secs), chat_tme),
                TableCell::goal(format_volume(r.phone_volume), phone_volume),
                TableCell::goal(format_rating(r.phone_rating), phone_rating),
                TableCell::goal(format_seconds_to_time(r.phone_response_time_secs), phone_tme),
            ]
        })
        .collect();

    render_table(&headers, &rows);
}

/// Per-queue breakdown of the selected records
pub fn render_detail(report: &SheetReport, queues: &[QueueDefinition]) {
    let mut headers: Vec<String> = vec!["Name".into(), "Team".into(), "Shift".into()];
    headers.extend(queues.iter().map(|q| format!("Chat {}", q.label)));
    headers.push("Chat total".into());
    headers.extend(queues.iter().map(|q| format!("TME {}", q.label)));
    headers.extend(
        ["TME mean", "Received", "Made", "Phone total", "Phone TME"]
            .iter()
            .map(|h| h.to_string()),
    );

    let rows: Vec<Vec<TableCell>> = report
        .evaluation
        .records
        .iter()
        .map(|evaluated| {
            let r = &evaluated.record;
            let mut cells = vec![
                TableCell::plain(r.name.clone()),
                TableCell::plain(r.team.clone()),
                TableCell::plain(r.shift.clone()),
            ];
            cells.extend(queues.iter().map(|q| {
                TableCell::plain(format_volume(r.queue_volume.get(&q.slug).copied().unwrap_or(0)))
            }));
            cells.push(TableCell::plain(format_volume(r.chat_volume)));
            cells.extend(queues.iter().map(|q| {
                TableCell::plain(format_seconds_to_time(
                    r.queue_response_time_secs.get(&q.slug).copied().unwrap_or(0),
                ))
            }));
            cells.extend([
                TableCell::plain(format_seconds_to_time(r.chat_response_time_secs)),
                TableCell::plain(format_volume(r.phone_received)),
                TableCell::plain(format_volume(r.phone_made)),
                TableCell::plain(format_volume(r.phone_volume)),
                TableCell::plain(format_seconds_to_time(r.phone_response_time_secs)),
            ]);
            cells
        })
        .collect();

    println!();
    println!("{}", "Per-queue detail".bright_white().bold());
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    render_table(&headers, &rows);
}

fn render_table(headers: &[&str], rows: &[Vec<TableCell>]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.text.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{:<width$}", header, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.bold());

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| cell.paint(*width))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
}

/// Shown instead of a report when the selection matches nobody
pub fn render_no_data(sheet: &str) {
    println!();
    println!("{}", format!("━━ {} ━━", sheet).bright_cyan().bold());
    println!("{}", "No data for the selected filters.".yellow());
}

/// Status line shown under each refresh
pub fn render_status(source: &str, loaded_at: &str, loads: usize) {
    println!();
    println!(
        "{}",
        format!("Source: {} | loaded at {} | fetches: {}", source, loaded_at, loads).bright_black()
    );
}
