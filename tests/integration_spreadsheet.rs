//! Integration tests for reading an xlsx workbook through calamine

use std::path::PathBuf;
use support_goals::loader::open_source;
use support_goals::models::Cell;
use support_goals::{GoalsConfig, SheetNormalizer, WorkbookSource, load_sheets};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/goals_workbook.xlsx")
}

#[test]
fn test_xlsx_fetch_reads_every_sheet() {
    let source = open_source(&fixture()).unwrap();
    assert!(source.describe().starts_with("spreadsheet"));

    let workbook = source.fetch().unwrap();
    let mut names = workbook.sheet_names();
    names.sort();
    assert_eq!(names, vec!["SAC", "Suporte"]);

    let support = workbook.sheet("Suporte").unwrap();
    assert_eq!(support.columns[0], "nome");
    assert_eq!(support.columns[6], "%_nota_chat");
    assert_eq!(support.row_count(), 2);
    assert_eq!(support.cell(0, 0), &Cell::from("Ana"));
    // Time-formatted serial arrives as a time of day, not a number
    assert!(matches!(support.cell(0, 4), Cell::Time(_)));
}

#[test]
fn test_xlsx_pipeline_decodes_metrics() {
    let source = open_source(&fixture()).unwrap();
    let sheets = load_sheets(source.as_ref(), &GoalsConfig::default(), &SheetNormalizer::new()).unwrap();

    let support = &sheets[0];
    assert_eq!(support.name, "Suporte");
    let ana = &support.records[0];
    assert_eq!((ana.team.as_str(), ana.shift.as_str()), ("Alpha", "Manha"));
    assert_eq!(ana.chat_volume, 12);
    assert_eq!(ana.chat_response_time_secs, 60);
    assert_eq!(ana.chat_rating, 4.7);
    assert_eq!(ana.chat_rating_pct, 0.55);

    let bia = &support.records[1];
    assert_eq!(bia.chat_response_time_secs, 30);
    assert!((bia.chat_rating - 0.9).abs() < 1e-9);
    assert_eq!(bia.chat_rating_pct, 0.4);

    let sac = &sheets[1];
    assert_eq!(sac.records[0].name, "Duda");
    assert_eq!(sac.records[0].team, "Geral");
    assert_eq!(sac.records[0].chat_volume, 3);
}
