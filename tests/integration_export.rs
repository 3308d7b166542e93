//! Integration tests for exporting evaluated sheets

use std::fs;
use support_goals::dashboard::SheetView;
use support_goals::export::{ExportOptions, TableFormat, export_sheet};
use support_goals::models::{Cell, RawSheet};
use support_goals::{GoalsConfig, GoalsError, SelectionFilter, SheetNormalizer};

fn support_sheet() -> RawSheet {
    RawSheet::new(
        vec![
            "Nome".to_string(),
            "Equipe".to_string(),
            "Horario".to_string(),
            "qtde_chat_suporte".to_string(),
            "tme_chat_suporte".to_string(),
            "nota_chat".to_string(),
            "%_nota_chat".to_string(),
        ],
        vec![
            vec![
                Cell::from("Ana"),
                Cell::from("Alpha"),
                Cell::from("Manha"),
                Cell::from(12.0),
                Cell::from("00:00:40"),
                Cell::from(4.7),
                Cell::from("55%"),
            ],
            vec![
                Cell::from("Bia"),
                Cell::from("Beta"),
                Cell::from("Tarde"),
                Cell::from(6.0),
                Cell::from("00:01:30"),
                Cell::from(4.1),
                Cell::from("30%"),
            ],
        ],
    )
}

#[test]
fn test_csv_export_writes_goal_and_detail_tables() {
    let config = GoalsConfig::default();
    let sheet = SheetNormalizer::new().normalize("Suporte", &support_sheet(), &config.sheets[0].queues);
    let view = SheetView::new(&sheet, &config.sheets[0], &config);
    let dir = tempfile::tempdir().unwrap();

    let written = export_sheet(&view, &view.default_filter(), &ExportOptions::new(dir.path())).unwrap();

    assert_eq!(
        written,
        vec![
            dir.path().join("suporte_goals.csv"),
            dir.path().join("suporte_detail.csv")
        ]
    );

    let goals = fs::read_to_string(&written[0]).unwrap();
    let mut lines = goals.lines();
    assert!(lines.next().unwrap().starts_with("Name,Team,Shift,Chat,"));
    let ana = lines.next().unwrap();
    assert!(ana.starts_with("Ana,Alpha,Manha,12,"));
    assert!(ana.contains("00:00:40"));
    assert_eq!(goals.lines().count(), 3);

    let detail = fs::read_to_string(&written[1]).unwrap();
    let header = detail.lines().next().unwrap();
    assert!(header.contains("Chat - Suporte"));
    assert!(header.contains("TME - Suporte"));
}

#[test]
fn test_export_refuses_to_overwrite_without_flag() {
    let config = GoalsConfig::default();
    let sheet = SheetNormalizer::new().normalize("Suporte", &support_sheet(), &config.sheets[0].queues);
    let view = SheetView::new(&sheet, &config.sheets[0], &config);
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::new(dir.path());

    export_sheet(&view, &view.default_filter(), &options).unwrap();
    let again = export_sheet(&view, &view.default_filter(), &options);
    assert!(matches!(again, Err(GoalsError::OutputExists { .. })));

    let forced = export_sheet(&view, &view.default_filter(), &options.with_overwrite(true));
    assert_eq!(forced.unwrap().len(), 2);
}

#[test]
fn test_existing_detail_file_blocks_whole_export() {
    let config = GoalsConfig::default();
    let sheet = SheetNormalizer::new().normalize("Suporte", &support_sheet(), &config.sheets[0].queues);
    let view = SheetView::new(&sheet, &config.sheets[0], &config);
    let dir = tempfile::tempdir().unwrap();
    let detail = dir.path().join("suporte_detail.csv");
    fs::write(&detail, "old").unwrap();

    let result = export_sheet(&view, &view.default_filter(), &ExportOptions::new(dir.path()));

    assert!(matches!(result, Err(GoalsError::OutputExists { .. })));
    assert!(!dir.path().join("suporte_goals.csv").exists());
    assert_eq!(fs::read_to_string(&detail).unwrap(), "old");
}

#[test]
fn test_json_export_contains_report() {
    let config = GoalsConfig::default();
    let sheet = SheetNormalizer::new().normalize("Suporte", &support_sheet(), &config.sheets[0].queues);
    let view = SheetView::new(&sheet, &config.sheets[0], &config);
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::new(dir.path()).with_table_format(None);

    let written = export_sheet(&view, &view.default_filter(), &options).unwrap();
    assert_eq!(written, vec![dir.path().join("suporte.json")]);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(report["sheet"], "Suporte");
    assert_eq!(report["summary"]["agents"], 2);
    assert_eq!(report["evaluation"]["records"].as_array().unwrap().len(), 2);
    assert_eq!(report["rules"].as_array().unwrap().len(), 5);
}

#[test]
fn test_empty_selection_exports_nothing() {
    let config = GoalsConfig::default();
    let sheet = SheetNormalizer::new().normalize("Suporte", &support_sheet(), &config.sheets[0].queues);
    let view = SheetView::new(&sheet, &config.sheets[0], &config);
    let dir = tempfile::tempdir().unwrap();
    let nobody = SelectionFilter::new(["Alpha"], ["Noite"]);

    let written = export_sheet(
        &view,
        &nobody,
        &ExportOptions::new(dir.path()).with_table_format(Some(TableFormat::Parquet)),
    )
    .unwrap();

    assert!(written.is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
