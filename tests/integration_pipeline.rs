//! End-to-end tests: CSV exports on disk through loading, normalization
//! and goal evaluation

use std::fs;
use std::path::Path;
use support_goals::dashboard::SheetView;
use support_goals::loader::{open_source, require_sheets};
use support_goals::models::{Cell, RawSheet};
use support_goals::{
    EvaluationOutcome, GoalStatus, GoalsConfig, GoalsError, NormalizedSheet, SelectionFilter,
    SheetNormalizer, SnapshotCache, Workbook, load_sheets,
};
use tempfile::TempDir;

const SUPPORT_CSV: &str = "\
Nome,Equipe,Cargo,Matricula,Horario,qtde_chat_suporte,qtde_chat_incidentes,tme_chat_suporte,tme_chat_incidentes,nota_chat,%_nota_chat,total_pbx,nota_pbx,tme_pbx,qtde_pbx_r,qtde_pbx_e
Ana,Alpha,N1,1,Manha,10,5,00:01:00,00:00:30,9.2,60%,8,4.8,00:00:08,6,2
Bia,Alpha,N1,2,Tarde,4,1,00:02:00,-,4.4,\"0,4\",2,4.2,00:00:12,2,0
Caio,Beta,N2,3,Manha,20,10,,,4.9,0.8,0,,-,,
";

const CUSTOMER_SERVICE_CSV: &str = "\
Colaborador,Time,Turno,qtde_chat_total,qtde_chat_relacionamento,qtde_chat_bloqueios,tme_chat,nota_chat,%_nota_chat,total_pbx,tme_pbx
Duda,Gamma,Noite,12,7,5,00:00:50,4.6,0.55,3,00:00:09
Eva,Gamma,Noite,8,8,0,00:01:10,4.5,0.7,3,00:00:10
";

fn write_sheets(dir: &Path, sheets: &[(&str, &str)]) {
    for (name, contents) in sheets {
        fs::write(dir.join(format!("{}.csv", name)), contents).unwrap();
    }
}

fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(
        dir.path(),
        &[("Suporte", SUPPORT_CSV), ("SAC", CUSTOMER_SERVICE_CSV)],
    );
    dir
}

fn load(dir: &Path) -> Vec<NormalizedSheet> {
    let source = open_source(dir).unwrap();
    load_sheets(source.as_ref(), &GoalsConfig::default(), &SheetNormalizer::new()).unwrap()
}

#[test]
fn test_csv_directory_normalizes_both_sheets() {
    let dir = fixture_dir();
    let sheets = load(dir.path());

    assert_eq!(sheets.len(), 2);
    let support = &sheets[0];
    assert_eq!(support.name, "Suporte");
    assert_eq!(support.records.len(), 3);

    let ana = &support.records[0];
    assert_eq!((ana.name.as_str(), ana.team.as_str(), ana.shift.as_str()), ("Ana", "Alpha", "Manha"));
    // No qtde_chat_total: queue volumes are summed
    assert_eq!(ana.chat_volume, 15);
    // No tme_chat: queue times are averaged
    assert_eq!(ana.chat_response_time_secs, 45);
    // 0-10 scale detected and rescaled
    assert!((ana.chat_rating - 0.92).abs() < 1e-9);
    assert_eq!(ana.chat_rating_pct, 0.6);
    assert_eq!(ana.phone_volume, 8);
    assert_eq!(ana.phone_response_time_secs, 8);
    assert_eq!((ana.phone_received, ana.phone_made), (6, 2));

    let bia = &support.records[1];
    assert_eq!(bia.chat_rating_pct, 0.4);
    assert_eq!(bia.chat_response_time_secs, 60);
    assert_eq!(bia.queue_response_time_secs.get("incidentes"), Some(&0));

    let caio = &support.records[2];
    assert_eq!(caio.chat_volume, 30);
    assert_eq!(caio.chat_response_time_secs, 0);
    assert_eq!(caio.phone_rating, 0.0);
    assert_eq!(caio.phone_received, 0);

    let slugs: Vec<&str> = support.queues.iter().map(|q| q.slug.as_str()).collect();
    assert_eq!(slugs, vec!["suporte", "incidentes"]);

    let sac = &sheets[1];
    assert_eq!(sac.records[0].name, "Duda");
    assert_eq!(sac.records[0].team, "Gamma");
    assert_eq!(sac.records[0].chat_volume, 12);
    // Numeric percentages pass through unchanged
    assert_eq!(sac.records[0].chat_rating_pct, 0.55);
}

#[test]
fn test_goal_statuses_over_full_selection() {
    let dir = fixture_dir();
    let sheets = load(dir.path());
    let config = GoalsConfig::default();
    let view = SheetView::new(&sheets[0], &config.sheets[0], &config);

    let outcome = view.evaluate(&view.default_filter());
    let evaluation = outcome.evaluation().unwrap();
    let average = evaluation.averages.chat_volume.unwrap();
    assert!((average - 50.0 / 3.0).abs() < 1e-9);

    let ana = &evaluation.records[0].statuses;
    assert_eq!(ana.chat_volume, GoalStatus::Fails);
    assert_eq!(ana.chat_rating, GoalStatus::Fails);
    assert_eq!(ana.chat_rating_pct, GoalStatus::Meets);
    assert_eq!(ana.chat_response_time, GoalStatus::Meets);
    assert_eq!(ana.phone_volume, GoalStatus::Meets);
    assert_eq!(ana.phone_response_time, GoalStatus::Meets);

    let bia = &evaluation.records[1].statuses;
    // Exactly at the maximum
    assert_eq!(bia.chat_response_time, GoalStatus::Meets);
    assert_eq!(bia.phone_response_time, GoalStatus::Fails);

    let caio = &evaluation.records[2].statuses;
    assert_eq!(caio.chat_volume, GoalStatus::Meets);
    assert_eq!(caio.chat_response_time, GoalStatus::NotApplicable);
    assert_eq!(caio.phone_response_time, GoalStatus::NotApplicable);
}

#[test]
fn test_selection_recomputes_volume_average() {
    let dir = fixture_dir();
    let sheets = load(dir.path());
    let config = GoalsConfig::default();
    let view = SheetView::new(&sheets[0], &config.sheets[0], &config);

    let alpha = SelectionFilter::new(["Alpha"], view.distinct_shifts());
    let outcome = view.evaluate(&alpha);
    let evaluation = outcome.evaluation().unwrap();

    assert_eq!(evaluation.records.len(), 2);
    assert_eq!(evaluation.averages.chat_volume, Some(10.0));
    // 15 fails against the whole sheet but meets within its own team
    assert_eq!(evaluation.records[0].statuses.chat_volume, GoalStatus::Meets);
    assert_eq!(evaluation.records[1].statuses.chat_volume, GoalStatus::Fails);
}

#[test]
fn test_customer_service_goals_are_inclusive() {
    let dir = fixture_dir();
    let sheets = load(dir.path());
    let config = GoalsConfig::default();
    let view = SheetView::new(&sheets[1], &config.sheets[1], &config);

    let outcome = view.evaluate(&view.default_filter());
    let evaluation = outcome.evaluation().unwrap();
    let duda = &evaluation.records[0].statuses;
    let eva = &evaluation.records[1].statuses;

    assert_eq!(duda.chat_rating, GoalStatus::Meets);
    assert_eq!(eva.chat_rating, GoalStatus::Fails);
    assert_eq!(eva.chat_response_time, GoalStatus::Fails);
    // Both exactly at the phone average of 3
    assert_eq!(duda.phone_volume, GoalStatus::Meets);
    assert_eq!(eva.phone_volume, GoalStatus::Meets);
    // 10 seconds against a 10 second maximum
    assert_eq!(eva.phone_response_time, GoalStatus::Meets);
}

#[test]
fn test_empty_selection_is_a_state() {
    let dir = fixture_dir();
    let sheets = load(dir.path());
    let config = GoalsConfig::default();
    let view = SheetView::new(&sheets[0], &config.sheets[0], &config);

    let nobody = SelectionFilter::new(["Omega"], view.distinct_shifts());
    let outcome = view.evaluate(&nobody);

    assert_eq!(outcome, EvaluationOutcome::NoDataForSelection);
    assert!(outcome.evaluation().is_none());
}

#[test]
fn test_missing_required_sheet_fails_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(dir.path(), &[("Suporte", SUPPORT_CSV), ("Vendas", CUSTOMER_SERVICE_CSV)]);

    let source = open_source(dir.path()).unwrap();
    let result = load_sheets(source.as_ref(), &GoalsConfig::default(), &SheetNormalizer::new());

    match result {
        Err(GoalsError::MissingSheets { missing }) => assert_eq!(missing, vec!["SAC"]),
        other => panic!("expected a missing sheet error, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn test_neither_required_sheet_present() {
    let sheet = RawSheet::new(vec!["nome".to_string()], vec![vec![Cell::from("Ana")]]);
    let workbook = Workbook::new()
        .with_sheet("Suporte N1", sheet.clone())
        .with_sheet("Atendimento", sheet);

    let err = require_sheets(&workbook, &["Suporte", "SAC"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Required sheet(s) not found in workbook: Suporte, SAC"
    );

    let cache = SnapshotCache::new(Box::new(workbook), GoalsConfig::default());
    assert!(cache.get().is_err());
    assert_eq!(cache.loads(), 0);
}

#[test]
fn test_cache_serves_snapshot_until_invalidated() {
    let dir = fixture_dir();
    let source = open_source(dir.path()).unwrap();
    let cache = SnapshotCache::new(source, GoalsConfig::default());

    let first = cache.get().unwrap();
    assert_eq!(first.sheet("SAC").unwrap().records.len(), 2);

    // Edited on disk, but the snapshot is still fresh
    fs::write(
        dir.path().join("SAC.csv"),
        "Colaborador,qtde_chat_total\nDuda,1\nEva,2\nFabi,3\n",
    )
    .unwrap();
    assert_eq!(cache.get().unwrap().sheet("SAC").unwrap().records.len(), 2);
    assert_eq!(cache.loads(), 1);

    cache.invalidate();
    let reloaded = cache.get().unwrap();
    assert_eq!(reloaded.sheet("SAC").unwrap().records.len(), 3);
    assert_eq!(cache.loads(), 2);
    // The earlier snapshot is untouched
    assert_eq!(first.sheet("SAC").unwrap().records.len(), 2);
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = fixture_dir();
    let config_path = dir.path().join("goals.json");
    fs::write(
        &config_path,
        r#"{
            "min_rating_pct": 0.65,
            "max_chat_response_time": "00:00:40",
            "sheets": [
                { "name": "Suporte", "min_chat_rating": 0.9 },
                { "name": "SAC", "min_chat_rating": 4.55 }
            ]
        }"#,
    )
    .unwrap();

    let config = GoalsConfig::load(Some(&config_path)).unwrap();
    let sheets = load_sheets(
        open_source(dir.path()).unwrap().as_ref(),
        &config,
        &SheetNormalizer::new(),
    )
    .unwrap();
    let view = SheetView::new(&sheets[0], &config.sheets[0], &config);
    let outcome = view.evaluate(&view.default_filter());
    let ana = &outcome.evaluation().unwrap().records[0].statuses;

    assert_eq!(ana.chat_rating, GoalStatus::Meets);
    assert_eq!(ana.chat_rating_pct, GoalStatus::Fails);
    assert_eq!(ana.chat_response_time, GoalStatus::Fails);
}

#[test]
fn test_csv_plain_percentages_are_taken_as_numbers() {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(
        dir.path(),
        &[
            ("Suporte", "nome,%_nota_chat\nAna,55\nBia,70\n"),
            ("SAC", "nome,%_nota_chat\nDuda,55%\nEva,70\n"),
        ],
    );
    let sheets = load(dir.path());

    // An all-numeric column is inferred as numbers and not rescaled
    assert_eq!(sheets[0].records[0].chat_rating_pct, 55.0);
    // One `%` value makes the whole column text
    assert_eq!(sheets[1].records[0].chat_rating_pct, 0.55);
    assert_eq!(sheets[1].records[1].chat_rating_pct, 0.7);
}
