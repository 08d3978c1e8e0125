//! Integration tests: CSV file on disk → pipeline → views and reports.

use bandscope_core::{AppConfig, Field, IssueKind};
use bandscope_runner::{
    category_view, load_config, process_file, render, stock_view, ReportFormat, ReportSummary,
    RunError, TraceRole,
};
use std::io::Write;
use std::path::PathBuf;

fn core_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../bandscope-core/tests/fixtures")
        .join(name)
}

fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn aapl_band_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "aapl.csv",
        "Year,Symbol,Cheap,Fair,Expensive,Close\n2023,AAPL,120.50,150.00,180.25,145.30\n",
    );

    let outcome = process_file(&path, &AppConfig::default()).unwrap();
    assert_eq!(outcome.source.as_deref(), Some(path.as_path()));
    assert!(outcome.report.is_empty());

    let table = outcome.table.as_ref().unwrap();
    let records = table.filter_by_symbol("AAPL").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cheap, Some(120.50));
    assert_eq!(records[0].fair, Some(150.00));
    assert_eq!(records[0].expensive, Some(180.25));
    assert_eq!(records[0].close, Some(145.30));

    let view = stock_view(table, "AAPL", None).unwrap();
    let close = view.chart.trace(TraceRole::Close).unwrap();
    assert_eq!(close.points.len(), 1);
    assert_eq!(close.points[0].x, 2023.0);
    assert!(view.gauge.is_some());
}

#[test]
fn chinese_fixture_category_chart() {
    let outcome = process_file(&core_fixture("valuations_zh.csv"), &AppConfig::default()).unwrap();
    let table = outcome.table.as_ref().unwrap();
    let categories: Vec<String> = table.list_categories().into_iter().collect();
    assert_eq!(categories.len(), 3);

    let view = category_view(table, "半導體", None).unwrap();
    assert_eq!(view.year, Some(2024));
    assert_eq!(view.chart.x_axis.ticks[0].1, "2330");
    let close = view.chart.trace(TraceRole::Close).unwrap();
    assert!(close.points[0].label.contains("2024-12-31"));
}

#[test]
fn mixed_language_headers_match_english() {
    let dir = tempfile::tempdir().unwrap();
    let english = write_csv(
        &dir,
        "en.csv",
        "Year,Symbol,Cheap,Fair,Expensive,Close\n2023,AAPL,1,2,3,2\n",
    );
    let mixed = write_csv(
        &dir,
        "mixed.csv",
        "年度,Symbol,便宜價,Fair,昂貴價,收盤價\n2023,AAPL,1,2,3,2\n",
    );
    let config = AppConfig::default();
    let a = process_file(&english, &config).unwrap();
    let b = process_file(&mixed, &config).unwrap();

    for field in Field::ALL {
        assert_eq!(a.mapping.index(field), b.mapping.index(field), "{field}");
    }
    assert_eq!(a.report, b.report);
    assert_eq!(
        a.table.unwrap().records(),
        b.table.unwrap().records()
    );
}

#[test]
fn blocked_load_still_reports() {
    let outcome =
        process_file(&core_fixture("missing_columns.csv"), &AppConfig::default()).unwrap();
    assert!(outcome.table.is_none());

    let summary = ReportSummary::from_outcome(&outcome);
    assert!(!summary.valid);
    assert_eq!(summary.error_count, 5);

    let json = render(&summary, ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["issues"][0]["kind"], "MissingColumn");
    assert_eq!(value["issues"][0]["field"], "Year");
}

#[test]
fn messy_fixture_skips_are_reported() {
    let outcome = process_file(&core_fixture("messy.csv"), &AppConfig::default()).unwrap();
    assert!(outcome.is_loaded());
    assert_eq!(outcome.report.of_kind(IssueKind::DuplicateKey).count(), 1);

    let text = render(&ReportSummary::from_outcome(&outcome), ReportFormat::Text).unwrap();
    assert!(text.contains("1 cells could not be read"));
    assert!(text.contains("row 1: Close value 'N/A' is not valid"));
}

#[test]
fn config_file_changes_validation() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_csv(
        &dir,
        "bandscope.toml",
        "[validation]\ncheck_valuation_order = false\n",
    );
    let (config, _) = load_config(Some(&config_path), None).unwrap();

    let outcome = process_file(&core_fixture("messy.csv"), &config).unwrap();
    assert_eq!(outcome.report.of_kind(IssueKind::ValuationOrder).count(), 0);
}

#[test]
fn unreadable_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = process_file(&dir.path().join("missing.csv"), &AppConfig::default()).unwrap_err();
    assert!(matches!(err, RunError::Load(_)));
}
