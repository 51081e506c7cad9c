//! Integration tests for the summary workbook layout
//!
//! Each test writes a real workbook into a temporary directory and reads it
//! back with calamine to check what a reviewer would see.

use std::path::{Path, PathBuf};

use bdsummary_core::{ColumnSchema, Phase, ReportConfig, ReportError, RowRecord};
use bdsummary_render::{SummaryReport, FIRST_DATA_ROW, HEADER_ROW, SHEET_NAME};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

fn finding(app: &str, component: &str, vuln: &str, fix: &str) -> RowRecord {
    RowRecord::new(app, component, vuln)
        .security_risk("High")
        .recommended_fix(fix)
        .match_type("Exact")
}

/// Initialize, populate every record, save
fn build_report(dir: &Path, records: &[RowRecord]) -> PathBuf {
    let mut report = SummaryReport::new(ReportConfig::new(dir));
    report.initialize().unwrap();
    for record in records {
        report.populate_row(record).unwrap();
    }
    report.save_report_at(timestamp()).unwrap()
}

fn read_sheet(path: &Path) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
    workbook.worksheet_range(SHEET_NAME).unwrap()
}

/// Text at a 1-based sheet position, empty for blank or missing cells
fn text_at(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row - 1, col - 1)) {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// =============================================================================
// Header Block
// =============================================================================

#[test]
fn header_block_has_titles_and_legends() {
    let dir = tempdir().unwrap();
    let sheet = read_sheet(&build_report(dir.path(), &[]));

    assert_eq!(text_at(&sheet, 1, 1), "Product Name");
    assert_eq!(text_at(&sheet, 2, 1), "Version Number");
    assert_eq!(text_at(&sheet, 3, 1), "Product Iteration (PI) or Date");
    assert_eq!(text_at(&sheet, 4, 1), "To be filled out before the review");
    assert_eq!(text_at(&sheet, 5, 1), "To be filled out during the review");
}

#[test]
fn header_row_matches_schema_order() {
    let dir = tempdir().unwrap();
    let records = vec![finding("X", "Y", "CVE-1", "1.0"); 3];
    let sheet = read_sheet(&build_report(dir.path(), &records));

    let header: Vec<String> = (1..=11).map(|col| text_at(&sheet, HEADER_ROW, col)).collect();
    let expected: Vec<String> = ColumnSchema::blackduck()
        .entries()
        .map(|(_, label)| label.to_string())
        .collect();
    assert_eq!(header, expected);
}

// =============================================================================
// Data Rows
// =============================================================================

#[test]
fn empty_report_has_no_data_rows() {
    let dir = tempdir().unwrap();
    let sheet = read_sheet(&build_report(dir.path(), &[]));

    for col in 1..=11 {
        assert_eq!(text_at(&sheet, FIRST_DATA_ROW, col), "");
    }
}

#[test]
fn rows_are_written_in_call_order_without_gaps() {
    let dir = tempdir().unwrap();
    let records: Vec<RowRecord> = (0..5)
        .map(|i| finding(&format!("app-{i}"), "comp", &format!("CVE-{i}"), "1.0"))
        .collect();
    let sheet = read_sheet(&build_report(dir.path(), &records));

    for (i, record) in records.iter().enumerate() {
        let row = FIRST_DATA_ROW + i as u32;
        assert_eq!(text_at(&sheet, row, 1), record.application_name);
        assert_eq!(text_at(&sheet, row, 4), record.vulnerability_id);
    }
    assert_eq!(text_at(&sheet, FIRST_DATA_ROW + 5, 1), "");
}

#[test]
fn missing_fix_row_is_still_written_in_full() {
    let dir = tempdir().unwrap();
    let records = vec![
        finding("X", "Y", "CVE-1", ""),
        finding("X", "Z", "CVE-2", "3.4.5"),
    ];
    let sheet = read_sheet(&build_report(dir.path(), &records));

    let row8: Vec<String> = (1..=7).map(|col| text_at(&sheet, 8, col)).collect();
    assert_eq!(row8, vec!["X", "Y", "High", "CVE-1", "", "", "Exact"]);

    let row9: Vec<String> = (1..=7).map(|col| text_at(&sheet, 9, col)).collect();
    assert_eq!(row9, vec!["X", "Z", "High", "CVE-2", "3.4.5", "", "Exact"]);
}

#[test]
fn recommended_fix_is_written_verbatim() {
    let dir = tempdir().unwrap();
    let fix = "Upgrade to 2.17.1 (or 2.12.4 for Java 7) & restart";
    let sheet = read_sheet(&build_report(dir.path(), &[finding("A", "B", "C", fix)]));

    assert_eq!(text_at(&sheet, FIRST_DATA_ROW, 5), fix);
}

#[test]
fn reserved_column_is_never_written() {
    let dir = tempdir().unwrap();
    let records = vec![
        finding("A", "B", "CVE-1", "1.0"),
        finding("A", "B", "CVE-2", ""),
        RowRecord::new("A", "B", "CVE-3"),
    ];
    let sheet = read_sheet(&build_report(dir.path(), &records));

    for row in FIRST_DATA_ROW..FIRST_DATA_ROW + 3 {
        assert_eq!(text_at(&sheet, row, 6), "", "row {row} column 6");
        for col in 8..=11 {
            assert_eq!(text_at(&sheet, row, col), "", "row {row} column {col}");
        }
    }
}

// =============================================================================
// Saving
// =============================================================================

#[test]
fn report_file_is_timestamped_in_output_dir() {
    let dir = tempdir().unwrap();
    let path = build_report(dir.path(), &[finding("X", "Y", "CVE-1", "1.0")]);

    assert_eq!(path, dir.path().join("blackduck-summary-2026-10-19-091500.xlsx"));
    let bytes = std::fs::read(&path).unwrap();
    // XLSX files start with PK (ZIP header)
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn unwritable_output_dir_is_fatal_and_leaves_no_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let mut report = SummaryReport::new(ReportConfig::new(&missing));
    report.initialize().unwrap();
    report.populate_row(&finding("X", "Y", "CVE-1", "")).unwrap();

    let err = report.save_report_at(timestamp()).unwrap_err();
    assert!(matches!(err, ReportError::Io(_)));
    assert!(!missing.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn nothing_runs_after_save() {
    let dir = tempdir().unwrap();
    let mut report = SummaryReport::new(ReportConfig::new(dir.path()));
    report.initialize().unwrap();
    report.save_report_at(timestamp()).unwrap();
    assert_eq!(report.phase(), Phase::Finalized);

    assert!(matches!(
        report.populate_row(&finding("X", "Y", "CVE-1", "1.0")),
        Err(ReportError::Sequence {
            phase: Phase::Finalized,
            ..
        })
    ));
    assert!(matches!(
        report.save_report_at(timestamp()),
        Err(ReportError::Sequence {
            phase: Phase::Finalized,
            ..
        })
    ));
    assert!(matches!(
        report.initialize(),
        Err(ReportError::Sequence {
            phase: Phase::Finalized,
            ..
        })
    ));
}
