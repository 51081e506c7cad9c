//! Black Duck security-risk summary workbook
//!
//! Builds a single XLSX sheet in three strictly ordered steps:
//! - `initialize`: lays out the static header block (rows 1-7)
//! - `populate_row`: appends one finding per call, starting at row 8
//! - `save_report`: writes `blackduck-summary-<timestamp>.xlsx` and releases the sheet
//!
//! ## Sheet Layout
//!
//! ```text
//! row 1 | Product Name                          (merged A:K, centered)
//! row 2 | Version Number                        (merged A:K, centered)
//! row 3 | Product Iteration (PI) or Date        (merged A:K, centered)
//! row 4 | To be filled out before the review    (green legend)
//! row 5 | To be filled out during the review    (yellow legend)
//! row 6 |
//! row 7 | Application Name | ... | Match Type | Reviewer | ... | Review Comments   (autofilter)
//!       |<------------- green ------------->|<--------- yellow ---------->|
//! row 8 | first finding
//! ```
//!
//! Row and column numbers in this module are 1-based sheet coordinates, the
//! same numbers a reviewer sees in the spreadsheet application. They are
//! converted to `rust_xlsxwriter`'s 0-based cells only at the write calls.
//!
//! Column 6 (Remediation Notes) is never written by `populate_row`.

use bdsummary_core::{
    ColumnId, ColumnSchema, Phase, ReportConfig, ReportError, Result, ReviewGroup, RowRecord,
    RowStatus,
};
use chrono::{Local, NaiveDateTime};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::fs;
use std::path::PathBuf;

/// Name of the only sheet in the workbook
pub const SHEET_NAME: &str = "Black Duck Security Risks";

/// Title fields merged across the full width of rows 1-3
pub const TITLE_FIELDS: [&str; 3] = [
    "Product Name",
    "Version Number",
    "Product Iteration (PI) or Date",
];

/// Row of the "before review" legend; the "during review" legend sits below it
pub const LEGEND_ROW: u32 = 4;

/// Row holding the column headers and the autofilter
pub const HEADER_ROW: u32 = 7;

/// First row available for findings
pub const FIRST_DATA_ROW: u32 = 8;

/// Fill for columns completed before the review (green)
pub const BEFORE_REVIEW_FILL: u32 = 0x008000;

/// Fill for columns completed during the review (yellow)
pub const DURING_REVIEW_FILL: u32 = 0xFFFF00;

/// Longest string a single XLSX cell accepts
const MAX_CELL_CHARS: usize = 32_767;

/// Last row of an XLSX worksheet
const MAX_SHEET_ROW: u32 = 1_048_576;

/// Build the report file name for a local timestamp
///
/// `blackduck-summary-2026-10-19-143005.xlsx`
pub fn report_file_name(timestamp: &NaiveDateTime) -> String {
    format!("blackduck-summary-{}.xlsx", timestamp.format("%Y-%m-%d-%H%M%S"))
}

/// Security-risk summary report builder
///
/// Owns the report state for one run and enforces the
/// `Uninitialized -> Building -> Finalized` lifecycle. Out-of-order calls are
/// rejected with [`ReportError::Sequence`] and leave the sheet untouched.
///
/// ```rust,ignore
/// let mut report = SummaryReport::new(ReportConfig::new("out"));
/// report.initialize()?;
/// for record in &records {
///     report.populate_row(record)?;
/// }
/// let path = report.save_report()?;
/// ```
pub struct SummaryReport {
    config: ReportConfig,
    schema: ColumnSchema,
    lifecycle: Lifecycle,
}

enum Lifecycle {
    Uninitialized,
    Building(ReportState),
    Finalized,
}

/// Live sheet plus the next-write-row cursor
struct ReportState {
    worksheet: Worksheet,
    next_row: u32,
}

impl std::fmt::Debug for SummaryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryReport")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("next_row", &self.next_row())
            .finish()
    }
}

impl SummaryReport {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            schema: ColumnSchema::blackduck(),
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        match self.lifecycle {
            Lifecycle::Uninitialized => Phase::Uninitialized,
            Lifecycle::Building(_) => Phase::Building,
            Lifecycle::Finalized => Phase::Finalized,
        }
    }

    /// Row the next finding will be written to, while building
    pub fn next_row(&self) -> Option<u32> {
        match &self.lifecycle {
            Lifecycle::Building(state) => Some(state.next_row),
            _ => None,
        }
    }

    /// Create the sheet and lay out the header block
    pub fn initialize(&mut self) -> Result<()> {
        if !matches!(self.lifecycle, Lifecycle::Uninitialized) {
            return Err(self.out_of_sequence("initialize the report"));
        }

        let formats = ReportFormats::new();
        let mut worksheet = Worksheet::new();
        worksheet.set_name(SHEET_NAME).map_err(format_error)?;
        self.write_header(&mut worksheet, &formats)?;

        tracing::debug!(
            columns = self.schema.len(),
            first_data_row = FIRST_DATA_ROW,
            "summary sheet initialized"
        );

        self.lifecycle = Lifecycle::Building(ReportState {
            worksheet,
            next_row: FIRST_DATA_ROW,
        });
        Ok(())
    }

    /// Append one finding below the previous one
    pub fn populate_row(&mut self, record: &RowRecord) -> Result<()> {
        let cells = self.record_cells(record);
        let phase = self.phase();
        let state = match &mut self.lifecycle {
            Lifecycle::Building(state) => state,
            _ => {
                return Err(ReportError::Sequence {
                    operation: "populate a row",
                    phase,
                });
            }
        };

        let row = state.next_row;
        if row > MAX_SHEET_ROW {
            return Err(ReportError::InvalidData(format!(
                "Row [{row}] is past the last worksheet row {MAX_SHEET_ROW}"
            )));
        }

        let oversized = cells
            .iter()
            .find(|(_, text)| text.chars().count() > MAX_CELL_CHARS);
        if let Some((_, text)) = oversized {
            return Err(ReportError::InvalidData(format!(
                "Row [{row}] value exceeds {MAX_CELL_CHARS} characters: {}...",
                text.chars().take(32).collect::<String>()
            )));
        }

        for (col, text) in &cells {
            // Blank cells are left unwritten
            if text.is_empty() {
                continue;
            }
            state
                .worksheet
                .write_string(row - 1, col - 1, *text)
                .map_err(format_error)?;
        }

        match record.status() {
            RowStatus::MissingFix => tracing::warn!(
                "Row [{}] No recommended fix found for {} | {} | {}",
                row,
                record.application_name,
                record.software_component,
                record.vulnerability_id
            ),
            RowStatus::Complete => tracing::info!(
                "Row [{}] {} | {} | {}",
                row,
                record.application_name,
                record.software_component,
                record.vulnerability_id
            ),
        }

        state.next_row += 1;
        Ok(())
    }

    /// Write the report to the configured directory, stamped with the current local time
    pub fn save_report(&mut self) -> Result<PathBuf> {
        self.save_report_at(Local::now().naive_local())
    }

    /// Write the report using an explicit timestamp for the file name
    ///
    /// The sheet is released whether or not the write succeeds; a failed save
    /// is not retried and leaves the report finalized.
    pub fn save_report_at(&mut self, timestamp: NaiveDateTime) -> Result<PathBuf> {
        let state = match std::mem::replace(&mut self.lifecycle, Lifecycle::Finalized) {
            Lifecycle::Building(state) => state,
            other => {
                self.lifecycle = other;
                return Err(self.out_of_sequence("save the report"));
            }
        };

        self.config.validate()?;
        let path = self.config.output_dir.join(report_file_name(&timestamp));

        let mut workbook = Workbook::new();
        workbook.push_worksheet(state.worksheet);
        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| ReportError::Format(format!("Failed to create Excel: {e}")))?;

        if let Err(e) = fs::write(&path, &buffer) {
            // Do not leave a truncated workbook behind
            let _ = fs::remove_file(&path);
            return Err(ReportError::Io(e));
        }

        tracing::info!("Blackduck Analysis is completed and report was generated successfully.");
        Ok(path)
    }

    fn out_of_sequence(&self, operation: &'static str) -> ReportError {
        ReportError::Sequence {
            operation,
            phase: self.phase(),
        }
    }

    /// `(column, text)` pairs for every record field the sheet shows
    fn record_cells<'r>(&self, record: &'r RowRecord) -> Vec<(u16, &'r str)> {
        [
            (ColumnId::ApplicationName, record.application_name.as_str()),
            (ColumnId::SoftwareComponent, record.software_component.as_str()),
            (ColumnId::SecurityRisk, record.security_risk.as_str()),
            (ColumnId::VulnerabilityId, record.vulnerability_id.as_str()),
            (ColumnId::RecommendedFix, record.fix_text()),
            (ColumnId::MatchType, record.match_type.as_str()),
        ]
        .into_iter()
        .filter_map(|(id, text)| self.schema.position(id).map(|col| (col, text)))
        .collect()
    }

    /// Title fields, review legends, autofilter and the colored header row
    fn write_header(&self, sheet: &mut Worksheet, formats: &ReportFormats) -> Result<()> {
        let last_col = self.schema.last_column().max(1);

        for (offset, title) in TITLE_FIELDS.iter().enumerate() {
            let row = offset as u32;
            sheet
                .merge_range(row, 0, row, last_col - 1, title, &formats.title)
                .map_err(format_error)?;
        }

        for (offset, group) in [ReviewGroup::BeforeReview, ReviewGroup::DuringReview]
            .into_iter()
            .enumerate()
        {
            let row = LEGEND_ROW + offset as u32;
            sheet
                .write_string_with_format(row - 1, 0, group.legend(), formats.for_group(group))
                .map_err(format_error)?;
        }

        sheet
            .autofilter(HEADER_ROW - 1, 0, HEADER_ROW - 1, last_col - 1)
            .map_err(format_error)?;

        for (id, (col, label)) in self.schema.columns().iter().zip(self.schema.entries()) {
            let format = formats.for_group(id.group());
            sheet
                .write_string_with_format(HEADER_ROW - 1, col - 1, label, format)
                .map_err(format_error)?;
        }

        Ok(())
    }
}

fn format_error(e: XlsxError) -> ReportError {
    ReportError::Format(e.to_string())
}

/// Reusable cell formats
struct ReportFormats {
    title: Format,
    before_review: Format,
    during_review: Format,
}

impl ReportFormats {
    fn new() -> Self {
        Self {
            title: Format::new().set_align(FormatAlign::Center),
            before_review: Format::new()
                .set_background_color(BEFORE_REVIEW_FILL)
                .set_border(FormatBorder::Thin),
            during_review: Format::new()
                .set_background_color(DURING_REVIEW_FILL)
                .set_border(FormatBorder::Thin),
        }
    }

    fn for_group(&self, group: ReviewGroup) -> &Format {
        match group {
            ReviewGroup::BeforeReview => &self.before_review,
            ReviewGroup::DuringReview => &self.during_review,
        }
    }
}
