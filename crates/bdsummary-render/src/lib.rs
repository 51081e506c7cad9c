//! # bdsummary-render
//!
//! XLSX rendering for the Black Duck security-risk summary.
//!
//! This crate provides:
//! - `SummaryReport`: the three-phase report builder (initialize, populate, save)
//! - Sheet layout constants shared with tests and tooling
//! - `report_file_name`: the timestamped output file convention
//!
//! ## Example
//!
//! ```rust,ignore
//! use bdsummary_core::{ReportConfig, RowRecord};
//! use bdsummary_render::SummaryReport;
//!
//! let mut report = SummaryReport::new(ReportConfig::new("reports"));
//! report.initialize()?;
//! report.populate_row(
//!     &RowRecord::new("Portal", "log4j-core 2.14.1", "CVE-2021-44228")
//!         .security_risk("Critical")
//!         .recommended_fix("2.17.1")
//!         .match_type("Exact"),
//! )?;
//! let path = report.save_report()?;
//! println!("written {}", path.display());
//! ```

pub mod excel;

pub use excel::{
    report_file_name, SummaryReport, BEFORE_REVIEW_FILL, DURING_REVIEW_FILL, FIRST_DATA_ROW,
    HEADER_ROW, LEGEND_ROW, SHEET_NAME, TITLE_FIELDS,
};
