//! # bdsummary-core
//!
//! Core domain model for the Black Duck security-risk summary report.
//!
//! This crate provides:
//! - Domain types: `RowRecord`, `ColumnSchema`, `ReportConfig`
//! - The report lifecycle phases: `Phase`
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```rust
//! use bdsummary_core::{ColumnSchema, RowRecord, RowStatus};
//!
//! let record = RowRecord::new("Payments", "openssl 1.1.1k", "CVE-2022-0778")
//!     .security_risk("High")
//!     .recommended_fix("1.1.1n")
//!     .match_type("Exact");
//! assert_eq!(record.status(), RowStatus::Complete);
//!
//! let schema = ColumnSchema::blackduck();
//! assert_eq!(schema.entries().next(), Some((1, "Application Name")));
//! ```

pub mod schema;

pub use schema::{ColumnId, ColumnSchema, ReviewGroup};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Row Records
// ============================================================================

/// One vulnerability finding with its resolved recommended fix (if any)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    #[serde(alias = "ApplicationName")]
    pub application_name: String,
    #[serde(alias = "SoftwareComponent")]
    pub software_component: String,
    #[serde(alias = "SecurityRisk", default)]
    pub security_risk: String,
    #[serde(alias = "VulnerabilityId")]
    pub vulnerability_id: String,
    /// Absent or empty when no fix could be matched
    #[serde(alias = "RecommendedFix", default)]
    pub recommended_fix: Option<String>,
    #[serde(alias = "MatchType", default)]
    pub match_type: String,
}

impl RowRecord {
    /// Create a record for a finding with no risk, fix or match type yet
    pub fn new(
        application_name: impl Into<String>,
        software_component: impl Into<String>,
        vulnerability_id: impl Into<String>,
    ) -> Self {
        Self {
            application_name: application_name.into(),
            software_component: software_component.into(),
            vulnerability_id: vulnerability_id.into(),
            ..Self::default()
        }
    }

    /// Set the security risk rating
    pub fn security_risk(mut self, risk: impl Into<String>) -> Self {
        self.security_risk = risk.into();
        self
    }

    /// Set the recommended fix
    pub fn recommended_fix(mut self, fix: impl Into<String>) -> Self {
        self.recommended_fix = Some(fix.into());
        self
    }

    /// Set how the recommended fix was determined
    pub fn match_type(mut self, match_type: impl Into<String>) -> Self {
        self.match_type = match_type.into();
        self
    }

    /// Recommended fix text, empty when none was found
    pub fn fix_text(&self) -> &str {
        self.recommended_fix.as_deref().unwrap_or("")
    }

    pub fn status(&self) -> RowStatus {
        if self.fix_text().is_empty() {
            RowStatus::MissingFix
        } else {
            RowStatus::Complete
        }
    }
}

/// Classification of a populated row, used for its log line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowStatus {
    /// A recommended fix is present
    Complete,
    /// No recommended fix was found; the row is still written in full
    MissingFix,
}

// ============================================================================
// Configuration
// ============================================================================

/// Where the finished report is written
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory that receives `blackduck-summary-<timestamp>.xlsx`
    #[serde(alias = "output_file_path", alias = "OutputFilePath")]
    pub output_dir: PathBuf,
}

impl ReportConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Reject configurations that can never produce a report
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ReportError::Config("output directory is empty".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle phase of a report
///
/// Transitions are strictly `Uninitialized -> Building -> Finalized`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No sheet exists yet
    Uninitialized,
    /// Header is laid out; data rows may be appended
    Building,
    /// Report has been written and released
    Finalized,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Uninitialized => write!(f, "uninitialized"),
            Phase::Building => write!(f, "building"),
            Phase::Finalized => write!(f, "finalized"),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Report building errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sequencing error: cannot {operation} while the report is {phase}")]
    Sequence {
        operation: &'static str,
        phase: Phase,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Tests
// ============================================================================
