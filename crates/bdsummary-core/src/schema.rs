//! Column schema for the security-risk summary sheet
//!
//! The schema is a fixed, ordered list of columns. It is the single source for
//! header labels, for the physical position of every logical field, and for the
//! review group that decides how a header cell is colored.
//!
//! ```text
//! | 1 App | 2 Component | 3 Risk | 4 Vuln ID | 5 Fix | 6 Notes | 7 Match | 8 .. 11 review |
//! |<------------------------ before review ------------------------->|<- during review ->|
//! ```

use serde::Serialize;

/// Which phase of the review a column is filled out in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewGroup {
    /// Filled from the scan before the review meeting
    BeforeReview,
    /// Filled by hand during the review meeting
    DuringReview,
}

impl ReviewGroup {
    /// Legend text shown in the banner above the header row
    pub fn legend(self) -> &'static str {
        match self {
            ReviewGroup::BeforeReview => "To be filled out before the review",
            ReviewGroup::DuringReview => "To be filled out during the review",
        }
    }
}

/// Logical column identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    ApplicationName,
    SoftwareComponent,
    SecurityRisk,
    VulnerabilityId,
    RecommendedFix,
    /// Left empty by the generator; reserved for the reviewer
    RemediationNotes,
    MatchType,
    Reviewer,
    ReviewDecision,
    TargetFixVersion,
    ReviewComments,
}

impl ColumnId {
    /// Header label written into the header row
    pub fn label(self) -> &'static str {
        match self {
            ColumnId::ApplicationName => "Application Name",
            ColumnId::SoftwareComponent => "Software Component",
            ColumnId::SecurityRisk => "Security Risk",
            ColumnId::VulnerabilityId => "Vulnerability ID",
            ColumnId::RecommendedFix => "Recommended Fix",
            ColumnId::RemediationNotes => "Remediation Notes",
            ColumnId::MatchType => "Match Type",
            ColumnId::Reviewer => "Reviewer",
            ColumnId::ReviewDecision => "Review Decision",
            ColumnId::TargetFixVersion => "Target Fix Version",
            ColumnId::ReviewComments => "Review Comments",
        }
    }

    pub fn group(self) -> ReviewGroup {
        match self {
            ColumnId::Reviewer
            | ColumnId::ReviewDecision
            | ColumnId::TargetFixVersion
            | ColumnId::ReviewComments => ReviewGroup::DuringReview,
            _ => ReviewGroup::BeforeReview,
        }
    }
}

const BLACKDUCK_COLUMNS: [ColumnId; 11] = [
    ColumnId::ApplicationName,
    ColumnId::SoftwareComponent,
    ColumnId::SecurityRisk,
    ColumnId::VulnerabilityId,
    ColumnId::RecommendedFix,
    ColumnId::RemediationNotes,
    ColumnId::MatchType,
    ColumnId::Reviewer,
    ColumnId::ReviewDecision,
    ColumnId::TargetFixVersion,
    ColumnId::ReviewComments,
];

/// Immutable, ordered column layout of the summary sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: &'static [ColumnId],
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::blackduck()
    }
}

impl ColumnSchema {
    /// The Black Duck security-risk layout (11 columns)
    pub const fn blackduck() -> Self {
        Self {
            columns: &BLACKDUCK_COLUMNS,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in sheet order
    pub fn columns(&self) -> &'static [ColumnId] {
        self.columns
    }

    /// Ordered `(index, label)` pairs, with 1-based sheet column indices
    pub fn entries(&self) -> impl Iterator<Item = (u16, &'static str)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, id)| (i as u16 + 1, id.label()))
    }

    /// 1-based sheet column occupied by `id`, if the schema contains it
    pub fn position(&self, id: ColumnId) -> Option<u16> {
        self.columns
            .iter()
            .position(|c| *c == id)
            .map(|i| i as u16 + 1)
    }

    /// Last 1-based sheet column of the layout
    pub fn last_column(&self) -> u16 {
        self.columns.len() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blackduck_schema_has_eleven_columns() {
        let schema = ColumnSchema::blackduck();
        assert_eq!(schema.len(), 11);
        assert_eq!(schema.last_column(), 11);
    }

    #[test]
    fn entries_are_one_based_and_ordered() {
        let entries: Vec<_> = ColumnSchema::blackduck().entries().collect();
        assert_eq!(entries[0], (1, "Application Name"));
        assert_eq!(entries[4], (5, "Recommended Fix"));
        assert_eq!(entries[6], (7, "Match Type"));
        assert_eq!(entries[10], (11, "Review Comments"));
    }

    #[test]
    fn record_fields_land_on_fixed_columns() {
        let schema = ColumnSchema::blackduck();
        assert_eq!(schema.position(ColumnId::ApplicationName), Some(1));
        assert_eq!(schema.position(ColumnId::SoftwareComponent), Some(2));
        assert_eq!(schema.position(ColumnId::SecurityRisk), Some(3));
        assert_eq!(schema.position(ColumnId::VulnerabilityId), Some(4));
        assert_eq!(schema.position(ColumnId::RecommendedFix), Some(5));
        assert_eq!(schema.position(ColumnId::RemediationNotes), Some(6));
        assert_eq!(schema.position(ColumnId::MatchType), Some(7));
    }

    #[test]
    fn first_seven_columns_are_filled_before_review() {
        let groups: Vec<_> = ColumnSchema::blackduck()
            .columns()
            .iter()
            .map(|c| c.group())
            .collect();
        assert!(groups[..7].iter().all(|g| *g == ReviewGroup::BeforeReview));
        assert!(groups[7..].iter().all(|g| *g == ReviewGroup::DuringReview));
    }
}
