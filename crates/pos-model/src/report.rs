//! Validation report snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{FieldId, IssueId};
use crate::issue::ValidationIssue;

/// Aggregate counts of a validation run.
///
/// A snapshot: recomputed wholesale on each run, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_rows: usize,
    /// Rows without any issue.
    pub passed: usize,
    /// Rows with at least one error.
    pub failed: usize,
    /// Rows with warnings but no error.
    pub warnings: usize,
    /// Blank rows that were not validated.
    pub skipped: usize,
    pub validated_at: DateTime<Utc>,
}

/// Outcome of one sample row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Valid,
    Warning,
    Error,
}

impl RowStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// Illustrative preview row, independent of the full issue list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    pub row: usize,
    pub status: RowStatus,
    /// Mapped values keyed by target field.
    pub values: BTreeMap<FieldId, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Everything one validation run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub summary: ValidationSummary,
    pub issues: Vec<ValidationIssue>,
    pub samples: Vec<SampleRow>,
}

impl ValidationReport {
    pub fn issue(&self, id: &IssueId) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| &i.id == id)
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_warning()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
