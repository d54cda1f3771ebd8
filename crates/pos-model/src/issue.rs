//! Validation issue types.

use serde::{Deserialize, Serialize};

use crate::ids::{FieldId, IssueId};

/// Issue severity. Errors block progress; warnings need acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Error,
    Warning,
}

impl IssueType {
    /// Parse an issue type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// A row-level problem found by a validation run.
///
/// Issues are immutable: resolving one is tracked outside the issue itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub id: IssueId,
    /// One-based data row number (header excluded).
    pub row: usize,
    pub field: FieldId,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
}

impl ValidationIssue {
    pub fn is_error(&self) -> bool {
        self.issue_type == IssueType::Error
    }

    pub fn is_warning(&self) -> bool {
        self.issue_type == IssueType::Warning
    }
}
