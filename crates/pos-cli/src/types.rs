//! Result types of an import run.

use std::path::PathBuf;

use pos_model::{IssueId, ValidationIssue, ValidationReport};
use pos_wizard::{ImportReceipt, Step};

/// One row of the mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub field: String,
    pub label: String,
    pub required: bool,
    /// Label of the mapped column.
    pub column: Option<String>,
    pub error: Option<String>,
}

/// What happened during one `run` invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub file: PathBuf,
    /// The step the wizard stopped at.
    pub step: Step,
    /// Template applied to the mapping, if any.
    pub template: Option<String>,
    /// Path of the template saved after mapping.
    pub saved_template: Option<PathBuf>,
    pub mapping: Vec<MappingRow>,
    pub report: Option<ValidationReport>,
    pub resolved: Vec<IssueId>,
    /// Issues still outstanding when the run ended.
    pub outstanding: Vec<ValidationIssue>,
    pub receipt: Option<ImportReceipt>,
    /// Why the wizard could not advance.
    pub blocked: Option<String>,
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        self.receipt.is_some()
    }
}
