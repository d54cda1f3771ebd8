//! Import commit collaborator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pos_model::{ResolvedMapping, SourceData, TargetCatalog};
use serde::Serialize;
use tracing::info;

use crate::error::CommitError;

/// Everything a committer needs to write the products.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub catalog: Arc<TargetCatalog>,
    pub mapping: ResolvedMapping,
    pub data: Arc<SourceData>,
    /// The user acknowledged the outstanding warnings.
    pub acknowledged_warnings: bool,
    /// Outstanding warnings at the time of the request.
    pub outstanding_warnings: usize,
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReceipt {
    /// Rows written.
    pub imported: usize,
    /// Blank rows left out.
    pub skipped: usize,
    pub completed_at: DateTime<Utc>,
}

/// Writes an import. Runs on a blocking thread.
pub trait ImportCommitter: Send + Sync {
    fn commit(&self, request: &ImportRequest) -> Result<ImportReceipt, CommitError>;
}

/// Committer that writes nothing and reports every non-blank row as imported.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCommitter {
    failure: Option<String>,
}

impl SimulatedCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A committer that rejects every import with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }
}

impl ImportCommitter for SimulatedCommitter {
    fn commit(&self, request: &ImportRequest) -> Result<ImportReceipt, CommitError> {
        if let Some(message) = &self.failure {
            return Err(CommitError::Rejected(message.clone()));
        }
        let skipped = request
            .data
            .rows
            .iter()
            .filter(|row| row.iter().all(|cell| cell.trim().is_empty()))
            .count();
        let receipt = ImportReceipt {
            imported: request.data.row_count() - skipped,
            skipped,
            completed_at: Utc::now(),
        };
        info!(
            imported = receipt.imported,
            skipped = receipt.skipped,
            fields = request.mapping.len(),
            "import committed"
        );
        Ok(receipt)
    }
}
