//! Data model for the POS product import pipeline.
//!
//! Shared by every stage of the import wizard: the target catalog, the
//! source schema discovered in an uploaded file, field-to-column mappings,
//! and the validation report.

mod catalog;
mod error;
mod field;
mod ids;
mod issue;
mod mapping;
mod registry;
mod report;
mod source;

pub use catalog::TargetCatalog;
pub use error::{ModelError, Result};
pub use field::{FieldKind, TargetField};
pub use ids::{ColumnId, FieldId, IssueId};
pub use issue::{IssueType, ValidationIssue};
pub use mapping::{Mapping, MappingViolation, ResolvedMapping};
pub use registry::{CatalogRegistry, CatalogSource, JsonCatalogSource, StaticCatalog};
pub use report::{RowStatus, SampleRow, ValidationReport, ValidationSummary};
pub use source::{SourceColumn, SourceData, SourceSchema, normalize_label};
