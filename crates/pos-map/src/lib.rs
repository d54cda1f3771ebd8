//! Column mapping engine for the POS import pipeline.
//!
//! Maps target catalog fields to source columns: label and alias based
//! auto-mapping, fuzzy column suggestions, per-field conflict reporting and
//! reusable mapping templates.

mod engine;
mod error;
mod repository;
mod score;
mod state;
mod utils;

pub use engine::{auto_map, compute_errors, is_mapping_complete};
pub use error::{MappingError, Result};
pub use repository::{MappingTemplate, TemplateRepository};
pub use score::{ColumnSuggestion, ConfidenceLevel, ConfidenceThresholds, suggest_columns};
pub use state::{FieldMappingStatus, MappingChange, MappingState, MappingSummary};
pub use utils::candidate_keys;
