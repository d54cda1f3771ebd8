//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping operations.
///
/// These flag API misuse (ids that do not exist). Conflicts and missing
/// required fields are not errors; they are reported by
/// [`compute_errors`](crate::compute_errors).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Field not found in the catalog.
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    /// Column not found in the source schema.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

pub type Result<T> = std::result::Result<T, MappingError>;
