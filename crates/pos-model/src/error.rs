//! Error types for the import data model.

use std::path::PathBuf;

use thiserror::Error;

use crate::mapping::MappingViolation;

/// Errors raised while constructing model values.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid field id: {0:?}")]
    InvalidFieldId(String),

    #[error("invalid column id: {0:?}")]
    InvalidColumnId(String),

    #[error("invalid issue id: {0:?}")]
    InvalidIssueId(String),

    #[error("catalog '{0}' has no fields")]
    EmptyCatalog(String),

    #[error("field '{0}' is defined more than once")]
    DuplicateField(String),

    #[error("mapping cannot be resolved: {} violation(s)", .0.len())]
    UnresolvedMapping(Vec<MappingViolation>),

    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
