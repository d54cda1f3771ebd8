//! Wizard error types.
//!
//! User-correctable conditions (rejected uploads, mapping conflicts,
//! validation issues) are wizard state, not errors. These variants cover
//! calls made out of order and configuration problems.

use std::path::PathBuf;

use pos_map::MappingError;
use pos_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    /// An operation needs source data but no file has been loaded.
    #[error("no file has been loaded")]
    NoSource,

    /// Field or column id does not exist.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The draft mapping cannot be resolved yet.
    #[error("mapping is incomplete: {0}")]
    Unresolved(#[from] ModelError),

    /// Failed to read the configuration file.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure reported by an [`ImportCommitter`](crate::ImportCommitter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("import rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;
