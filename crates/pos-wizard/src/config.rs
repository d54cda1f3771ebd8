//! Import configuration.
//!
//! Loaded from a TOML file; every key is optional.
//!
//! ```toml
//! [upload]
//! allowed_extensions = [".csv"]
//! max_size_bytes = 5242880
//!
//! [timing]
//! upload_ms = 600
//! validation_ms = 900
//! import_ms = 1000
//!
//! [validation]
//! sample_rows = 5
//! ```

use std::path::Path;
use std::time::Duration;

use pos_ingest::UploadPolicy;
use pos_validate::DEFAULT_SAMPLE_ROWS;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WizardError};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Accepted file types and size limit.
    pub upload: UploadPolicy,
    /// Simulated latencies of the timed operations.
    pub timing: TimingConfig,
    /// Validation report settings.
    pub validation: ValidationConfig,
}

impl ImportConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WizardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| WizardError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Latencies, in milliseconds, standing in for remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before a selected file is committed.
    pub upload_ms: u64,
    /// Delay before a validation report is delivered.
    pub validation_ms: u64,
    /// Delay before an import completes.
    pub import_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            upload_ms: 600,
            validation_ms: 900,
            import_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// No delays at all.
    pub fn immediate() -> Self {
        Self {
            upload_ms: 0,
            validation_ms: 0,
            import_ms: 0,
        }
    }

    pub fn upload(&self) -> Duration {
        Duration::from_millis(self.upload_ms)
    }

    pub fn validation(&self) -> Duration {
        Duration::from_millis(self.validation_ms)
    }

    pub fn import(&self) -> Duration {
        Duration::from_millis(self.import_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Preview rows carried by each report.
    pub sample_rows: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}
