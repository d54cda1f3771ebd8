//! File acceptance and source reading for the POS import pipeline.
//!
//! # Features
//!
//! - **Upload zone**: accept or reject files by extension and size
//! - **CSV reading**: discover source columns, samples and data rows
//!
//! # Example
//!
//! ```ignore
//! use pos_ingest::{FileHandle, UploadZone, UploadPolicy, read_source};
//!
//! let mut zone = UploadZone::new(UploadPolicy::default());
//! let handle = zone.browse_file(FileHandle::from_path(path)?)?.clone();
//! let data = read_source(&handle)?;
//! ```

mod csv;
mod error;
mod upload;

use std::path::Path;

use pos_model::SourceData;

// === Error Types ===
pub use error::{IngestError, Result, UploadError, format_size, format_size_over};

// === Upload ===
pub use upload::{DEFAULT_MAX_SIZE_BYTES, FileHandle, UploadPolicy, UploadZone};

// === CSV Reading ===
pub use self::csv::{
    normalize_header, normalize_headers, read_csv_source, read_csv_source_from_reader,
};

/// Reads the content of an accepted file, choosing the reader by extension.
pub fn read_source(file: &FileHandle) -> Result<SourceData> {
    let extension = file.extension().unwrap_or_default();
    let Some(path) = file.path.as_deref() else {
        return Err(IngestError::FileNotFound {
            path: Path::new(&file.name).to_path_buf(),
        });
    };
    match extension.as_str() {
        ".csv" => read_csv_source(path),
        _ => Err(IngestError::UnsupportedFormat { extension }),
    }
}
