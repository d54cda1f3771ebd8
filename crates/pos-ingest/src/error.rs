//! Error types for file acceptance and source reading.

use std::path::PathBuf;

use thiserror::Error;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;

/// Why the upload zone refused a file.
///
/// The `Display` text is what the upload zone shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Extension is not in the allowed set.
    #[error("Unsupported file type. Please upload a {allowed} file.")]
    UnsupportedType { name: String, allowed: String },

    /// File exceeds the configured maximum size.
    #[error(
        "File is too large ({}). Maximum size is {}.",
        format_size_over(*size_bytes, *max_bytes),
        format_size(*max_bytes)
    )]
    TooLarge {
        name: String,
        size_bytes: u64,
        max_bytes: u64,
    },
}

/// Errors that can occur while reading an accepted file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// File has no header row.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// Accepted upload type without a reader.
    #[error("reading {extension} files is not supported; export the sheet as CSV")]
    UnsupportedFormat { extension: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Formats a byte count rounded down to one decimal: `10 MB`, `12.3 MB`,
/// `512 KB` or `100 bytes`.
pub fn format_size(bytes: u64) -> String {
    let (unit, label) = unit_of(bytes);
    render(bytes, unit, label, false)
}

/// Formats `size` in the unit of `limit`, rounded up.
///
/// Paired with [`format_size`] for the limit, a size above the limit always
/// renders as a larger number.
pub fn format_size_over(size: u64, limit: u64) -> String {
    let (unit, label) = unit_of(limit);
    render(size, unit, label, true)
}

fn unit_of(bytes: u64) -> (u64, &'static str) {
    if bytes >= MB {
        (MB, "MB")
    } else if bytes >= KB {
        (KB, "KB")
    } else {
        (1, "bytes")
    }
}

fn render(bytes: u64, unit: u64, label: &str, round_up: bool) -> String {
    if unit == 1 {
        return format!("{bytes} {label}");
    }
    let scaled = u128::from(bytes) * 10;
    let unit = u128::from(unit);
    let tenths = if round_up {
        scaled.div_ceil(unit)
    } else {
        scaled / unit
    };
    match tenths % 10 {
        0 => format!("{} {label}", tenths / 10),
        frac => format!("{}.{frac} {label}", tenths / 10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message() {
        let err = UploadError::UnsupportedType {
            name: "products.pdf".to_string(),
            allowed: ".csv or .xlsx".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file type. Please upload a .csv or .xlsx file."
        );
    }

    #[test]
    fn test_too_large_message() {
        let err = UploadError::TooLarge {
            name: "big.csv".to_string(),
            size_bytes: 12 * 1024 * 1024 + 400 * 1024,
            max_bytes: 10 * 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "File is too large (12.4 MB). Maximum size is 10 MB."
        );
    }

    #[test]
    fn test_size_just_over_limit_reads_larger() {
        let limit = 10 * MB;
        for size in [limit + 1, limit + 40 * KB] {
            let err = UploadError::TooLarge {
                name: "big.csv".to_string(),
                size_bytes: size,
                max_bytes: limit,
            };
            assert_eq!(
                err.to_string(),
                "File is too large (10.1 MB). Maximum size is 10 MB."
            );
        }
    }

    #[test]
    fn test_small_limits_keep_their_unit() {
        assert_eq!(format_size(100), "100 bytes");
        assert_eq!(format_size_over(101, 100), "101 bytes");
        assert_eq!(format_size(512 * KB), "512 KB");
        assert_eq!(format_size_over(512 * KB + 1, 512 * KB), "512.1 KB");
        assert_eq!(format_size_over(3 * MB, 512 * KB), "3072 KB");
    }

    #[test]
    fn test_limit_rounds_down() {
        assert_eq!(format_size(10 * MB + MB / 2), "10.5 MB");
        assert_eq!(format_size(10 * MB + MB / 20 - 1), "10 MB");
        assert_eq!(format_size_over(10 * MB + MB / 20 - 1, 10 * MB), "10.1 MB");
    }
}
