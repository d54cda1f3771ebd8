//! CSV source reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use pos_model::{SourceData, SourceSchema};
use tracing::debug;

use crate::error::{IngestError, Result};

use super::header::normalize_headers;

/// Reads a CSV file into [`SourceData`].
///
/// The first record is the header row. Rows shorter than the header are
/// padded with empty cells; extra cells are dropped.
pub fn read_csv_source(path: &Path) -> Result<SourceData> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    read_csv_source_from_reader(file, path)
}

/// Reads CSV content from any reader. `path` is only used in errors.
pub fn read_csv_source_from_reader<R: Read>(reader: R, path: &Path) -> Result<SourceData> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| csv_error(path, &e))?,
        None => {
            return Err(IngestError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
    };
    let labels = normalize_headers(header.iter());
    let width = labels.len();

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| csv_error(path, &e))?;
        let mut row: Vec<String> = record.iter().take(width).map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    let mut schema = SourceSchema::from_labels(labels);
    let columns = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let sample = rows
                .iter()
                .map(|row| row[idx].as_str())
                .find(|value| !value.is_empty());
            match sample {
                Some(value) => column.clone().with_sample(value),
                None => column.clone(),
            }
        })
        .collect();
    schema = SourceSchema::new(columns);

    debug!(
        path = %path.display(),
        columns = width,
        rows = rows.len(),
        "read CSV source"
    );
    Ok(SourceData::new(schema, rows))
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
