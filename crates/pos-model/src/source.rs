//! Source-side schema: columns discovered in an uploaded file.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ids::ColumnId;

/// Normalizes a label for comparison: lowercase, alphanumerics only.
///
/// `"Unit Price ($)"` and `"unit_price"` both normalize to `"unitprice"`.
pub fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One column of the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    pub id: ColumnId,
    pub label: String,
    /// First non-empty value seen in the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

impl SourceColumn {
    pub fn new(id: ColumnId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            sample: None,
        }
    }

    #[must_use]
    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }
}

/// Ordered columns of one uploaded file. Immutable once a file is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSchema {
    columns: Vec<SourceColumn>,
}

impl SourceSchema {
    pub fn new(columns: Vec<SourceColumn>) -> Self {
        Self { columns }
    }

    /// Builds a schema from header labels, assigning positional ids.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = labels
            .into_iter()
            .enumerate()
            .map(|(idx, label)| SourceColumn::new(ColumnId::positional(idx), label))
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    pub fn column(&self, id: &ColumnId) -> Option<&SourceColumn> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn position(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ColumnId) -> bool {
        self.position(id).is_some()
    }

    /// First column whose normalized label equals the normalized `label`.
    pub fn find_by_label(&self, label: &str) -> Option<&SourceColumn> {
        let wanted = normalize_label(label);
        self.columns
            .iter()
            .find(|c| normalize_label(&c.label) == wanted)
    }

    /// Label of a column, falling back to its id.
    pub fn label_of<'a>(&'a self, id: &'a ColumnId) -> &'a str {
        self.column(id).map_or(id.as_str(), |c| c.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// SHA-256 over the normalized labels, in order.
    ///
    /// Two files with the same header layout share a fingerprint regardless of
    /// label casing or punctuation.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for column in &self.columns {
            hasher.update(normalize_label(&column.label).as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}

/// Parsed content of an uploaded file: its schema and raw data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceData {
    pub schema: SourceSchema,
    /// Data rows, one cell per schema column.
    pub rows: Vec<Vec<String>>,
}

impl SourceData {
    pub fn new(schema: SourceSchema, rows: Vec<Vec<String>>) -> Self {
        Self { schema, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell value of `column` in row `row` (zero based), if present.
    pub fn value(&self, row: usize, column: &ColumnId) -> Option<&str> {
        let idx = self.schema.position(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}
