//! Built-in row checks.
//!
//! Each check looks at one cell of one mapped field and reports zero or more
//! [`Finding`]s. The engine turns findings into [`ValidationIssue`]s.
//!
//! [`ValidationIssue`]: pos_model::ValidationIssue

pub mod format;
pub mod numeric;
pub mod required;
pub mod unique;

use pos_model::{FieldKind, IssueType, TargetField};

/// Problem found in one cell. Each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Required field is blank.
    RequiredEmpty,
    /// Value does not parse as the field's numeric kind.
    NotANumber { kind: FieldKind, value: String },
    /// Decimal amount below zero.
    NegativeAmount { value: String },
    /// Integer quantity below zero.
    NegativeQuantity { value: String },
    /// Decimal with more than two fractional digits.
    TooManyDecimals { value: String },
    /// Value already used by an earlier row of a unique field.
    Duplicate { value: String, first_row: usize },
    /// Text longer than the field allows.
    TooLong { length: usize, max_length: usize },
    /// Barcode that is not 8, 12, 13 or 14 digits.
    InvalidBarcode { value: String },
}

impl Finding {
    pub fn issue_type(&self) -> IssueType {
        match self {
            Finding::RequiredEmpty
            | Finding::NotANumber { .. }
            | Finding::NegativeAmount { .. }
            | Finding::Duplicate { .. } => IssueType::Error,
            Finding::NegativeQuantity { .. }
            | Finding::TooManyDecimals { .. }
            | Finding::TooLong { .. }
            | Finding::InvalidBarcode { .. } => IssueType::Warning,
        }
    }

    pub fn message(&self, field: &TargetField) -> String {
        let label = &field.label;
        match self {
            Finding::RequiredEmpty => format!("{label} is required"),
            Finding::NotANumber {
                kind: FieldKind::Integer,
                value,
            } => format!("{label} must be a whole number ('{value}')"),
            Finding::NotANumber { value, .. } => format!("{label} must be a number ('{value}')"),
            Finding::NegativeAmount { value } => {
                format!("{label} cannot be negative ({value})")
            }
            Finding::NegativeQuantity { value } => format!("{label} is negative ({value})"),
            Finding::TooManyDecimals { value } => {
                format!("{label} has more than 2 decimal places ({value})")
            }
            Finding::Duplicate { value, first_row } => {
                format!("Duplicate {label} '{value}' (first used in row {first_row})")
            }
            Finding::TooLong { length, max_length } => {
                format!("{label} is {length} characters long (maximum {max_length})")
            }
            Finding::InvalidBarcode { value } => format!("'{value}' is not a valid barcode"),
        }
    }

    pub fn hint(&self, field: &TargetField) -> String {
        match self {
            Finding::RequiredEmpty => format!("Fill in {} or remove the row", field.label),
            Finding::NotANumber {
                kind: FieldKind::Integer,
                ..
            } => "Use whole numbers only, e.g. 12".to_string(),
            Finding::NotANumber { .. } => {
                "Use digits and a decimal point only, e.g. 12.50".to_string()
            }
            Finding::NegativeAmount { .. } => "Enter a value of zero or more".to_string(),
            Finding::NegativeQuantity { .. } => {
                "Negative quantities are imported as back-orders".to_string()
            }
            Finding::TooManyDecimals { .. } => {
                "Value will be rounded to 2 decimal places".to_string()
            }
            Finding::Duplicate { .. } => format!("Each {} must be unique", field.label),
            Finding::TooLong { max_length, .. } => {
                format!("Text will be truncated to {max_length} characters")
            }
            Finding::InvalidBarcode { .. } => {
                "Barcodes are 8, 12, 13 or 14 digits (EAN/UPC/GTIN)".to_string()
            }
        }
    }
}
