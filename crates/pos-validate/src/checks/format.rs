//! Text length and barcode format checks.

use pos_model::{FieldKind, TargetField};

use super::Finding;

/// Valid barcode lengths: EAN-8, UPC-A, EAN-13, GTIN-14.
const BARCODE_LENGTHS: &[usize] = &[8, 12, 13, 14];

pub fn check(field: &TargetField, value: &str) -> Vec<Finding> {
    let trimmed = value.trim();
    let mut findings = Vec::new();

    if let Some(max_length) = field.max_length {
        let length = trimmed.chars().count();
        if length > max_length {
            findings.push(Finding::TooLong { length, max_length });
        }
    }

    if field.kind == FieldKind::Barcode && !trimmed.is_empty() && !is_valid_barcode(trimmed) {
        findings.push(Finding::InvalidBarcode {
            value: trimmed.to_string(),
        });
    }

    findings
}

pub fn is_valid_barcode(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit()) && BARCODE_LENGTHS.contains(&value.len())
}

#[cfg(test)]
mod tests {
    use pos_model::TargetCatalog;

    use super::*;

    #[test]
    fn barcode_lengths() {
        assert!(is_valid_barcode("12345678"));
        assert!(is_valid_barcode("5012345678900"));
        assert!(!is_valid_barcode("1234567"));
        assert!(!is_valid_barcode("50123456789AB"));
    }

    #[test]
    fn long_names_are_flagged() {
        let catalog = TargetCatalog::products();
        let name = catalog.field_by_str("name").unwrap();
        let long = "x".repeat(121);
        assert_eq!(
            check(name, &long),
            vec![Finding::TooLong {
                length: 121,
                max_length: 120
            }]
        );
        assert!(check(name, &"x".repeat(120)).is_empty());
    }
}
