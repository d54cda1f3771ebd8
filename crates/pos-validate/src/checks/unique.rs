//! Duplicate detection for unique fields.

use std::collections::{BTreeMap, HashMap};

use pos_model::{FieldId, TargetField};

use super::Finding;

/// Remembers the first row each value of a unique field appeared in.
///
/// Values are compared trimmed and case-insensitively.
#[derive(Debug, Default)]
pub struct UniqueTracker {
    seen: BTreeMap<FieldId, HashMap<String, usize>>,
}

impl UniqueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` at `row` and reports a duplicate if it was seen before.
    pub fn observe(&mut self, field: &TargetField, value: &str, row: usize) -> Option<Finding> {
        let trimmed = value.trim();
        if !field.unique || trimmed.is_empty() {
            return None;
        }
        let values = self.seen.entry(field.id.clone()).or_default();
        match values.get(&trimmed.to_lowercase()) {
            Some(&first_row) => Some(Finding::Duplicate {
                value: trimmed.to_string(),
                first_row,
            }),
            None => {
                values.insert(trimmed.to_lowercase(), row);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pos_model::TargetCatalog;

    use super::*;

    #[test]
    fn duplicates_point_at_first_row() {
        let catalog = TargetCatalog::products();
        let sku = catalog.field_by_str("sku").unwrap();
        let name = catalog.field_by_str("name").unwrap();
        let mut tracker = UniqueTracker::new();

        assert_eq!(tracker.observe(sku, "A-1", 1), None);
        assert_eq!(tracker.observe(sku, "B-2", 2), None);
        assert_eq!(
            tracker.observe(sku, " a-1 ", 3),
            Some(Finding::Duplicate {
                value: "a-1".to_string(),
                first_row: 1
            })
        );
        assert_eq!(tracker.observe(name, "Burger", 1), None);
        assert_eq!(tracker.observe(name, "Burger", 2), None);
    }
}
