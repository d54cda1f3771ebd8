//! Fuzzy column suggestions for fields auto-mapping could not fill.
//!
//! Uses Jaro-Winkler similarity between normalized labels. Suggestions only
//! order the choices offered to the user; they are never applied on their own.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler;
use serde::Serialize;

use pos_model::{ColumnId, Mapping, SourceSchema, TargetField, normalize_label};

use crate::utils::candidate_keys;

/// Confidence level categories for a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConfidenceLevel {
    /// Weak match requiring manual confirmation.
    Low,
    /// Good match that should be verified.
    Medium,
    /// Near-certain match.
    High,
}

impl ConfidenceLevel {
    /// Returns a human-readable description of the confidence level.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

/// Configurable thresholds for categorizing suggestion confidence.
///
/// - Below `low`: rejected (not suggested)
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - At or above `high`: [`ConfidenceLevel::High`]
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceThresholds {
    pub high: f32,
    pub medium: f32,
    pub low: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.95,
            medium: 0.85,
            low: 0.70,
        }
    }
}

impl ConfidenceThresholds {
    /// Categorizes a confidence score. `None` below the low threshold.
    #[must_use]
    pub fn categorize(&self, confidence: f32) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }
}

/// A ranked candidate column for one field.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSuggestion {
    pub column: ColumnId,
    pub label: String,
    pub confidence: f32,
    pub level: ConfidenceLevel,
}

/// Ranks source columns for `field`, best first.
///
/// Columns already used by another field are left out. Ties keep schema order.
pub fn suggest_columns(
    field: &TargetField,
    schema: &SourceSchema,
    mapping: &Mapping,
    thresholds: &ConfidenceThresholds,
) -> Vec<ColumnSuggestion> {
    let keys = candidate_keys(field);
    let mut suggestions: Vec<ColumnSuggestion> = schema
        .columns()
        .iter()
        .filter(|column| {
            mapping
                .fields_using(&column.id)
                .iter()
                .all(|used_by| **used_by == field.id)
        })
        .filter_map(|column| {
            let label = normalize_label(&column.label);
            let confidence = keys
                .iter()
                .map(|key| jaro_winkler::similarity(key.chars(), label.chars()) as f32)
                .fold(0.0_f32, f32::max);
            let level = thresholds.categorize(confidence)?;
            Some(ColumnSuggestion {
                column: column.id.clone(),
                label: column.label.clone(),
                confidence,
                level,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    suggestions
}

#[cfg(test)]
mod tests {
    use pos_model::{FieldId, TargetCatalog};

    use super::*;

    #[test]
    fn exact_alias_ranks_first_with_high_confidence() {
        let catalog = TargetCatalog::products();
        let price = catalog.field_by_str("price").unwrap();
        let schema = SourceSchema::from_labels(["Colour", "Unit Price", "Prices"]);

        let suggestions =
            suggest_columns(price, &schema, &Mapping::new(), &ConfidenceThresholds::default());

        assert_eq!(suggestions[0].label, "Unit Price");
        assert_eq!(suggestions[0].level, ConfidenceLevel::High);
        assert!(suggestions.iter().all(|s| s.label != "Colour"));
    }

    #[test]
    fn columns_used_elsewhere_are_not_suggested() {
        let catalog = TargetCatalog::products();
        let price = catalog.field_by_str("price").unwrap();
        let schema = SourceSchema::from_labels(["Price"]);
        let mut mapping = Mapping::new();
        mapping.assign(FieldId::new("sku").unwrap(), ColumnId::positional(0));

        let suggestions =
            suggest_columns(price, &schema, &mapping, &ConfidenceThresholds::default());
        assert!(suggestions.is_empty());
    }

    #[test]
    fn thresholds_categorize_boundaries() {
        let t = ConfidenceThresholds::default();
        assert_eq!(t.categorize(0.95), Some(ConfidenceLevel::High));
        assert_eq!(t.categorize(0.90), Some(ConfidenceLevel::Medium));
        assert_eq!(t.categorize(0.75), Some(ConfidenceLevel::Low));
        assert_eq!(t.categorize(0.5), None);
    }
}
