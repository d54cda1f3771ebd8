//! Utility functions for mapping operations.

use std::collections::BTreeSet;

use pos_model::{TargetField, normalize_label};

/// Normalized labels a source column may carry to match `field`: the field
/// label, its id, and every alias.
pub fn candidate_keys(field: &TargetField) -> BTreeSet<String> {
    std::iter::once(field.label.as_str())
        .chain(std::iter::once(field.id.as_str()))
        .chain(field.aliases.iter().map(String::as_str))
        .map(normalize_label)
        .filter(|key| !key.is_empty())
        .collect()
}
