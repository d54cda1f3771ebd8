//! Required value presence.

use pos_model::TargetField;

use super::Finding;

/// Blank values in a required field.
pub fn check(field: &TargetField, value: &str) -> Option<Finding> {
    (field.required && value.trim().is_empty()).then_some(Finding::RequiredEmpty)
}
