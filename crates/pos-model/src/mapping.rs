//! Field-to-column mappings.
//!
//! [`Mapping`] is the editable draft the user works on; it may transiently
//! hold conflicts so they can be reported next to the offending fields.
//! [`Mapping::resolve`] is the only way to obtain a [`ResolvedMapping`], in
//! which every required field is mapped and no column is used twice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::TargetCatalog;
use crate::error::{ModelError, Result};
use crate::ids::{ColumnId, FieldId};
use crate::source::SourceSchema;

/// Draft assignment of source columns to target fields.
///
/// A field absent from the map is unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    assignments: BTreeMap<FieldId, ColumnId>,
}

/// Reason a draft mapping cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingViolation {
    /// Field is not part of the catalog.
    UnknownField(FieldId),
    /// Column is not part of the source schema.
    UnknownColumn { field: FieldId, column: ColumnId },
    /// Required field has no column.
    RequiredUnmapped(FieldId),
    /// Column is assigned to more than one field.
    SharedColumn {
        column: ColumnId,
        fields: Vec<FieldId>,
    },
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &FieldId) -> Option<&ColumnId> {
        self.assignments.get(field)
    }

    pub fn is_mapped(&self, field: &FieldId) -> bool {
        self.assignments.contains_key(field)
    }

    /// Assigns `column` to `field`, returning the previous column.
    pub fn assign(&mut self, field: FieldId, column: ColumnId) -> Option<ColumnId> {
        self.assignments.insert(field, column)
    }

    /// Clears `field`, returning the column it pointed at.
    pub fn clear(&mut self, field: &FieldId) -> Option<ColumnId> {
        self.assignments.remove(field)
    }

    /// Fields currently pointing at `column`, in field id order.
    pub fn fields_using(&self, column: &ColumnId) -> Vec<&FieldId> {
        self.assignments
            .iter()
            .filter(|(_, c)| *c == column)
            .map(|(f, _)| f)
            .collect()
    }

    pub fn is_column_used(&self, column: &ColumnId) -> bool {
        self.assignments.values().any(|c| c == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &ColumnId)> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Lists every reason this draft cannot be resolved, in catalog order.
    pub fn violations(
        &self,
        catalog: &TargetCatalog,
        schema: &SourceSchema,
    ) -> Vec<MappingViolation> {
        let mut violations = Vec::new();

        for (field, column) in &self.assignments {
            if !catalog.contains(field) {
                violations.push(MappingViolation::UnknownField(field.clone()));
            } else if !schema.contains(column) {
                violations.push(MappingViolation::UnknownColumn {
                    field: field.clone(),
                    column: column.clone(),
                });
            }
        }

        for field in catalog.required_fields() {
            if !self.is_mapped(&field.id) {
                violations.push(MappingViolation::RequiredUnmapped(field.id.clone()));
            }
        }

        let mut by_column: BTreeMap<&ColumnId, Vec<FieldId>> = BTreeMap::new();
        for (field, column) in &self.assignments {
            by_column.entry(column).or_default().push(field.clone());
        }
        for (column, fields) in by_column {
            if fields.len() > 1 {
                violations.push(MappingViolation::SharedColumn {
                    column: column.clone(),
                    fields,
                });
            }
        }

        violations
    }

    /// Validated construction of a [`ResolvedMapping`].
    pub fn resolve(
        &self,
        catalog: &TargetCatalog,
        schema: &SourceSchema,
    ) -> Result<ResolvedMapping> {
        let violations = self.violations(catalog, schema);
        if !violations.is_empty() {
            return Err(ModelError::UnresolvedMapping(violations));
        }
        Ok(ResolvedMapping {
            assignments: self.assignments.clone(),
        })
    }
}

/// A mapping known to be complete and conflict-free.
///
/// Only [`Mapping::resolve`] constructs this type, so collaborators that take
/// a `ResolvedMapping` never see a shared column or a missing required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedMapping {
    assignments: BTreeMap<FieldId, ColumnId>,
}

impl ResolvedMapping {
    pub fn column_for(&self, field: &FieldId) -> Option<&ColumnId> {
        self.assignments.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &ColumnId)> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
