//! Mapping state for one wizard session.
//!
//! Owns the draft [`Mapping`] together with the catalog and source schema it
//! refers to, and reports every change so the caller can invalidate
//! validation results computed from the previous mapping.

use std::collections::BTreeMap;
use std::sync::Arc;

use pos_model::{
    ColumnId, FieldId, Mapping, ResolvedMapping, SourceColumn, SourceSchema, TargetCatalog,
};
use tracing::debug;

use crate::engine::{auto_map, compute_errors, is_mapping_complete};
use crate::error::{MappingError, Result};

/// Outcome of a mapping mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct MappingChange {
    /// True when at least one assignment differs from before.
    pub changed: bool,
}

impl MappingChange {
    pub const UNCHANGED: Self = Self { changed: false };
    pub const CHANGED: Self = Self { changed: true };
}

/// Status of one field's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMappingStatus {
    /// Mapped to a column no other field uses.
    Mapped,
    /// Mapped to a column another field also uses.
    Conflict,
    /// Required and unmapped.
    Missing,
    /// Optional and unmapped.
    Unmapped,
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    /// Total number of fields in the catalog.
    pub total_fields: usize,
    /// Fields with a column assigned.
    pub mapped: usize,
    /// Total required fields.
    pub required_total: usize,
    /// Required fields with a column assigned.
    pub required_mapped: usize,
    /// Fields sharing a column with another field.
    pub conflicts: usize,
}

/// Draft mapping bound to its catalog and source schema.
#[derive(Debug, Clone)]
pub struct MappingState {
    catalog: Arc<TargetCatalog>,
    schema: SourceSchema,
    mapping: Mapping,
}

impl MappingState {
    pub fn new(catalog: Arc<TargetCatalog>, schema: SourceSchema) -> Self {
        Self {
            catalog,
            schema,
            mapping: Mapping::new(),
        }
    }

    pub fn catalog(&self) -> &TargetCatalog {
        &self.catalog
    }

    pub fn schema(&self) -> &SourceSchema {
        &self.schema
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Assigns `column` to `field`, or clears the field when `column` is `None`.
    pub fn set_mapping(
        &mut self,
        field: &FieldId,
        column: Option<&ColumnId>,
    ) -> Result<MappingChange> {
        if !self.catalog.contains(field) {
            return Err(MappingError::FieldNotFound(field.to_string()));
        }
        let previous = match column {
            Some(column) => {
                if !self.schema.contains(column) {
                    return Err(MappingError::ColumnNotFound(column.to_string()));
                }
                self.mapping.assign(field.clone(), column.clone())
            }
            None => self.mapping.clear(field),
        };
        let changed = previous.as_ref() != column;
        debug!(%field, column = ?column.map(ColumnId::as_str), changed, "set mapping");
        Ok(MappingChange { changed })
    }

    /// Runs [`auto_map`] over the unmapped fields.
    pub fn auto_map(&mut self) -> (Vec<(FieldId, ColumnId)>, MappingChange) {
        let assigned = auto_map(&self.catalog, &self.schema, &mut self.mapping);
        let change = MappingChange {
            changed: !assigned.is_empty(),
        };
        (assigned, change)
    }

    /// Assigns the given pairs to fields that are still unmapped.
    ///
    /// Pairs naming an unknown field, an unknown column, or a column already
    /// in use are skipped. Returns the pairs applied.
    pub fn fill_unmapped<I>(&mut self, pairs: I) -> (Vec<(FieldId, ColumnId)>, MappingChange)
    where
        I: IntoIterator<Item = (FieldId, ColumnId)>,
    {
        let mut applied = Vec::new();
        for (field, column) in pairs {
            if !self.catalog.contains(&field)
                || !self.schema.contains(&column)
                || self.mapping.is_mapped(&field)
                || self.mapping.is_column_used(&column)
            {
                continue;
            }
            self.mapping.assign(field.clone(), column.clone());
            applied.push((field, column));
        }
        let change = MappingChange {
            changed: !applied.is_empty(),
        };
        (applied, change)
    }

    /// Removes every assignment.
    pub fn clear_all(&mut self) -> MappingChange {
        if self.mapping.is_empty() {
            return MappingChange::UNCHANGED;
        }
        self.mapping = Mapping::new();
        MappingChange::CHANGED
    }

    /// Per-field error messages; see [`compute_errors`].
    pub fn errors(&self) -> BTreeMap<FieldId, String> {
        compute_errors(&self.catalog, &self.schema, &self.mapping)
    }

    /// All required fields mapped and no conflicts.
    pub fn is_complete(&self) -> bool {
        is_mapping_complete(&self.catalog, &self.schema, &self.mapping)
    }

    pub fn field_status(&self, field: &FieldId) -> Option<FieldMappingStatus> {
        let target = self.catalog.field(field)?;
        let status = match self.mapping.get(field) {
            Some(column) if self.mapping.fields_using(column).len() > 1 => {
                FieldMappingStatus::Conflict
            }
            Some(_) => FieldMappingStatus::Mapped,
            None if target.required => FieldMappingStatus::Missing,
            None => FieldMappingStatus::Unmapped,
        };
        Some(status)
    }

    /// Columns no field uses yet.
    pub fn available_columns(&self) -> Vec<&SourceColumn> {
        self.schema
            .columns()
            .iter()
            .filter(|c| !self.mapping.is_column_used(&c.id))
            .collect()
    }

    pub fn summary(&self) -> MappingSummary {
        let required_total = self.catalog.required_fields().count();
        let required_mapped = self
            .catalog
            .required_fields()
            .filter(|f| self.mapping.is_mapped(&f.id))
            .count();
        let conflicts = self
            .catalog
            .fields()
            .iter()
            .filter(|f| self.field_status(&f.id) == Some(FieldMappingStatus::Conflict))
            .count();

        MappingSummary {
            total_fields: self.catalog.len(),
            mapped: self.mapping.len(),
            required_total,
            required_mapped,
            conflicts,
        }
    }

    /// Validated mapping for collaborators; fails while the draft is incomplete.
    pub fn resolve(&self) -> pos_model::Result<ResolvedMapping> {
        self.mapping.resolve(&self.catalog, &self.schema)
    }
}
