//! Auto-mapping and mapping error computation.
//!
//! Everything here is a pure function of the catalog, the source schema and
//! the draft mapping; the engine never performs I/O.

use std::collections::BTreeMap;

use pos_model::{ColumnId, FieldId, Mapping, SourceSchema, TargetCatalog, normalize_label};
use tracing::debug;

use crate::utils::candidate_keys;

/// Fills unmapped fields by normalized label and alias matching.
///
/// Fields are visited in catalog order. For each unmapped field the first
/// source column (in schema order) whose normalized label is one of the
/// field's candidate keys, and that no field uses yet, is assigned. Existing
/// assignments are never overwritten.
///
/// Returns the assignments made, in the order they were made.
pub fn auto_map(
    catalog: &TargetCatalog,
    schema: &SourceSchema,
    mapping: &mut Mapping,
) -> Vec<(FieldId, ColumnId)> {
    let normalized: Vec<(ColumnId, String)> = schema
        .columns()
        .iter()
        .map(|c| (c.id.clone(), normalize_label(&c.label)))
        .collect();

    let mut assigned = Vec::new();
    for field in catalog.fields() {
        if mapping.is_mapped(&field.id) {
            continue;
        }
        let keys = candidate_keys(field);
        let hit = normalized
            .iter()
            .find(|(id, label)| keys.contains(label) && !mapping.is_column_used(id));
        if let Some((column, _)) = hit {
            mapping.assign(field.id.clone(), column.clone());
            assigned.push((field.id.clone(), column.clone()));
        }
    }

    debug!(assigned = assigned.len(), "auto-map complete");
    assigned
}

/// Per-field mapping errors.
///
/// A required field without a column gets `"<Label> is required"`. A column
/// used by several fields gives each of them an error naming the others, so
/// conflicts are always reported symmetrically.
pub fn compute_errors(
    catalog: &TargetCatalog,
    schema: &SourceSchema,
    mapping: &Mapping,
) -> BTreeMap<FieldId, String> {
    let mut errors = BTreeMap::new();

    for field in catalog.fields() {
        match mapping.get(&field.id) {
            None if field.required => {
                errors.insert(field.id.clone(), format!("{} is required", field.label));
            }
            None => {}
            Some(column) => {
                let others: Vec<&str> = catalog
                    .fields()
                    .iter()
                    .filter(|other| {
                        other.id != field.id && mapping.get(&other.id) == Some(column)
                    })
                    .map(|other| other.label.as_str())
                    .collect();
                if !others.is_empty() {
                    errors.insert(
                        field.id.clone(),
                        format!(
                            "Column '{}' is also mapped to {}",
                            schema.label_of(column),
                            others.join(", ")
                        ),
                    );
                }
            }
        }
    }

    errors
}

/// True when every required field is mapped and there are no conflicts.
///
/// This is the sole gate for leaving the mapping step.
pub fn is_mapping_complete(
    catalog: &TargetCatalog,
    schema: &SourceSchema,
    mapping: &Mapping,
) -> bool {
    catalog
        .required_fields()
        .all(|field| mapping.is_mapped(&field.id))
        && compute_errors(catalog, schema, mapping).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: &str) -> FieldId {
        FieldId::new(id).unwrap()
    }

    #[test]
    fn auto_map_matches_labels_and_aliases() {
        let catalog = TargetCatalog::products();
        let schema =
            SourceSchema::from_labels(["Item Code", "Product Name", "Unit Price ($)", "Dept"]);
        let mut mapping = Mapping::new();

        let assigned = auto_map(&catalog, &schema, &mut mapping);

        assert_eq!(assigned.len(), 3);
        assert_eq!(mapping.get(&field("sku")), Some(&ColumnId::positional(0)));
        assert_eq!(mapping.get(&field("name")), Some(&ColumnId::positional(1)));
        assert_eq!(mapping.get(&field("price")), Some(&ColumnId::positional(2)));
        assert!(!mapping.is_mapped(&field("category")));
    }

    #[test]
    fn auto_map_skips_columns_already_in_use() {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(["SKU", "Price"]);
        let mut mapping = Mapping::new();
        mapping.assign(field("name"), ColumnId::positional(0));

        auto_map(&catalog, &schema, &mut mapping);

        assert!(!mapping.is_mapped(&field("sku")));
        assert_eq!(mapping.get(&field("price")), Some(&ColumnId::positional(1)));
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(["a"]);
        let errors = compute_errors(&catalog, &schema, &Mapping::new());
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[&field("sku")], "SKU is required");
        assert!(!errors.contains_key(&field("barcode")));
    }
}
