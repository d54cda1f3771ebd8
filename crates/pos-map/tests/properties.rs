use pos_map::{auto_map, compute_errors, is_mapping_complete};
use pos_model::{ColumnId, FieldId, Mapping, SourceSchema, TargetCatalog};
use proptest::prelude::*;

const LABELS: &[&str] = &[
    "SKU",
    "Item Code",
    "Name",
    "Product Name",
    "Price",
    "Unit Price",
    "Category",
    "Department",
    "Description",
    "Stock",
    "UPC",
    "Notes",
    "Colour",
];

fn labels() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(LABELS), 1..8)
}

fn assignments(columns: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    let fields = TargetCatalog::products().len();
    prop::collection::vec((0..fields, 0..columns), 0..6)
}

fn build(catalog: &TargetCatalog, pairs: &[(usize, usize)]) -> Mapping {
    let mut mapping = Mapping::new();
    for &(f, c) in pairs {
        mapping.assign(catalog.fields()[f].id.clone(), ColumnId::positional(c));
    }
    mapping
}

fn field(id: &str) -> FieldId {
    FieldId::new(id).unwrap()
}

proptest! {
    #[test]
    fn auto_map_never_overwrites(labels in labels(), pairs in assignments(8)) {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(labels.iter().copied());
        let pairs: Vec<_> = pairs.into_iter().filter(|&(_, c)| c < schema.len()).collect();
        let mut mapping = build(&catalog, &pairs);
        let before = mapping.clone();

        auto_map(&catalog, &schema, &mut mapping);

        for (field, column) in before.iter() {
            prop_assert_eq!(mapping.get(field), Some(column));
        }
    }

    #[test]
    fn auto_map_is_deterministic(labels in labels()) {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(labels.iter().copied());
        let mut first = Mapping::new();
        let mut second = Mapping::new();
        auto_map(&catalog, &schema, &mut first);
        auto_map(&catalog, &schema, &mut second);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn auto_map_from_empty_creates_no_conflicts(labels in labels()) {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(labels.iter().copied());
        let mut mapping = Mapping::new();
        auto_map(&catalog, &schema, &mut mapping);
        let errors = compute_errors(&catalog, &schema, &mapping);
        prop_assert!(errors.values().all(|e| e.ends_with("is required")));
    }

    #[test]
    fn conflicts_are_symmetric(pairs in assignments(3)) {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(["a", "b", "c"]);
        let mapping = build(&catalog, &pairs);
        let errors = compute_errors(&catalog, &schema, &mapping);

        for (a, col_a) in mapping.iter() {
            for (b, col_b) in mapping.iter() {
                if a != b && col_a == col_b {
                    prop_assert!(errors.contains_key(a));
                    prop_assert!(errors.contains_key(b));
                }
            }
        }
    }

    #[test]
    fn gate_requires_every_required_field(pairs in assignments(7)) {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(["a", "b", "c", "d", "e", "f", "g"]);
        let mapping = build(&catalog, &pairs);

        if is_mapping_complete(&catalog, &schema, &mapping) {
            for id in ["sku", "name", "price", "category"] {
                prop_assert!(mapping.is_mapped(&field(id)));
            }
            prop_assert!(compute_errors(&catalog, &schema, &mapping).is_empty());
        }
    }
}
