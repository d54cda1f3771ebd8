use pos_model::{
    ColumnId, FieldId, IssueId, IssueType, Mapping, ResolvedMapping, RowStatus, SourceData,
    SourceSchema, TargetCatalog,
};
use pos_validate::{RowValidator, ValidationStatus, ValidationTracker, Validator};
use proptest::prelude::*;

const HEADER: [&str; 6] = ["SKU", "Name", "Price", "Category", "Stock", "Barcode"];

fn resolved(catalog: &TargetCatalog, schema: &SourceSchema) -> ResolvedMapping {
    let mut mapping = Mapping::new();
    for (index, id) in ["sku", "name", "price", "category", "stock", "barcode"]
        .iter()
        .enumerate()
    {
        mapping.assign(FieldId::new(*id).unwrap(), ColumnId::positional(index));
    }
    mapping.resolve(catalog, schema).expect("complete mapping")
}

fn source(rows: &[[&str; 6]]) -> SourceData {
    let rows = rows
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();
    SourceData::new(SourceSchema::from_labels(HEADER), rows)
}

fn run(rows: &[[&str; 6]]) -> pos_model::ValidationReport {
    let catalog = TargetCatalog::products();
    let data = source(rows);
    let mapping = resolved(&catalog, &data.schema);
    RowValidator::new().validate(&catalog, &mapping, &data)
}

/// One error and two warnings.
fn mixed_rows() -> Vec<[&'static str; 6]> {
    vec![
        ["BURG-001", "Classic Burger", "12.50", "Mains", "10", "5012345678900"],
        ["BURG-002", "Cheese Burger", "abc", "Mains", "4", ""],
        ["SIDE-001", "Fries", "3.999", "Sides", "-2", ""],
        ["DRNK-001", "Cola", "2.00", "Drinks", "", ""],
    ]
}

#[test]
fn report_counts_rows_by_worst_issue() {
    let report = run(&mixed_rows());

    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 2);
    assert_eq!(report.summary.total_rows, 4);
    assert_eq!(report.summary.passed, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.warnings, 1);
    assert_eq!(report.summary.skipped, 0);

    let statuses: Vec<RowStatus> = report.samples.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        [
            RowStatus::Valid,
            RowStatus::Error,
            RowStatus::Warning,
            RowStatus::Valid
        ]
    );
    assert_eq!(
        report.samples[1].message.as_deref(),
        Some("Price must be a number ('abc')")
    );
}

#[test]
fn issues_snapshot() {
    let report = run(&mixed_rows());
    insta::assert_json_snapshot!(report.issues, @r#"
    [
      {
        "id": "issue-1",
        "row": 2,
        "field": "price",
        "message": "Price must be a number ('abc')",
        "hint": "Use digits and a decimal point only, e.g. 12.50",
        "type": "error"
      },
      {
        "id": "issue-2",
        "row": 3,
        "field": "price",
        "message": "Price has more than 2 decimal places (3.999)",
        "hint": "Value will be rounded to 2 decimal places",
        "type": "warning"
      },
      {
        "id": "issue-3",
        "row": 3,
        "field": "stock",
        "message": "Stock Quantity is negative (-2)",
        "hint": "Negative quantities are imported as back-orders",
        "type": "warning"
      }
    ]
    "#);
}

#[test]
fn duplicate_sku_and_bad_barcode() {
    let report = run(&[
        ["A-1", "Soup", "4", "Starters", "", "123"],
        ["a-1", "Salad", "5", "Starters", "", "12345678"],
    ]);
    let messages: Vec<(&str, IssueType)> = report
        .issues
        .iter()
        .map(|i| (i.message.as_str(), i.issue_type))
        .collect();
    assert_eq!(
        messages,
        [
            ("'123' is not a valid barcode", IssueType::Warning),
            ("Duplicate SKU 'a-1' (first used in row 1)", IssueType::Error),
        ]
    );
}

#[test]
fn samples_are_limited() {
    let rows: Vec<[&str; 6]> = (0..8)
        .map(|_| ["", "", "", "", "", ""])
        .chain(std::iter::once(["X", "Y", "1", "Z", "", ""]))
        .collect();
    let report = run(&rows);
    assert_eq!(report.summary.skipped, 8);
    assert_eq!(report.samples.len(), 1);
    assert_eq!(report.samples[0].row, 9);

    let catalog = TargetCatalog::products();
    let data = source(&mixed_rows());
    let mapping = resolved(&catalog, &data.schema);
    let report = RowValidator::new()
        .with_sample_rows(2)
        .validate(&catalog, &mapping, &data);
    assert_eq!(report.samples.len(), 2);
}

#[test]
fn resolving_the_error_opens_the_gate() {
    let mut tracker = ValidationTracker::new();
    let ticket = tracker.begin();
    assert_eq!(tracker.status(), ValidationStatus::Running);
    assert!(!tracker.is_complete());

    assert!(tracker.complete(ticket, run(&mixed_rows())));
    assert!(!tracker.is_complete());
    assert_eq!(tracker.blocking_issues().count(), 1);

    assert!(tracker.resolve_issue(&IssueId::sequential(1)));
    assert!(tracker.is_complete());
    assert_eq!(tracker.outstanding_warnings().count(), 2);
    assert_eq!(tracker.summary().map(|s| s.failed), Some(1));
}

#[test]
fn rerun_resets_resolutions() {
    let mut tracker = ValidationTracker::new();
    let ticket = tracker.begin();
    tracker.complete(ticket, run(&mixed_rows()));
    tracker.resolve_issue(&IssueId::sequential(2));

    let ticket = tracker.begin();
    tracker.complete(ticket, run(&mixed_rows()));
    assert_eq!(tracker.resolved_count(), 0);
    assert_eq!(tracker.outstanding_issues().count(), 3);
}

proptest! {
    #[test]
    fn summary_partitions_rows(
        prices in prop::collection::vec(
            prop::sample::select(vec!["1", "1.999", "-4", "x", "", "2.50"]),
            0..20,
        ),
        blank in prop::collection::vec(any::<bool>(), 20),
    ) {
        let rows: Vec<[&str; 6]> = prices
            .iter()
            .enumerate()
            .map(|(n, price)| {
                if blank[n] {
                    ["", "", "", "", "", ""]
                } else {
                    ["S", "N", *price, "C", "", ""]
                }
            })
            .collect();
        let report = run(&rows);
        let s = &report.summary;
        prop_assert_eq!(s.passed + s.failed + s.warnings + s.skipped, s.total_rows);
        prop_assert!(report.samples.len() <= 5);
    }
}
