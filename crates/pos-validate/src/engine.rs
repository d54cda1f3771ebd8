//! Validation engine.
//!
//! Runs every built-in check over every mapped cell and folds the findings
//! into a [`ValidationReport`]: the issue list, the summary counts, and a
//! handful of preview rows.

use std::collections::BTreeMap;

use chrono::Utc;
use pos_model::{
    IssueId, IssueType, ResolvedMapping, RowStatus, SampleRow, SourceData, TargetCatalog,
    TargetField, ValidationIssue, ValidationReport, ValidationSummary,
};
use tracing::{debug, info};

use crate::checks::unique::UniqueTracker;
use crate::checks::{Finding, format, numeric, required};

/// Number of preview rows a report carries by default.
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

/// Produces a validation report for a resolved mapping.
///
/// Implementations must be deterministic for a given input apart from the
/// report timestamp.
pub trait Validator: Send + Sync {
    fn validate(
        &self,
        catalog: &TargetCatalog,
        mapping: &ResolvedMapping,
        data: &SourceData,
    ) -> ValidationReport;
}

/// Built-in row-by-row validator.
#[derive(Debug, Clone)]
pub struct RowValidator {
    sample_rows: usize,
}

impl Default for RowValidator {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

impl RowValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many preview rows the report carries.
    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    pub fn sample_rows(&self) -> usize {
        self.sample_rows
    }
}

impl Validator for RowValidator {
    fn validate(
        &self,
        catalog: &TargetCatalog,
        mapping: &ResolvedMapping,
        data: &SourceData,
    ) -> ValidationReport {
        let fields: Vec<(&TargetField, usize)> = catalog
            .fields()
            .iter()
            .filter_map(|field| {
                let column = mapping.column_for(&field.id)?;
                let position = data.schema.position(column)?;
                Some((field, position))
            })
            .collect();

        let mut unique = UniqueTracker::new();
        let mut issues = Vec::new();
        let mut samples = Vec::new();
        let (mut passed, mut failed, mut warnings, mut skipped) = (0, 0, 0, 0);

        for (index, cells) in data.rows.iter().enumerate() {
            let row = index + 1;
            if cells.iter().all(|cell| cell.trim().is_empty()) {
                skipped += 1;
                continue;
            }

            let mut values = BTreeMap::new();
            let mut row_issues: Vec<ValidationIssue> = Vec::new();
            for &(field, position) in &fields {
                let value = cells.get(position).map_or("", String::as_str);
                values.insert(field.id.clone(), value.trim().to_string());

                for finding in check_cell(field, value, row, &mut unique) {
                    row_issues.push(ValidationIssue {
                        id: IssueId::sequential(issues.len() + row_issues.len() + 1),
                        row,
                        field: field.id.clone(),
                        message: finding.message(field),
                        hint: Some(finding.hint(field)),
                        issue_type: finding.issue_type(),
                    });
                }
            }

            let status = row_status(&row_issues);
            match status {
                RowStatus::Valid => passed += 1,
                RowStatus::Warning => warnings += 1,
                RowStatus::Error => failed += 1,
            }

            if samples.len() < self.sample_rows {
                samples.push(SampleRow {
                    row,
                    status,
                    values,
                    message: sample_message(&row_issues),
                });
            }
            issues.extend(row_issues);
        }

        let summary = ValidationSummary {
            total_rows: data.row_count(),
            passed,
            failed,
            warnings,
            skipped,
            validated_at: Utc::now(),
        };
        info!(
            total = summary.total_rows,
            passed, failed, warnings, skipped, "validation finished"
        );
        debug!(issues = issues.len(), "validation issues collected");

        ValidationReport {
            summary,
            issues,
            samples,
        }
    }
}

/// Runs every check for one cell, in a fixed order.
fn check_cell(
    field: &TargetField,
    value: &str,
    row: usize,
    unique: &mut UniqueTracker,
) -> Vec<Finding> {
    if let Some(finding) = required::check(field, value) {
        return vec![finding];
    }
    let mut findings = numeric::check(field, value);
    findings.extend(format::check(field, value));
    findings.extend(unique.observe(field, value, row));
    findings
}

fn row_status(issues: &[ValidationIssue]) -> RowStatus {
    if issues.iter().any(|i| i.issue_type == IssueType::Error) {
        RowStatus::Error
    } else if issues.is_empty() {
        RowStatus::Valid
    } else {
        RowStatus::Warning
    }
}

/// Message of the most severe issue, errors first.
fn sample_message(issues: &[ValidationIssue]) -> Option<String> {
    issues
        .iter()
        .find(|i| i.is_error())
        .or_else(|| issues.first())
        .map(|i| i.message.clone())
}

#[cfg(test)]
mod tests {
    use pos_model::{ColumnId, FieldId, Mapping, SourceSchema};

    use super::*;

    fn data(rows: &[&[&str]]) -> (TargetCatalog, ResolvedMapping, SourceData) {
        let catalog = TargetCatalog::products();
        let schema = SourceSchema::from_labels(["SKU", "Name", "Price", "Category", "Stock"]);
        let mut mapping = Mapping::new();
        for (index, id) in ["sku", "name", "price", "category", "stock"].iter().enumerate() {
            mapping.assign(FieldId::new(*id).unwrap(), ColumnId::positional(index));
        }
        let resolved = mapping.resolve(&catalog, &schema).unwrap();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        (catalog, resolved, SourceData::new(schema, rows))
    }

    #[test]
    fn blank_rows_are_skipped() {
        let (catalog, mapping, data) = data(&[
            &["A1", "Burger", "9.50", "Mains", "3"],
            &["", " ", "", "", ""],
        ]);
        let report = RowValidator::new().validate(&catalog, &mapping, &data);
        assert_eq!(report.summary.total_rows, 2);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.samples.len(), 1);
    }

    #[test]
    fn required_blank_suppresses_other_checks() {
        let (catalog, mapping, data) = data(&[&["A1", "Burger", "", "Mains", ""]]);
        let report = RowValidator::new().validate(&catalog, &mapping, &data);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].message, "Price is required");
        assert_eq!(report.samples[0].status, RowStatus::Error);
    }

    #[test]
    fn issue_ids_are_sequential_across_rows() {
        let (catalog, mapping, data) = data(&[
            &["A1", "", "x", "Mains", ""],
            &["A1", "Fries", "1", "Sides", "-1"],
        ]);
        let report = RowValidator::new().validate(&catalog, &mapping, &data);
        let ids: Vec<&str> = report.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["issue-1", "issue-2", "issue-3", "issue-4"]);
        assert_eq!(report.summary.failed, 2);
    }
}
