use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pos_model::{IssueType, RowStatus, TargetCatalog, ValidationReport};

use crate::types::{MappingRow, RunOutcome};

pub fn print_fields(catalog: &TargetCatalog) {
    println!("Catalog: {}", catalog.name());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Example"),
        header_cell("Aliases"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in catalog.fields() {
        table.add_row(vec![
            Cell::new(field.id.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&field.label),
            Cell::new(field.kind.label()),
            flag_cell(field.required),
            optional_cell(field.example.as_deref()),
            if field.aliases.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(field.aliases.join(", "))
            },
        ]);
    }
    println!("{table}");
}

pub fn print_outcome(outcome: &RunOutcome) {
    println!("File: {}", outcome.file.display());
    if let Some(template) = &outcome.template {
        println!("Template: {template}");
    }
    if let Some(path) = &outcome.saved_template {
        println!("Saved template: {}", path.display());
    }
    if !outcome.mapping.is_empty() {
        print_mapping(&outcome.mapping);
    }
    if let Some(report) = &outcome.report {
        print_validation(report);
        print_samples(report);
    }
    if !outcome.outstanding.is_empty() {
        print_issues(outcome);
    }
    println!();
    match (&outcome.receipt, &outcome.blocked) {
        (Some(receipt), _) => println!(
            "Imported {} product(s), skipped {} blank row(s) at {}",
            receipt.imported,
            receipt.skipped,
            receipt.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        (None, Some(reason)) => println!("Stopped at {}: {reason}", outcome.step.title()),
        (None, None) => println!("Stopped at {}", outcome.step.title()),
    }
}

fn print_mapping(rows: &[MappingRow]) {
    println!();
    println!("Mapping:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Required"),
        header_cell("Column"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.label),
            flag_cell(row.required),
            optional_cell(row.column.as_deref()),
            match &row.error {
                Some(error) => Cell::new(error).fg(Color::Red),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

fn print_validation(report: &ValidationReport) {
    let summary = &report.summary;
    println!();
    println!("Validation:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Passed"),
        header_cell("Failed"),
        header_cell("Warnings"),
        header_cell("Skipped"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total_rows).add_attribute(Attribute::Bold),
        count_cell(summary.passed, Color::Green),
        count_cell(summary.failed, Color::Red),
        count_cell(summary.warnings, Color::Yellow),
        dim_cell(summary.skipped),
    ]);
    println!("{table}");
}

fn print_samples(report: &ValidationReport) {
    if report.samples.is_empty() {
        return;
    }
    println!();
    println!("Preview:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Status"),
        header_cell("Values"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for sample in &report.samples {
        let values = sample
            .values
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(sample.row),
            status_cell(sample.status),
            Cell::new(values),
            optional_cell(sample.message.as_deref()),
        ]);
    }
    println!("{table}");
}

fn print_issues(outcome: &RunOutcome) {
    println!();
    println!("Issues:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Issue"),
        header_cell("Row"),
        header_cell("Type"),
        header_cell("Field"),
        header_cell("Message"),
        header_cell("Hint"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut issues: Vec<_> = outcome.outstanding.iter().collect();
    issues.sort_by_key(|issue| (issue.issue_type, issue.row));
    for issue in issues {
        table.add_row(vec![
            dim_cell(&issue.id),
            Cell::new(issue.row),
            issue_type_cell(issue.issue_type),
            Cell::new(&issue.field),
            Cell::new(&issue.message),
            optional_cell(issue.hint.as_deref()),
        ]);
    }
    println!("{table}");
    if !outcome.resolved.is_empty() {
        println!("{} issue(s) marked resolved", outcome.resolved.len());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn issue_type_cell(issue_type: IssueType) -> Cell {
    match issue_type {
        IssueType::Error => Cell::new("ERROR").fg(Color::Red),
        IssueType::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn status_cell(status: RowStatus) -> Cell {
    let color = match status {
        RowStatus::Valid => Color::Green,
        RowStatus::Warning => Color::Yellow,
        RowStatus::Error => Color::Red,
    };
    Cell::new(status.label()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
