//! End-to-end runs of the `run` command against CSV files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use pos_cli::cli::{Cli, Command, MapArg, RunArgs};
use pos_cli::commands::{run_fields, run_import};
use pos_wizard::Step;
use tempfile::TempDir;

const CLEAN: &str = "SKU,Product Name,Price,Category,Stock\n\
                     A1,Latte,4.50,Drinks,10\n\
                     A2,Bagel,3.25,Bakery,4\n";

const MIXED: &str = "SKU,Product Name,Price,Category,Stock\n\
                     A1,Latte,4.50,Drinks,10\n\
                     A2,Mocha,twelve,Drinks,5\n\
                     A3,Tea,3.999,Drinks,-2\n";

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write csv");
    path
}

fn run_args(file: &Path, templates: &Path, extra: &[&str]) -> RunArgs {
    let mut argv = vec![
        "pos-import".to_string(),
        "run".to_string(),
        file.display().to_string(),
        "--no-delay".to_string(),
        "--templates-dir".to_string(),
        templates.display().to_string(),
    ];
    argv.extend(extra.iter().map(|arg| (*arg).to_string()));
    match Cli::try_parse_from(argv).expect("parse args").command {
        Command::Run(args) => args,
        Command::Fields(_) => panic!("expected run"),
    }
}

#[test]
fn map_arg_parses_field_and_column() {
    let arg: MapArg = "price = Unit Cost".parse().expect("parse");
    assert_eq!(
        arg,
        MapArg {
            field: "price".to_string(),
            column: "Unit Cost".to_string(),
        }
    );
    assert!("price".parse::<MapArg>().is_err());
    assert!("=Cost".parse::<MapArg>().is_err());
    assert!("price=".parse::<MapArg>().is_err());
}

#[test]
fn fields_lists_builtin_catalog() {
    let cli = Cli::try_parse_from(["pos-import", "fields"]).expect("parse");
    let Command::Fields(args) = cli.command else {
        panic!("expected fields");
    };
    let catalog = run_fields(&args).expect("catalog");
    assert_eq!(catalog.name(), "products");
    assert_eq!(catalog.required_fields().count(), 4);
}

#[test]
fn clean_file_imports_every_row() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_csv(&dir, "products.csv", CLEAN);
    let args = run_args(&file, &dir.path().join("templates"), &[]);

    let outcome = run_import(&args).expect("run");

    assert!(outcome.is_complete(), "blocked: {:?}", outcome.blocked);
    assert_eq!(outcome.step, Step::Review);
    let receipt = outcome.receipt.expect("receipt");
    assert_eq!(receipt.imported, 2);
    assert_eq!(receipt.skipped, 0);
    let report = outcome.report.expect("report");
    assert_eq!(report.summary.passed, 2);
    assert!(outcome.outstanding.is_empty());
}

#[test]
fn blocking_errors_stop_at_validation() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_csv(&dir, "products.csv", MIXED);
    let args = run_args(&file, &dir.path().join("templates"), &[]);

    let outcome = run_import(&args).expect("run");

    assert!(!outcome.is_complete());
    assert_eq!(outcome.step, Step::Validation);
    let blocked = outcome.blocked.expect("blocked");
    assert!(blocked.starts_with("1 blocking issue"), "{blocked}");
    assert_eq!(outcome.outstanding.len(), 3);
}

#[test]
fn warnings_need_acknowledgement() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_csv(&dir, "products.csv", MIXED);
    let templates = dir.path().join("templates");

    let outcome = run_import(&run_args(&file, &templates, &["--resolve-all"])).expect("run");
    assert_eq!(outcome.step, Step::Review);
    assert_eq!(outcome.resolved.len(), 1);
    let blocked = outcome.blocked.expect("blocked");
    assert!(blocked.starts_with("2 outstanding warning"), "{blocked}");
    assert!(outcome.receipt.is_none());

    let outcome = run_import(&run_args(
        &file,
        &templates,
        &["--resolve-all", "--acknowledge-warnings"],
    ))
    .expect("run");
    assert!(outcome.is_complete(), "blocked: {:?}", outcome.blocked);
    assert_eq!(outcome.receipt.expect("receipt").imported, 3);
}

#[test]
fn resolving_by_issue_id() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_csv(&dir, "products.csv", MIXED);
    let templates = dir.path().join("templates");

    let first = run_import(&run_args(&file, &templates, &[])).expect("run");
    let error = first
        .outstanding
        .iter()
        .find(|issue| issue.is_error())
        .expect("error issue");
    let id = error.id.to_string();

    let outcome = run_import(&run_args(
        &file,
        &templates,
        &["--resolve", &id, "--acknowledge-warnings"],
    ))
    .expect("run");
    assert!(outcome.is_complete(), "blocked: {:?}", outcome.blocked);
    assert_eq!(outcome.resolved.len(), 1);
}

#[test]
fn without_auto_map_required_fields_are_missing() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_csv(&dir, "products.csv", CLEAN);
    let args = run_args(&file, &dir.path().join("templates"), &["--no-auto-map"]);

    let outcome = run_import(&args).expect("run");

    assert_eq!(outcome.step, Step::Mapping);
    assert_eq!(outcome.blocked.as_deref(), Some("Mapping is incomplete"));
    let rendered: Vec<String> = outcome
        .mapping
        .iter()
        .map(|row| {
            format!(
                "{} -> {} ({})",
                row.field,
                row.column.as_deref().unwrap_or("-"),
                row.error.as_deref().unwrap_or("ok")
            )
        })
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    sku -> - (SKU is required)
    name -> - (Product Name is required)
    price -> - (Price is required)
    category -> - (Category is required)
    description -> - (ok)
    stock -> - (ok)
    barcode -> - (ok)
    ");
}

#[test]
fn explicit_mapping_and_templates() {
    let dir = TempDir::new().expect("tempdir");
    let templates = dir.path().join("templates");
    let file = write_csv(
        &dir,
        "supplier.csv",
        "SKU,Name,Cost,Category\nB1,Scone,2.75,Bakery\n",
    );

    let outcome = run_import(&run_args(
        &file,
        &templates,
        &["--map", "price=Cost", "--save-template", "Supplier Feed"],
    ))
    .expect("run");
    assert!(outcome.is_complete(), "blocked: {:?}", outcome.blocked);
    let saved = outcome.saved_template.expect("saved template");
    assert!(saved.exists());

    let outcome = run_import(&run_args(
        &file,
        &templates,
        &["--no-auto-map", "--template", "Supplier Feed"],
    ))
    .expect("run");
    assert!(outcome.is_complete(), "blocked: {:?}", outcome.blocked);
    assert_eq!(outcome.template.as_deref(), Some("Supplier Feed"));
    let price = outcome
        .mapping
        .iter()
        .find(|row| row.field == "price")
        .expect("price row");
    assert_eq!(price.column.as_deref(), Some("Cost"));
}

#[test]
fn unknown_map_column_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_csv(&dir, "products.csv", CLEAN);
    let args = run_args(&file, &dir.path().join("templates"), &["--map", "price=Nope"]);

    let error = run_import(&args).expect_err("unknown column");
    assert!(error.to_string().contains("column 'Nope' not found"), "{error}");
}

#[test]
fn unsupported_extension_is_blocked_at_upload() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_csv(&dir, "products.txt", CLEAN);
    let args = run_args(&file, &dir.path().join("templates"), &[]);

    let outcome = run_import(&args).expect("run");

    assert_eq!(outcome.step, Step::Upload);
    assert_eq!(
        outcome.blocked.as_deref(),
        Some("Unsupported file type. Please upload a .csv or .xlsx file.")
    );
}
