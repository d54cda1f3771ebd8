//! CLI argument definitions for the import driver.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pos-import",
    version,
    about = "Import products into the POS catalog",
    long_about = "Import products from a CSV file into the POS catalog.\n\n\
                  Runs the import wizard headlessly: upload, column mapping,\n\
                  validation and review, stopping at the first closed gate."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the import wizard on a file.
    Run(RunArgs),

    /// List the fields of the target catalog.
    Fields(FieldsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// File to import.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Import configuration (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Custom target catalog (JSON) instead of the built-in product catalog.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Map a field to a column, by column label or id (e.g. `price="Unit Cost"`).
    #[arg(long = "map", value_name = "FIELD=COLUMN")]
    pub map: Vec<MapArg>,

    /// Do not fill unmapped fields automatically.
    #[arg(long = "no-auto-map")]
    pub no_auto_map: bool,

    /// Apply a saved mapping template.
    #[arg(long = "template", value_name = "NAME")]
    pub template: Option<String>,

    /// Save the final mapping as a template.
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,

    /// Directory holding mapping templates.
    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        default_value = ".pos-import/templates"
    )]
    pub templates_dir: PathBuf,

    /// Mark a validation issue as resolved (repeatable).
    #[arg(long = "resolve", value_name = "ISSUE")]
    pub resolve: Vec<String>,

    /// Resolve every validation error.
    #[arg(long = "resolve-all")]
    pub resolve_all: bool,

    /// Acknowledge outstanding warnings before importing.
    #[arg(long = "acknowledge-warnings")]
    pub acknowledge_warnings: bool,

    /// Skip the simulated latencies.
    #[arg(long = "no-delay")]
    pub no_delay: bool,

    /// Preview rows to show (overrides the config file).
    #[arg(long = "sample-rows", value_name = "N")]
    pub sample_rows: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct FieldsArgs {
    /// Custom target catalog (JSON) instead of the built-in product catalog.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

/// A `FIELD=COLUMN` pair from `--map`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapArg {
    pub field: String,
    pub column: String,
}

impl FromStr for MapArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, column) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=COLUMN, got '{s}'"))?;
        let (field, column) = (field.trim(), column.trim());
        if field.is_empty() || column.is_empty() {
            return Err(format!("expected FIELD=COLUMN, got '{s}'"));
        }
        Ok(Self {
            field: field.to_string(),
            column: column.to_string(),
        })
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
