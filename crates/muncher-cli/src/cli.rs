//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "muncher",
    version,
    about = "Normalize clinic procedure spreadsheets into canonical records",
    long_about = "Normalize patient-procedure spreadsheet exports into canonical records.\n\n\
                  Column headers are resolved per source layout, values are coerced to\n\
                  the schema's storage types and checked, and every flagged or rejected\n\
                  row is listed for manual correction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Allow raw cell values in trace logs. They are patient data.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest CSV exports of one layout and write canonical records.
    Munch(MunchArgs),

    /// List the canonical fields of the schema.
    Fields(FieldsArgs),
}

#[derive(Parser)]
pub struct MunchArgs {
    /// Schema file (default: $MUNCHER_SCHEMA or the bundled schema).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Layout identifier of the exports (e.g. clinicA).
    #[arg(long = "layout", value_name = "ID")]
    pub layout: String,

    /// Reject every row of a sheet that lacks a column for a required field.
    #[arg(long = "strict-columns")]
    pub strict_columns: bool,

    /// Write records as JSON lines to this file (default: stdout).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the operator report as JSON to this file.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// CSV files, one sheet each.
    #[arg(value_name = "CSV", required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Parser)]
pub struct FieldsArgs {
    /// Schema file (default: $MUNCHER_SCHEMA or the bundled schema).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,
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
