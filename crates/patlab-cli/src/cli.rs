//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use patlab_report::DEFAULT_OUTPUT_FILE;

#[derive(Parser)]
#[command(
    name = "patlab",
    version,
    about = "Merge lab results with patient demographics into a JSON document",
    long_about = "Merge per-sample lab result rows with patient demographics.\n\n\
                  Analyte rows are grouped into one result per sample, resolved\n\
                  against a code reference table and attached to their patient."
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

    /// Allow patient names and result values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge the three inputs and write the patient document.
    Convert(ConvertArgs),

    /// List the entries of a code reference table.
    Codes(CodesArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Lab result table (34 columns, header row first).
    #[arg(value_name = "LAB_RESULTS")]
    pub lab_results: PathBuf,

    /// Code reference table: short code, standard code, description.
    #[arg(value_name = "CODE_TABLE")]
    pub code_table: PathBuf,

    /// Patient demographics as a JSON array.
    #[arg(value_name = "PATIENTS")]
    pub patients: PathBuf,

    /// Output file for the patient document.
    #[arg(
        long = "output",
        short = 'o',
        value_name = "PATH",
        env = "PATLAB_OUTPUT",
        default_value = DEFAULT_OUTPUT_FILE
    )]
    pub output: PathBuf,

    /// Field delimiter of both delimited inputs.
    #[arg(long = "delimiter", value_name = "CHAR", default_value_t = ',')]
    pub delimiter: char,

    /// Run the merge and print the summary without writing output.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CodesArgs {
    /// Code reference table to list.
    #[arg(value_name = "CODE_TABLE")]
    pub code_table: PathBuf,

    /// Field delimiter of the table.
    #[arg(long = "delimiter", value_name = "CHAR", default_value_t = ',')]
    pub delimiter: char,
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
