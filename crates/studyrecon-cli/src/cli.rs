//! CLI argument definitions for the study reconciler.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "studyrecon",
    version,
    about = "Reconcile study metadata against the study design",
    long_about = "Compare the signing units, item groups and items described by a \
                  study metadata document with those exported by the study-design \
                  service.\n\n\
                  Exits with 0 when both sides agree, 2 when differences were found \
                  and 1 on error."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare a metadata document with a study-design export.
    Compare(CompareArgs),

    /// Find the latest design id matching the study's protocols.
    LatestDesign(LatestDesignArgs),

    /// Print the effective exclusion policy.
    Policy(PolicyArgs),
}

#[derive(Args)]
pub struct PolicyArgs {
    /// TOML file overriding the built-in exclusion lists.
    #[arg(long = "policy", value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Record dangling references instead of failing on them.
    #[arg(long = "lenient")]
    pub lenient: bool,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Study metadata XML document.
    #[arg(long = "metadata", value_name = "XML")]
    pub metadata: PathBuf,

    /// Study-design export (JSON) captured from the design service.
    #[arg(long = "design", value_name = "JSON")]
    pub design: PathBuf,

    /// Design catalog (JSON) used to name the compared design in the summary.
    #[arg(long = "catalog", value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// Output directory for tables and reports (default: <METADATA_DIR>/reconciliation).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Compare and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Parser)]
pub struct LatestDesignArgs {
    /// Study metadata XML document.
    #[arg(long = "metadata", value_name = "XML")]
    pub metadata: PathBuf,

    /// Design catalog (JSON) listing `protocol` and `designId` entries.
    #[arg(long = "catalog", value_name = "JSON")]
    pub catalog: PathBuf,
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
