//! Persistence of reconciliation results.
//!
//! - **Tables**: one CSV file per granularity, mismatch slots rendered with the marker
//! - **Summary**: a plain-text report of every difference and integrity gap
//! - **Diff JSON**: the per-granularity differences in machine-readable form

mod common;
mod json;
mod summary;
mod tables;

use std::path::{Path, PathBuf};

use anyhow::Result;
use studyrecon_compare::Reconciliation;

pub use json::write_diff_json;
pub use summary::{SummaryContext, render_summary, write_summary};
pub use tables::{write_table, write_tables};

/// File name of the text summary inside an output directory.
pub const SUMMARY_FILE: &str = "summary.txt";
/// File name of the JSON diff report inside an output directory.
pub const DIFF_JSON_FILE: &str = "diff.json";

/// Write tables, summary and diff report into `output_dir`.
pub fn write_outputs(
    output_dir: &Path,
    reconciliation: &Reconciliation,
    context: &SummaryContext,
) -> Result<Vec<PathBuf>> {
    let mut outputs = write_tables(output_dir, reconciliation)?;

    let summary_path = output_dir.join(SUMMARY_FILE);
    write_summary(&summary_path, reconciliation, context)?;
    outputs.push(summary_path);

    let json_path = output_dir.join(DIFF_JSON_FILE);
    write_diff_json(&json_path, reconciliation)?;
    outputs.push(json_path);

    Ok(outputs)
}
