//! CSV output of comparison tables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use studyrecon_compare::Reconciliation;
use studyrecon_model::ComparisonTable;
use tracing::debug;

use crate::common::ensure_parent_dir;

/// Write one `<slug>.csv` per granularity into `output_dir`.
pub fn write_tables(output_dir: &Path, reconciliation: &Reconciliation) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    let mut outputs = Vec::with_capacity(reconciliation.comparisons.len());
    for comparison in &reconciliation.comparisons {
        let path = output_dir.join(format!("{}.csv", comparison.granularity.slug()));
        write_table(&path, &comparison.table)?;
        outputs.push(path);
    }
    Ok(outputs)
}

/// Write a single table as CSV with a header row.
pub fn write_table(path: &Path, table: &ComparisonTable) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(table.headers())
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in table.rendered_rows() {
        writer
            .write_record(&row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    debug!(path = %path.display(), rows = table.row_count(), "wrote table");
    Ok(())
}
