use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use studyrecon_compare::{DiffReport, Granularity, Reconciliation};
use studyrecon_model::IntegrityGap;

use crate::common::ensure_parent_dir;

#[derive(Serialize)]
struct DiffDocument<'a> {
    consistent: bool,
    comparisons: Vec<DiffEntry<'a>>,
    integrity_gaps: &'a [IntegrityGap],
}

#[derive(Serialize)]
struct DiffEntry<'a> {
    granularity: Granularity,
    #[serde(flatten)]
    diff: &'a DiffReport,
}

/// Write the per-granularity differences as pretty-printed JSON.
pub fn write_diff_json(path: &Path, reconciliation: &Reconciliation) -> Result<()> {
    let document = DiffDocument {
        consistent: reconciliation.is_consistent(),
        comparisons: reconciliation
            .comparisons
            .iter()
            .map(|comparison| DiffEntry {
                granularity: comparison.granularity,
                diff: &comparison.diff,
            })
            .collect(),
        integrity_gaps: &reconciliation.integrity_gaps,
    };

    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)
        .with_context(|| format!("serialize {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
