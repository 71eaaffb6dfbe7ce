//! Plain-text summary of a reconciliation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use studyrecon_compare::{Reconciliation, enumerate};

use crate::common::ensure_parent_dir;

/// Study identification printed at the top of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryContext {
    pub study_description: Option<String>,
    pub protocols: Vec<String>,
    pub design_id: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl Default for SummaryContext {
    fn default() -> Self {
        Self {
            study_description: None,
            protocols: Vec::new(),
            design_id: None,
            generated_at: Utc::now(),
        }
    }
}

/// Render the summary text.
///
/// Each granularity lists the paths found only in the metadata document and
/// only in the design, enumerated from 1. Integrity gaps tolerated during
/// extraction follow at the end.
pub fn render_summary(reconciliation: &Reconciliation, context: &SummaryContext) -> String {
    let mut lines = vec![
        "Study reconciliation summary".to_string(),
        format!(
            "Generated: {}",
            context
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    ];
    if let Some(description) = &context.study_description {
        lines.push(format!("Study: {description}"));
    }
    if !context.protocols.is_empty() {
        lines.push(format!("Protocols: {}", context.protocols.join(", ")));
    }
    if let Some(design_id) = &context.design_id {
        lines.push(format!("Design: {design_id}"));
    }
    let verdict = if reconciliation.is_consistent() {
        "consistent"
    } else {
        "differences found"
    };
    lines.push(format!("Result: {verdict}"));

    for comparison in &reconciliation.comparisons {
        let diff = &comparison.diff;
        lines.push(String::new());
        lines.push(format!(
            "== {} ({}) ==",
            comparison.granularity.title(),
            comparison.granularity.slug()
        ));
        lines.push(format!("Only in metadata ({}):", diff.left_only.len()));
        lines.push(listing(enumerate(&diff.left_only)));
        lines.push(format!("Only in design ({}):", diff.right_only.len()));
        lines.push(listing(enumerate(&diff.right_only)));
    }

    let gaps = &reconciliation.integrity_gaps;
    if !gaps.is_empty() {
        lines.push(String::new());
        lines.push(format!("Integrity gaps ({}):", gaps.len()));
        lines.extend(
            gaps.iter()
                .enumerate()
                .map(|(index, gap)| format!("{}. {gap}", index + 1)),
        );
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn listing(enumerated: String) -> String {
    if enumerated.is_empty() {
        "(none)".to_string()
    } else {
        enumerated
    }
}

/// Render the summary and write it to `path`.
pub fn write_summary(
    path: &Path,
    reconciliation: &Reconciliation,
    context: &SummaryContext,
) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, render_summary(reconciliation, context))
        .with_context(|| format!("write {}", path.display()))
}
