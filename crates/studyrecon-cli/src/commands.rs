use std::time::Instant;

use anyhow::Result;
use comfy_table::Table;
use studyrecon_cli::pipeline::{
    DesignLookup, compare, default_output_dir, ingest, latest_design, lookup_design, output,
    resolve_policy,
};
use studyrecon_model::{ExclusionPolicy, IntegrityPolicy};
use studyrecon_report::SummaryContext;
use tracing::{info, info_span, warn};

use crate::cli::{CompareArgs, LatestDesignArgs, PolicyArgs};
use crate::summary::apply_table_style;
use crate::types::CompareResult;

pub fn run_compare(args: &CompareArgs) -> Result<CompareResult> {
    let compare_span = info_span!(
        "compare",
        metadata = %args.metadata.display(),
        design = %args.design.display()
    );
    let _compare_guard = compare_span.enter();

    // =========================================================================
    // Stage 1: Ingest - Load policy, parse both sources, build hierarchies
    // =========================================================================
    let policy = resolve_policy(args.policy.policy.as_deref(), args.policy.lenient)?;
    let ingest_start = Instant::now();
    let ingested =
        info_span!("ingest").in_scope(|| ingest(&args.metadata, &args.design, &policy))?;
    info!(
        metadata_units = ingested.metadata.len(),
        design_units = ingested.design.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let design_id = match &args.catalog {
        Some(catalog) => {
            info_span!("catalog", catalog = %catalog.display())
                .in_scope(|| lookup_design(catalog, ingested.protocols.clone()))?
                .latest
        }
        None => None,
    };

    // =========================================================================
    // Stage 2: Compare - Flatten, diff and align at every granularity
    // =========================================================================
    let reconciliation = info_span!("reconcile").in_scope(|| compare(&ingested));
    for gap in &reconciliation.integrity_gaps {
        warn!(%gap, "integrity gap tolerated");
    }
    if !reconciliation.is_consistent() {
        let differences: usize = reconciliation
            .comparisons
            .iter()
            .map(|comparison| comparison.diff.left_only.len() + comparison.diff.right_only.len())
            .sum();
        warn!(differences, "metadata and design disagree");
    }

    let context = SummaryContext {
        study_description: ingested.study_description,
        protocols: ingested.protocols,
        design_id,
        ..SummaryContext::default()
    };

    // =========================================================================
    // Stage 3: Output - Tables, summary and diff report
    // =========================================================================
    if args.dry_run {
        info!("dry run, skipping outputs");
        return Ok(CompareResult {
            reconciliation,
            context,
            output_dir: None,
            outputs: Vec::new(),
        });
    }
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.metadata));
    let outputs =
        info_span!("output").in_scope(|| output(&output_dir, &reconciliation, &context))?;

    Ok(CompareResult {
        reconciliation,
        context,
        output_dir: Some(output_dir),
        outputs,
    })
}

pub fn run_latest_design(args: &LatestDesignArgs) -> Result<DesignLookup> {
    info_span!("latest_design", catalog = %args.catalog.display())
        .in_scope(|| latest_design(&args.metadata, &args.catalog))
}

pub fn run_policy(args: &PolicyArgs) -> Result<()> {
    let policy = resolve_policy(args.policy.as_deref(), args.lenient)?;
    println!("{}", policy_table(&policy));
    Ok(())
}

fn policy_table(policy: &ExclusionPolicy) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Values"]);
    apply_table_style(&mut table);
    let integrity = match policy.integrity {
        IntegrityPolicy::Strict => "strict",
        IntegrityPolicy::Lenient => "lenient",
    };
    table.add_row(vec!["Event kind".to_string(), policy.event_kind.clone()]);
    table.add_row(vec![
        "Excluded signing units".to_string(),
        joined(&policy.excluded_signing_units),
    ]);
    table.add_row(vec![
        "Excluded item groups".to_string(),
        joined(&policy.excluded_item_groups),
    ]);
    table.add_row(vec![
        "Excluded questionnaires".to_string(),
        joined(&policy.excluded_questionnaires),
    ]);
    table.add_row(vec![
        "Ignored group markers".to_string(),
        joined(&policy.ignored_group_markers),
    ]);
    table.add_row(vec!["Integrity".to_string(), integrity.to_string()]);
    table
}

fn joined<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    let values: Vec<&str> = values.into_iter().map(String::as_str).collect();
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const METADATA_XML: &str = r#"<ODM>
  <StudyEventDef kdSE="LogPad"><SigningUnitRef kdSU="Diary"/></StudyEventDef>
  <SigningUnitDef kdSU="Diary" Name="Daily Diary"><ItemGroupRef kdIG="Sleep"/></SigningUnitDef>
  <ItemGroupDef kdIG="Sleep"><ItemRef kdIT="SleepHours"/></ItemGroupDef>
</ODM>"#;

    const DESIGN_JSON: &str = r#"{"questionnaires": [{"su": "Diary", "name": "Daily Diary",
  "items": [{"ig": "Sleep", "it": "SleepHours", "includeInReports": true}]}]}"#;

    #[test]
    fn dry_run_writes_no_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = dir.path().join("pn_metadata.xml");
        let design = dir.path().join("design.json");
        fs::write(&metadata, METADATA_XML).unwrap();
        fs::write(&design, DESIGN_JSON).unwrap();
        let out = dir.path().join("out");

        let args = CompareArgs {
            metadata: metadata.clone(),
            design,
            catalog: None,
            output_dir: Some(out.clone()),
            dry_run: true,
            policy: PolicyArgs {
                policy: None,
                lenient: false,
            },
        };
        let result = run_compare(&args).unwrap();

        assert!(result.output_dir.is_none());
        assert!(result.outputs.is_empty());
        assert!(!out.exists());
        assert!(!default_output_dir(&metadata).exists());
        assert_eq!(result.exit_code(), 0);
    }
}
