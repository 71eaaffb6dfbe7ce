//! Pipeline stages shared by the CLI commands.
//!
//! Each stage takes paths and an [`ExclusionPolicy`] and returns owned results,
//! so commands can wrap them in spans and tests can call them directly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use studyrecon_compare::{Reconciliation, reconcile};
use studyrecon_ingest::{
    extract_design_hierarchy, extract_metadata_hierarchy, latest_design_id, load_design_json,
    load_document, load_policy, matching_design_ids, study_description, study_protocols,
};
use studyrecon_model::{DesignHierarchy, ExclusionPolicy, IntegrityPolicy, MetadataHierarchy};
use studyrecon_report::{SummaryContext, write_outputs};
use tracing::{debug, info};

/// Directory name used when no output directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "reconciliation";

/// Both hierarchies plus the study identification read from the metadata document.
#[derive(Debug)]
pub struct IngestResult {
    pub metadata: MetadataHierarchy,
    pub design: DesignHierarchy,
    pub protocols: Vec<String>,
    pub study_description: Option<String>,
}

/// Design ids from a catalog that belong to the study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignLookup {
    pub protocols: Vec<String>,
    pub matching: Vec<String>,
    pub latest: Option<String>,
}

/// Load the exclusion policy from `path`, or use the built-in defaults.
///
/// `lenient` overrides the integrity policy from the file.
pub fn resolve_policy(path: Option<&Path>, lenient: bool) -> Result<ExclusionPolicy> {
    let policy = match path {
        Some(path) => {
            load_policy(path).with_context(|| format!("load policy {}", path.display()))?
        }
        None => ExclusionPolicy::default(),
    };
    Ok(if lenient {
        policy.with_integrity(IntegrityPolicy::Lenient)
    } else {
        policy
    })
}

/// Read both sources and build their hierarchies.
pub fn ingest(
    metadata_path: &Path,
    design_path: &Path,
    policy: &ExclusionPolicy,
) -> Result<IngestResult> {
    let document = load_document(metadata_path)
        .with_context(|| format!("load metadata {}", metadata_path.display()))?;
    let metadata = extract_metadata_hierarchy(&document, policy)
        .with_context(|| format!("extract metadata from {}", metadata_path.display()))?;
    let protocols = study_protocols(&document)
        .with_context(|| format!("read protocols from {}", metadata_path.display()))?;
    let study_description = study_description(&document);

    let payload = load_design_json(design_path)
        .with_context(|| format!("load design {}", design_path.display()))?;
    let design = extract_design_hierarchy(&payload, policy)
        .with_context(|| format!("extract design from {}", design_path.display()))?;

    debug!(
        metadata_units = metadata.len(),
        design_units = design.len(),
        protocols = protocols.len(),
        "sources ingested"
    );
    Ok(IngestResult {
        metadata,
        design,
        protocols,
        study_description,
    })
}

/// Match the study's protocols against a design catalog.
pub fn lookup_design(catalog_path: &Path, protocols: Vec<String>) -> Result<DesignLookup> {
    let catalog = load_design_json(catalog_path)
        .with_context(|| format!("load catalog {}", catalog_path.display()))?;
    let matching = matching_design_ids(&catalog, &protocols)
        .with_context(|| format!("match protocols in {}", catalog_path.display()))?;
    let latest = latest_design_id(&matching)
        .context("rank design versions")?
        .map(str::to_string);
    info!(
        matching = matching.len(),
        latest = latest.as_deref().unwrap_or("-"),
        "design catalog searched"
    );
    Ok(DesignLookup {
        protocols,
        matching,
        latest,
    })
}

/// Read the protocols of a metadata document and look them up in a catalog.
pub fn latest_design(metadata_path: &Path, catalog_path: &Path) -> Result<DesignLookup> {
    let document = load_document(metadata_path)
        .with_context(|| format!("load metadata {}", metadata_path.display()))?;
    let protocols = study_protocols(&document)
        .with_context(|| format!("read protocols from {}", metadata_path.display()))?;
    lookup_design(catalog_path, protocols)
}

/// Compare the ingested hierarchies.
pub fn compare(ingested: &IngestResult) -> Reconciliation {
    reconcile(&ingested.metadata, &ingested.design)
}

/// Default output directory next to the metadata document.
pub fn default_output_dir(metadata_path: &Path) -> PathBuf {
    metadata_path
        .parent()
        .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), |dir| dir.join(DEFAULT_OUTPUT_DIR))
}

/// Write tables, summary and diff report.
pub fn output(
    output_dir: &Path,
    reconciliation: &Reconciliation,
    context: &SummaryContext,
) -> Result<Vec<PathBuf>> {
    let outputs = write_outputs(output_dir, reconciliation, context)
        .with_context(|| format!("write outputs to {}", output_dir.display()))?;
    info!(
        output_dir = %output_dir.display(),
        files = outputs.len(),
        "outputs written"
    );
    Ok(outputs)
}
