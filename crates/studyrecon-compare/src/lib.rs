//! Reconciliation of a metadata hierarchy against a design hierarchy.
//!
//! Both hierarchies are flattened into path sets at four granularities. Each
//! granularity yields a [`DiffReport`] of the paths found on only one side,
//! and a [`ComparisonTable`] whose columns are aligned so that matching paths
//! share a row.

pub mod align;
pub mod assemble;
pub mod diff;
pub mod flatten;
pub mod granularity;

use serde::Serialize;
use studyrecon_model::{ComparisonTable, DesignHierarchy, IntegrityGap, MetadataHierarchy};
use tracing::{debug, info};

pub use align::{Alignment, align};
pub use assemble::{INCLUDE_IN_REPORTS_HEADER, assemble_item_table, assemble_table};
pub use diff::{DiffReport, enumerate};
pub use flatten::{FlattenedPaths, flatten};
pub use granularity::Granularity;

/// Outcome of comparing one granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub granularity: Granularity,
    /// Distinct paths on the metadata side.
    pub left_total: usize,
    /// Distinct paths on the design side.
    pub right_total: usize,
    pub diff: DiffReport,
    pub table: ComparisonTable,
}

/// All four comparisons plus the integrity gaps tolerated during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub comparisons: Vec<Comparison>,
    pub integrity_gaps: Vec<IntegrityGap>,
}

impl Reconciliation {
    /// True when every granularity agrees on both sides.
    pub fn is_consistent(&self) -> bool {
        self.comparisons
            .iter()
            .all(|comparison| comparison.diff.is_empty())
    }

    pub fn comparison(&self, granularity: Granularity) -> Option<&Comparison> {
        self.comparisons
            .iter()
            .find(|comparison| comparison.granularity == granularity)
    }
}

/// Compare the two hierarchies at every granularity, in [`Granularity::ALL`] order.
pub fn reconcile(metadata: &MetadataHierarchy, design: &DesignHierarchy) -> Reconciliation {
    let left = flatten(metadata);
    let right = flatten(design);
    let flags = design.include_in_reports_by_path();

    let comparisons = Granularity::ALL
        .into_iter()
        .map(|granularity| {
            let (left_paths, right_paths) = (left.get(granularity), right.get(granularity));
            let diff = DiffReport::between(left_paths, right_paths);
            let table = match granularity {
                Granularity::Triples => assemble_item_table(left_paths, right_paths, &flags),
                _ => assemble_table(granularity, left_paths, right_paths),
            };
            debug!(
                granularity = granularity.slug(),
                left_only = diff.left_only.len(),
                right_only = diff.right_only.len(),
                rows = table.row_count(),
                "compared granularity"
            );
            Comparison {
                granularity,
                left_total: left_paths.len(),
                right_total: right_paths.len(),
                diff,
                table,
            }
        })
        .collect();

    let integrity_gaps = metadata
        .integrity_gaps()
        .iter()
        .chain(design.integrity_gaps())
        .cloned()
        .collect();

    let reconciliation = Reconciliation {
        comparisons,
        integrity_gaps,
    };
    info!(
        metadata_units = metadata.len(),
        design_units = design.len(),
        consistent = reconciliation.is_consistent(),
        "reconciliation complete"
    );
    reconciliation
}
