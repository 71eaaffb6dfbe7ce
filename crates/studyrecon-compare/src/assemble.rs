//! Assembly of aligned path columns into comparison tables.

use std::collections::{BTreeMap, BTreeSet};

use studyrecon_model::{Column, ComparisonTable, FlatPath};

use crate::align::{Alignment, align};
use crate::granularity::Granularity;

/// Header of the side column carried by the item-level table.
pub const INCLUDE_IN_REPORTS_HEADER: &str = "includeInReports";

/// Build the two-column table for one granularity.
pub fn assemble_table(
    granularity: Granularity,
    metadata: &BTreeSet<FlatPath>,
    design: &BTreeSet<FlatPath>,
) -> ComparisonTable {
    let aligned = align_sets(metadata, design);
    let mut table = ComparisonTable::new(granularity.title());
    table.push_column(Column::new(
        granularity.metadata_header(),
        render(&aligned.left),
    ));
    table.push_column(Column::new(
        granularity.design_header(),
        render(&aligned.right),
    ));
    table
}

/// Build the item-level table with an extra `includeInReports` column.
///
/// The flag is looked up by the full `group-->item` design path. Rows without
/// a design value get a mismatch slot in the flag column as well.
pub fn assemble_item_table(
    metadata: &BTreeSet<FlatPath>,
    design: &BTreeSet<FlatPath>,
    include_in_reports: &BTreeMap<FlatPath, bool>,
) -> ComparisonTable {
    let aligned = align_sets(metadata, design);
    let flags = aligned
        .right
        .iter()
        .map(|slot| {
            slot.as_ref()
                .and_then(|path| include_in_reports.get(path))
                .map(bool::to_string)
        })
        .collect();

    let granularity = Granularity::Triples;
    let mut table = ComparisonTable::new(granularity.title());
    table.push_column(Column::new(
        granularity.metadata_header(),
        render(&aligned.left),
    ));
    table.push_column(Column::new(
        granularity.design_header(),
        render(&aligned.right),
    ));
    table.push_column(Column::new(INCLUDE_IN_REPORTS_HEADER, flags));
    table
}

fn align_sets(left: &BTreeSet<FlatPath>, right: &BTreeSet<FlatPath>) -> Alignment<FlatPath> {
    let left: Vec<FlatPath> = left.iter().cloned().collect();
    let right: Vec<FlatPath> = right.iter().cloned().collect();
    align(&left, &right)
}

fn render(slots: &[Option<FlatPath>]) -> Vec<Option<String>> {
    slots
        .iter()
        .map(|slot| slot.as_ref().map(|path| path.as_str().to_string()))
        .collect()
}
