//! End-to-end reconciliation scenarios.

use serde_json::json;
use studyrecon_compare::{Granularity, INCLUDE_IN_REPORTS_HEADER, align, reconcile};
use studyrecon_ingest::{extract_design_hierarchy, extract_metadata_hierarchy, parse_xml};
use studyrecon_model::{
    DesignHierarchy, DesignItem, ExclusionPolicy, FlatPath, GapKind, IntegrityGap,
    MISMATCH_MARKER, MetadataHierarchy, SigningUnit,
};

fn metadata_unit(id: &str, name: &str, group: &str, items: &[&str]) -> SigningUnit<String> {
    let mut unit = SigningUnit::new(id, name);
    unit.group_entry(group)
        .items
        .extend(items.iter().map(|item| (*item).to_string()));
    unit
}

fn design_unit(id: &str, name: &str, group: &str, items: &[(&str, bool)]) -> SigningUnit<DesignItem> {
    let mut unit = SigningUnit::new(id, name);
    unit.group_entry(group).items.extend(
        items
            .iter()
            .map(|(item, include)| DesignItem::new(*item, *include)),
    );
    unit
}

#[test]
fn item_only_on_metadata_side() {
    let mut metadata = MetadataHierarchy::new();
    metadata.insert(metadata_unit("X", "Form X", "GroupA", &["I1", "I2"]));
    let mut design = DesignHierarchy::new();
    design.insert(design_unit("X", "Form X", "GroupA", &[("I1", true)]));

    let reconciliation = reconcile(&metadata, &design);
    assert!(!reconciliation.is_consistent());

    let triples = reconciliation.comparison(Granularity::Triples).unwrap();
    let left_only: Vec<&str> = triples.diff.left_only.iter().map(FlatPath::as_str).collect();
    assert_eq!(left_only, vec!["GroupA-->I2"]);
    assert!(triples.diff.right_only.is_empty());
    assert_eq!((triples.left_total, triples.right_total), (2, 1));

    assert_eq!(
        triples.table.rendered_rows(),
        vec![
            vec!["GroupA-->I1", "GroupA-->I1", "true"],
            vec!["GroupA-->I2", MISMATCH_MARKER, MISMATCH_MARKER],
        ]
    );
    assert!(triples.table.column(INCLUDE_IN_REPORTS_HEADER).is_some());

    for granularity in [Granularity::Names, Granularity::Ids, Granularity::Pairs] {
        let comparison = reconciliation.comparison(granularity).unwrap();
        assert!(comparison.diff.is_empty(), "{granularity} should agree");
        assert_eq!(comparison.table.columns.len(), 2);
    }
}

#[test]
fn excluded_unit_is_absent_at_every_granularity() {
    let root = parse_xml(
        r#"<ODM>
          <StudyEventDef kdSE="LogPad">
            <SigningUnitRef kdSU="Diary"/>
            <SigningUnitRef kdSU="Training"/>
          </StudyEventDef>
          <SigningUnitDef kdSU="Diary" Name="Daily Diary"><ItemGroupRef kdIG="Sleep"/></SigningUnitDef>
          <SigningUnitDef kdSU="Training" Name="Training Form"><ItemGroupRef kdIG="Drill"/></SigningUnitDef>
          <ItemGroupDef kdIG="Sleep"><ItemRef kdIT="Hours"/></ItemGroupDef>
          <ItemGroupDef kdIG="Drill"><ItemRef kdIT="Step"/></ItemGroupDef>
        </ODM>"#,
    )
    .unwrap();
    let policy = ExclusionPolicy::default();
    let metadata = extract_metadata_hierarchy(&root, &policy).unwrap();
    let design = extract_design_hierarchy(
        &json!({
            "questionnaires": [
                {
                    "su": "Diary",
                    "name": "Daily Diary",
                    "items": [{ "ig": "Sleep", "it": "Hours", "includeInReports": true }]
                }
            ]
        }),
        &policy,
    )
    .unwrap();

    let reconciliation = reconcile(&metadata, &design);
    for comparison in &reconciliation.comparisons {
        let rows = comparison.table.rendered_rows();
        assert!(
            rows.iter().flatten().all(|cell| !cell.contains("Training")
                && !cell.contains("Drill")),
            "{} leaked an excluded unit",
            comparison.granularity
        );
    }
    assert!(reconciliation.is_consistent());
}

#[test]
fn disjoint_columns_align_with_gaps_on_both_sides() {
    let left = vec!["A".to_string(), "B".to_string()];
    let right = vec!["C".to_string(), "D".to_string()];
    let aligned = align(&left, &right);

    assert_eq!(aligned.len(), 4);
    let render = |column: &[Option<String>]| -> Vec<String> {
        column
            .iter()
            .map(|slot| slot.clone().unwrap_or_else(|| MISMATCH_MARKER.to_string()))
            .collect()
    };
    assert_eq!(render(&aligned.left), ["A", "B", MISMATCH_MARKER, MISMATCH_MARKER]);
    assert_eq!(render(&aligned.right), [MISMATCH_MARKER, MISMATCH_MARKER, "C", "D"]);
    assert!(
        aligned
            .left
            .iter()
            .zip(&aligned.right)
            .all(|(l, r)| l.is_none() || r.is_none())
    );
}

#[test]
fn identical_hierarchies_are_consistent() {
    let mut metadata = MetadataHierarchy::new();
    metadata.insert(metadata_unit("X", "Form X", "G", &["I1"]));
    let mut design = DesignHierarchy::new();
    design.insert(design_unit("X", "Form X", "G", &[("I1", false)]));

    let reconciliation = reconcile(&metadata, &design);
    assert!(reconciliation.is_consistent());
    assert_eq!(
        reconciliation
            .comparisons
            .iter()
            .map(|comparison| comparison.granularity)
            .collect::<Vec<_>>(),
        Granularity::ALL.to_vec()
    );
    assert!(
        reconciliation
            .comparisons
            .iter()
            .all(|comparison| comparison.table.columns.iter().all(|c| c.mismatch_count() == 0))
    );
}

#[test]
fn integrity_gaps_are_carried_into_the_result() {
    let mut metadata = MetadataHierarchy::new();
    metadata.insert(SigningUnit::new("X", "Form X"));
    metadata.record_gap(IntegrityGap {
        kind: GapKind::SigningUnit,
        id: "Missing".to_string(),
        referenced_by: "LogPad".to_string(),
    });
    let reconciliation = reconcile(&metadata, &DesignHierarchy::new());
    assert_eq!(reconciliation.integrity_gaps.len(), 1);
    assert_eq!(reconciliation.integrity_gaps[0].id, "Missing");
}
