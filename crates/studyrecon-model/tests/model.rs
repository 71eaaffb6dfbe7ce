use studyrecon_model::{
    Column, ComparisonTable, ExclusionPolicy, FlatPath, GapKind, IntegrityGap, IntegrityPolicy,
    MISMATCH_MARKER, MetadataHierarchy, PATH_SEPARATOR, ReconcileError, SigningUnit,
};

#[test]
fn default_policy_carries_builtin_lists() {
    let policy = ExclusionPolicy::default();
    assert_eq!(policy.event_kind, "LogPad");
    assert!(policy.excludes_signing_unit("Training"));
    assert!(policy.excludes_signing_unit("ConfirmID"));
    assert!(!policy.excludes_signing_unit("training"));
    assert!(policy.excludes_item_group("Header"));
    assert!(policy.ignores_group_marker("-"));
    assert!(policy.excluded_questionnaires.is_empty());
    assert_eq!(policy.integrity, IntegrityPolicy::Strict);
}

#[test]
fn policy_missing_fields_fall_back_to_defaults() {
    let policy: ExclusionPolicy = serde_json::from_str(
        r#"{ "excluded_questionnaires": ["Legacy"], "integrity": "lenient" }"#,
    )
    .expect("deserialize policy");
    assert!(policy.excludes_questionnaire("Legacy"));
    assert!(policy.excludes_signing_unit("VisitStart"));
    assert_eq!(policy.integrity, IntegrityPolicy::Lenient);
}

#[test]
fn policy_rejects_unknown_fields() {
    let result: Result<ExclusionPolicy, _> =
        serde_json::from_str(r#"{ "excluded_units": ["Typo"] }"#);
    assert!(result.is_err());
}

#[test]
fn hierarchy_names_track_units() {
    let mut hierarchy = MetadataHierarchy::new();
    hierarchy.insert(SigningUnit::new("Diary", "Daily Diary"));
    hierarchy.insert(SigningUnit::new("AE", "Adverse Events"));
    let replaced = hierarchy.insert(SigningUnit::new("Diary", "Evening Diary"));

    assert_eq!(replaced.map(|unit| unit.name), Some("Daily Diary".to_string()));
    let names = hierarchy.names();
    assert_eq!(names.len(), hierarchy.len());
    assert_eq!(names.get("Diary"), Some(&"Evening Diary"));
    let ids: Vec<&str> = hierarchy.units().map(|unit| unit.id.as_str()).collect();
    assert_eq!(ids, vec!["AE", "Diary"]);
}

#[test]
fn flat_path_splits_back_into_components() {
    let path = FlatPath::join(["Diary", "Sleep", "Q1"]);
    assert_eq!(
        path.as_str(),
        format!("Diary{PATH_SEPARATOR}Sleep{PATH_SEPARATOR}Q1")
    );
    assert_eq!(path.components(), vec!["Diary", "Sleep", "Q1"]);
    assert_eq!(path.leaf(), "Q1");
}

#[test]
fn table_renders_mismatch_marker() {
    let mut table = ComparisonTable::new("ids");
    table.push_column(Column::new(
        "left",
        vec![Some("A".to_string()), Some("B".to_string())],
    ));
    table.push_column(Column::new("right", vec![Some("A".to_string()), None]));

    assert_eq!(table.headers(), vec!["left", "right"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.rendered_rows(),
        vec![vec!["A", "A"], vec!["B", MISMATCH_MARKER]]
    );
    assert_eq!(table.column("right").map(Column::mismatch_count), Some(1));
}

#[test]
fn integrity_gap_message_names_reference() {
    let err = ReconcileError::IntegrityGap(IntegrityGap {
        kind: GapKind::ItemGroup,
        id: "Sleep".to_string(),
        referenced_by: "Diary".to_string(),
    });
    assert_eq!(
        err.to_string(),
        "integrity gap: item group 'Sleep' referenced by 'Diary' has no definition"
    );
}
