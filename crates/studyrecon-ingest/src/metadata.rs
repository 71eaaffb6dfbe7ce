//! Extraction of the `kdSU → kdIG → [kdIT]` hierarchy from the metadata document.

use std::collections::{BTreeMap, BTreeSet};

use studyrecon_model::{
    ExclusionPolicy, GapKind, IntegrityGap, IntegrityPolicy, ItemGroup, MetadataHierarchy,
    ReconcileError, Result, SigningUnit, validate_identifier,
};
use tracing::{debug, info, warn};

use crate::tree::TreeNode;

const STUDY_EVENT_DEF: &str = "StudyEventDef";
const SIGNING_UNIT_REF: &str = "SigningUnitRef";
const SIGNING_UNIT_DEF: &str = "SigningUnitDef";
const ITEM_GROUP_REF: &str = "ItemGroupRef";
const ITEM_GROUP_DEF: &str = "ItemGroupDef";
const ITEM_REF: &str = "ItemRef";

const KD_SE: &str = "kdSE";
const KD_SU: &str = "kdSU";
const KD_IG: &str = "kdIG";
const KD_IT: &str = "kdIT";
const NAME: &str = "Name";

/// Build the metadata hierarchy under `policy`.
///
/// Candidate units are the `SigningUnitRef`s of every study event whose kind
/// matches `policy.event_kind`; excluded units and groups are dropped before
/// items are joined in. Groups are kept even when their definition lists no
/// items. When a unit has several `SigningUnitDef`s only the last one is read.
pub fn extract_metadata_hierarchy<N: TreeNode>(
    root: &N,
    policy: &ExclusionPolicy,
) -> Result<MetadataHierarchy> {
    let candidates = candidate_signing_units(root, &policy.event_kind)?;
    let valid: BTreeSet<&str> = candidates
        .into_iter()
        .filter(|unit| !policy.excludes_signing_unit(unit))
        .collect();
    debug!(valid_units = valid.len(), "resolved candidate signing units");

    // A repeated SigningUnitDef replaces the earlier one before anything is
    // built, so a discarded definition contributes no groups and no gaps.
    let mut definitions: BTreeMap<&str, &N> = BTreeMap::new();
    for definition in root.find_all(SIGNING_UNIT_DEF) {
        let unit_id = definition.require_attr(KD_SU)?;
        if !valid.contains(unit_id) {
            continue;
        }
        if definitions.insert(unit_id, definition).is_some() {
            debug!(
                unit = unit_id,
                "duplicate SigningUnitDef, keeping the later definition"
            );
        }
    }

    let group_items = item_group_definitions(root)?;
    let mut hierarchy = MetadataHierarchy::new();

    for (&unit_id, definition) in &definitions {
        let name = definition.require_attr(NAME)?;
        validate_identifier("SigningUnitDef Name", name)?;

        let mut unit = SigningUnit::new(unit_id, name);
        for reference in definition.find_all(ITEM_GROUP_REF) {
            let group_id = reference.require_attr(KD_IG)?;
            if policy.excludes_item_group(group_id) || unit.group(group_id).is_some() {
                continue;
            }
            validate_identifier(KD_IG, group_id)?;
            match group_items.get(group_id) {
                Some(items) => {
                    for item in items {
                        validate_identifier(KD_IT, item)?;
                    }
                    unit.groups.push(ItemGroup::with_items(group_id, items.clone()));
                }
                None => {
                    let gap = IntegrityGap {
                        kind: GapKind::ItemGroup,
                        id: group_id.to_string(),
                        referenced_by: unit_id.to_string(),
                    };
                    tolerate_gap(&mut hierarchy, gap, policy.integrity)?;
                    unit.groups.push(ItemGroup::new(group_id));
                }
            }
        }
        hierarchy.insert(unit);
    }

    for missing in valid.iter().filter(|unit| !definitions.contains_key(*unit)) {
        let gap = IntegrityGap {
            kind: GapKind::SigningUnit,
            id: (*missing).to_string(),
            referenced_by: policy.event_kind.clone(),
        };
        tolerate_gap(&mut hierarchy, gap, policy.integrity)?;
    }

    info!(
        units = hierarchy.len(),
        integrity_gaps = hierarchy.integrity_gaps().len(),
        "extracted metadata hierarchy"
    );
    Ok(hierarchy)
}

/// `kdSU` values referenced from study events of `event_kind`.
fn candidate_signing_units<'a, N: TreeNode>(
    root: &'a N,
    event_kind: &str,
) -> Result<BTreeSet<&'a str>> {
    let mut candidates = BTreeSet::new();
    for event in root.find_all(STUDY_EVENT_DEF) {
        if event.require_attr(KD_SE)? != event_kind {
            continue;
        }
        for reference in event.find_all(SIGNING_UNIT_REF) {
            let unit_id = reference.require_attr(KD_SU)?;
            validate_identifier(KD_SU, unit_id)?;
            candidates.insert(unit_id);
        }
    }
    Ok(candidates)
}

/// Every `ItemGroupDef`'s item ids, keyed by its `kdIG`.
///
/// A repeated group id keeps the later definition.
fn item_group_definitions<N: TreeNode>(root: &N) -> Result<BTreeMap<&str, Vec<String>>> {
    let mut groups = BTreeMap::new();
    for definition in root.find_all(ITEM_GROUP_DEF) {
        let group_id = definition.require_attr(KD_IG)?;
        let items = definition
            .find_all(ITEM_REF)
            .into_iter()
            .map(|item| item.require_attr(KD_IT).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        groups.insert(group_id, items);
    }
    Ok(groups)
}

fn tolerate_gap(
    hierarchy: &mut MetadataHierarchy,
    gap: IntegrityGap,
    integrity: IntegrityPolicy,
) -> Result<()> {
    match integrity {
        IntegrityPolicy::Strict => Err(ReconcileError::IntegrityGap(gap)),
        IntegrityPolicy::Lenient => {
            warn!(kind = %gap.kind, id = %gap.id, referenced_by = %gap.referenced_by, "integrity gap");
            hierarchy.record_gap(gap);
            Ok(())
        }
    }
}
