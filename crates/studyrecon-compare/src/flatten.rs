//! Flattening of hierarchies into comparable path sets.

use std::collections::BTreeSet;

use studyrecon_model::{FlatPath, Hierarchy, ItemKey};

use crate::granularity::Granularity;

/// One sorted path set per [`Granularity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedPaths {
    pub names: BTreeSet<FlatPath>,
    pub ids: BTreeSet<FlatPath>,
    pub pairs: BTreeSet<FlatPath>,
    pub triples: BTreeSet<FlatPath>,
}

impl FlattenedPaths {
    pub fn get(&self, granularity: Granularity) -> &BTreeSet<FlatPath> {
        match granularity {
            Granularity::Names => &self.names,
            Granularity::Ids => &self.ids,
            Granularity::Pairs => &self.pairs,
            Granularity::Triples => &self.triples,
        }
    }
}

/// Flatten a hierarchy into its four path sets.
pub fn flatten<I: ItemKey>(hierarchy: &Hierarchy<I>) -> FlattenedPaths {
    let mut paths = FlattenedPaths::default();
    for unit in hierarchy.units() {
        paths.names.insert(FlatPath::single(&unit.name));
        paths.ids.insert(FlatPath::single(&unit.id));
        for group in &unit.groups {
            paths.pairs.insert(FlatPath::pair(&unit.id, &group.id));
            for item in &group.items {
                paths.triples.insert(FlatPath::pair(&group.id, item.item_id()));
            }
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use studyrecon_model::{MetadataHierarchy, SigningUnit};

    use super::*;

    #[test]
    fn shared_group_collapses_at_item_level() {
        let mut hierarchy = MetadataHierarchy::new();
        for (id, name) in [("Diary", "Daily Diary"), ("Evening", "Evening Diary")] {
            let mut unit = SigningUnit::new(id, name);
            unit.group_entry("Sleep").items.push("Q1".to_string());
            hierarchy.insert(unit);
        }
        let paths = flatten(&hierarchy);
        assert_eq!(paths.ids.len(), 2);
        assert_eq!(paths.pairs.len(), 2);
        assert_eq!(paths.triples.len(), 1);
        assert_eq!(
            paths.get(Granularity::Triples).iter().next().map(FlatPath::as_str),
            Some("Sleep-->Q1")
        );
    }
}
