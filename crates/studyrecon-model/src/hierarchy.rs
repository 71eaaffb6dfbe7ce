//! Three-level unit → group → item hierarchies.
//!
//! Both sources describe the same shape: a signing unit (questionnaire) owns
//! item groups, which own items. The metadata document contributes plain item
//! ids; the design service additionally carries an `includeInReports` flag.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::FlatPath;

/// Access to the identifier of an item, whatever else it carries.
pub trait ItemKey {
    fn item_id(&self) -> &str;
}

impl ItemKey for String {
    fn item_id(&self) -> &str {
        self
    }
}

/// An item as exported by the study-design service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignItem {
    pub id: String,
    pub include_in_reports: bool,
}

impl DesignItem {
    pub fn new(id: impl Into<String>, include_in_reports: bool) -> Self {
        Self {
            id: id.into(),
            include_in_reports,
        }
    }
}

impl ItemKey for DesignItem {
    fn item_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGroup<I> {
    pub id: String,
    pub items: Vec<I>,
}

impl<I> ItemGroup<I> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items(id: impl Into<String>, items: Vec<I>) -> Self {
        Self {
            id: id.into(),
            items,
        }
    }
}

/// A signing unit together with its display name.
///
/// Keeping the name on the unit means the id → name side table can never
/// disagree with the id → groups map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningUnit<I> {
    pub id: String,
    pub name: String,
    pub groups: Vec<ItemGroup<I>>,
}

impl<I> SigningUnit<I> {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn group(&self, id: &str) -> Option<&ItemGroup<I>> {
        self.groups.iter().find(|group| group.id == id)
    }

    /// Returns the group with `id`, appending an empty one if it is new.
    ///
    /// Groups keep the order in which they were first seen.
    pub fn group_entry(&mut self, id: &str) -> &mut ItemGroup<I> {
        let index = match self.groups.iter().position(|group| group.id == id) {
            Some(index) => index,
            None => {
                self.groups.push(ItemGroup::new(id));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    SigningUnit,
    ItemGroup,
}

impl fmt::Display for GapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SigningUnit => f.write_str("signing unit"),
            Self::ItemGroup => f.write_str("item group"),
        }
    }
}

/// A reference whose target definition is absent from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityGap {
    pub kind: GapKind,
    pub id: String,
    pub referenced_by: String,
}

impl fmt::Display for IntegrityGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' referenced by '{}' has no definition",
            self.kind, self.id, self.referenced_by
        )
    }
}

/// Units keyed by id, plus any integrity gaps tolerated while building them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy<I> {
    units: BTreeMap<String, SigningUnit<I>>,
    integrity_gaps: Vec<IntegrityGap>,
}

impl<I> Default for Hierarchy<I> {
    fn default() -> Self {
        Self {
            units: BTreeMap::new(),
            integrity_gaps: Vec::new(),
        }
    }
}

impl<I> Hierarchy<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a unit, returning the one it replaced if the id was taken.
    pub fn insert(&mut self, unit: SigningUnit<I>) -> Option<SigningUnit<I>> {
        self.units.insert(unit.id.clone(), unit)
    }

    pub fn get(&self, id: &str) -> Option<&SigningUnit<I>> {
        self.units.get(id)
    }

    /// Units in ascending id order.
    pub fn units(&self) -> impl Iterator<Item = &SigningUnit<I>> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The id → display name side table.
    pub fn names(&self) -> BTreeMap<&str, &str> {
        self.units
            .values()
            .map(|unit| (unit.id.as_str(), unit.name.as_str()))
            .collect()
    }

    pub fn record_gap(&mut self, gap: IntegrityGap) {
        self.integrity_gaps.push(gap);
    }

    pub fn integrity_gaps(&self) -> &[IntegrityGap] {
        &self.integrity_gaps
    }
}

/// Hierarchy extracted from the metadata document (`kdSU → kdIG → [kdIT]`).
pub type MetadataHierarchy = Hierarchy<String>;

/// Hierarchy extracted from the design service (`SU → IG → [(IT, flag)]`).
pub type DesignHierarchy = Hierarchy<DesignItem>;

impl DesignHierarchy {
    /// `group-->item` path → `includeInReports`, first occurrence wins.
    ///
    /// Keying by the pair keeps the flags of an item id that appears under
    /// more than one group apart.
    pub fn include_in_reports_by_path(&self) -> BTreeMap<FlatPath, bool> {
        let mut flags = BTreeMap::new();
        for unit in self.units() {
            for group in &unit.groups {
                for item in &group.items {
                    flags
                        .entry(FlatPath::pair(&group.id, &item.id))
                        .or_insert(item.include_in_reports);
                }
            }
        }
        flags
    }
}
