use std::fmt;

use serde::{Deserialize, Serialize};

/// The four levels at which the two hierarchies are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Signing unit display names.
    Names,
    /// Signing unit identifiers.
    Ids,
    /// `unit-->group` pairs.
    Pairs,
    /// `group-->item` pairs, independent of the owning unit.
    Triples,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [Self::Names, Self::Ids, Self::Pairs, Self::Triples];

    /// Stable lowercase identifier, used for file names.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Names => "names",
            Self::Ids => "ids",
            Self::Pairs => "pairs",
            Self::Triples => "triples",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Names => "Signing unit names",
            Self::Ids => "Signing unit ids",
            Self::Pairs => "Unit to item group",
            Self::Triples => "Item group to item",
        }
    }

    /// Column header describing a value on the metadata side.
    pub fn metadata_header(self) -> &'static str {
        match self {
            Self::Names => "pn_metadata Name",
            Self::Ids => "pn_metadata kdSU",
            Self::Pairs => "pn_metadata kdSU-->kdIG",
            Self::Triples => "pn_metadata kdIG-->kdIT",
        }
    }

    /// Column header describing a value on the design side.
    pub fn design_header(self) -> &'static str {
        match self {
            Self::Names => "study_designer name",
            Self::Ids => "study_designer su",
            Self::Pairs => "study_designer su-->ig",
            Self::Triples => "study_designer ig-->it",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
