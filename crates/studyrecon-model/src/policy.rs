#![deny(unsafe_code)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Signing units that are infrastructure rather than questionnaires.
pub const DEFAULT_EXCLUDED_SIGNING_UNITS: &[&str] = &[
    "AnalysisPeriodLabel",
    "AssigneSense",
    "Assignment",
    "APC",
    "EndLogPadUse",
    "ICAC",
    "ISAC",
    "NewCaregiver",
    "RegisterASMA1",
    "AddUser",
    "DeactivateSubject",
    "DeactivateUser",
    "Replacement",
    "Synchronization",
    "Training",
    "VisitEnd",
    "VisitStart",
    "Activation",
    "EstablishID",
    "ConfirmID",
];

/// Item groups every signing unit carries for bookkeeping.
pub const DEFAULT_EXCLUDED_ITEM_GROUPS: &[&str] = &[
    "Protocol",
    "Header",
    "FormLevelData",
    "CG",
    "LogPadPerformance",
    "NetProInformation",
    "TimeZone",
    "Phase",
];

/// Group markers the design service uses for items outside any group.
pub const DEFAULT_IGNORED_GROUP_MARKERS: &[&str] = &["-"];

/// Study event whose signing-unit references define the candidate units.
pub const DEFAULT_EVENT_KIND: &str = "LogPad";

/// What to do when a reference points at a missing definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityPolicy {
    /// Abort extraction with an integrity-gap error.
    #[default]
    Strict,
    /// Record the gap on the hierarchy, log it, and keep going.
    Lenient,
}

/// Names and markers removed from both sources before comparison.
///
/// Every field falls back to the built-in default when absent from a
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExclusionPolicy {
    /// Value of the study event kind attribute that scopes candidate units.
    pub event_kind: String,
    /// Signing unit ids dropped from the metadata document.
    pub excluded_signing_units: BTreeSet<String>,
    /// Item group ids dropped from the metadata document.
    pub excluded_item_groups: BTreeSet<String>,
    /// Questionnaire SUs dropped from the design payload.
    pub excluded_questionnaires: BTreeSet<String>,
    /// Design item group markers whose items are ignored.
    pub ignored_group_markers: BTreeSet<String>,
    pub integrity: IntegrityPolicy,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            event_kind: DEFAULT_EVENT_KIND.to_string(),
            excluded_signing_units: to_set(DEFAULT_EXCLUDED_SIGNING_UNITS),
            excluded_item_groups: to_set(DEFAULT_EXCLUDED_ITEM_GROUPS),
            excluded_questionnaires: BTreeSet::new(),
            ignored_group_markers: to_set(DEFAULT_IGNORED_GROUP_MARKERS),
            integrity: IntegrityPolicy::default(),
        }
    }
}

impl ExclusionPolicy {
    /// A policy that excludes nothing.
    pub fn permissive() -> Self {
        Self {
            event_kind: DEFAULT_EVENT_KIND.to_string(),
            excluded_signing_units: BTreeSet::new(),
            excluded_item_groups: BTreeSet::new(),
            excluded_questionnaires: BTreeSet::new(),
            ignored_group_markers: BTreeSet::new(),
            integrity: IntegrityPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_integrity(mut self, integrity: IntegrityPolicy) -> Self {
        self.integrity = integrity;
        self
    }

    pub fn excludes_signing_unit(&self, id: &str) -> bool {
        self.excluded_signing_units.contains(id)
    }

    pub fn excludes_item_group(&self, id: &str) -> bool {
        self.excluded_item_groups.contains(id)
    }

    pub fn excludes_questionnaire(&self, su: &str) -> bool {
        self.excluded_questionnaires.contains(su)
    }

    pub fn ignores_group_marker(&self, marker: &str) -> bool {
        self.ignored_group_markers.contains(marker)
    }
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
