//! Set differences between the metadata and design path sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use studyrecon_model::FlatPath;

/// Paths present on only one side of a single granularity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// In the metadata document but not in the design.
    pub left_only: BTreeSet<FlatPath>,
    /// In the design but not in the metadata document.
    pub right_only: BTreeSet<FlatPath>,
}

impl DiffReport {
    pub fn between(left: &BTreeSet<FlatPath>, right: &BTreeSet<FlatPath>) -> Self {
        Self {
            left_only: left.difference(right).cloned().collect(),
            right_only: right.difference(left).cloned().collect(),
        }
    }

    /// True when both sides hold exactly the same paths.
    pub fn is_empty(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }

    pub fn render_left_only(&self) -> String {
        enumerate(&self.left_only)
    }

    pub fn render_right_only(&self) -> String {
        enumerate(&self.right_only)
    }
}

/// Render paths as a 1-indexed list, one `n. path` per line.
pub fn enumerate<'a>(paths: impl IntoIterator<Item = &'a FlatPath>) -> String {
    paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| format!("{}. {path}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<FlatPath> {
        values.iter().map(|value| FlatPath::single(value)).collect()
    }

    #[test]
    fn identical_sets_have_no_difference() {
        let paths = set(&["A", "B"]);
        assert!(DiffReport::between(&paths, &paths).is_empty());
    }

    #[test]
    fn enumerates_from_one() {
        let report = DiffReport::between(&set(&["A", "C", "B"]), &set(&["B"]));
        insta::assert_snapshot!(report.render_left_only(), @r"
        1. A
        2. C
        ");
        assert_eq!(report.render_right_only(), "");
    }
}
