//! Property tests for the alignment engine and the set-difference reporter.

use std::collections::BTreeSet;

use proptest::prelude::*;
use studyrecon_compare::{DiffReport, align};
use studyrecon_model::FlatPath;

fn sorted_column() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,2}", 0..12).prop_map(|mut values| {
        values.sort();
        values
    })
}

fn path_set() -> impl Strategy<Value = BTreeSet<FlatPath>> {
    prop::collection::btree_set("[a-f]{1,2}", 0..10)
        .prop_map(|values| values.iter().map(|value| FlatPath::single(value)).collect())
}

proptest! {
    #[test]
    fn stripping_gaps_recovers_inputs(left in sorted_column(), right in sorted_column()) {
        let aligned = align(&left, &right);
        prop_assert_eq!(aligned.left_values(), left.iter().collect::<Vec<_>>());
        prop_assert_eq!(aligned.right_values(), right.iter().collect::<Vec<_>>());
    }

    #[test]
    fn columns_have_equal_length(left in sorted_column(), right in sorted_column()) {
        let aligned = align(&left, &right);
        prop_assert_eq!(aligned.left.len(), aligned.right.len());
        prop_assert!(aligned.len() >= left.len().max(right.len()));
        prop_assert!(aligned.len() <= left.len() + right.len());
    }

    #[test]
    fn every_row_matches_or_has_one_gap(left in sorted_column(), right in sorted_column()) {
        let aligned = align(&left, &right);
        for (l, r) in aligned.left.iter().zip(&aligned.right) {
            match (l, r) {
                (Some(l), Some(r)) => prop_assert_eq!(l, r),
                (None, None) => prop_assert!(false, "gap on both sides"),
                _ => {}
            }
        }
    }

    #[test]
    fn realigning_is_idempotent(left in sorted_column(), right in sorted_column()) {
        let first = align(&left, &right);
        let left: Vec<String> = first.left_values().into_iter().cloned().collect();
        let right: Vec<String> = first.right_values().into_iter().cloned().collect();
        let second = align(&left, &right);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn equal_inputs_align_without_gaps(values in sorted_column()) {
        let aligned = align(&values, &values);
        prop_assert_eq!(aligned.mismatch_count(), 0);
        let expected: Vec<Option<String>> = values.iter().cloned().map(Some).collect();
        prop_assert_eq!(&aligned.left, &expected);
        prop_assert_eq!(&aligned.right, &expected);
    }

    #[test]
    fn differences_are_disjoint_set_differences(left in path_set(), right in path_set()) {
        let report = DiffReport::between(&left, &right);
        prop_assert!(report.left_only.is_disjoint(&report.right_only));

        let expected_left: BTreeSet<FlatPath> = left.difference(&right).cloned().collect();
        let expected_right: BTreeSet<FlatPath> = right.difference(&left).cloned().collect();
        prop_assert_eq!(report.left_only.is_empty(), left.is_subset(&right));
        prop_assert_eq!(report.right_only.is_empty(), right.is_subset(&left));
        prop_assert_eq!(report.left_only, expected_left);
        prop_assert_eq!(report.right_only, expected_right);
    }

    #[test]
    fn flat_paths_split_back_into_components(
        first in "[A-Za-z0-9_.]{1,8}",
        second in "[A-Za-z0-9_.]{1,8}",
    ) {
        let path = FlatPath::pair(&first, &second);
        prop_assert_eq!(path.components(), vec![first.as_str(), second.as_str()]);
    }
}
