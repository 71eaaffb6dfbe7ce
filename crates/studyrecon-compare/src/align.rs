//! Positional alignment of two sorted columns.
//!
//! Zipping two sorted columns of different lengths row by row would put
//! unrelated values side by side. [`align`] instead walks both columns with
//! one cursor each, like the merge step of merge sort, and emits a gap
//! (`None`) on whichever side is behind. Reading the result top to bottom
//! shows every value of both inputs in order, with each row holding either
//! two equal values or a value next to a gap.

use std::cmp::Ordering;

/// Two equally long columns produced by [`align`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment<T> {
    pub left: Vec<Option<T>>,
    pub right: Vec<Option<T>>,
}

impl<T> Alignment<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            left: Vec::with_capacity(capacity),
            right: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, left: Option<T>, right: Option<T>) {
        self.left.push(left);
        self.right.push(right);
    }

    /// Number of rows; both columns always have this length.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Rows where one side is missing.
    pub fn mismatch_count(&self) -> usize {
        self.left
            .iter()
            .zip(&self.right)
            .filter(|(left, right)| left.is_none() || right.is_none())
            .count()
    }

    /// The left column with gaps removed.
    pub fn left_values(&self) -> Vec<&T> {
        self.left.iter().flatten().collect()
    }

    /// The right column with gaps removed.
    pub fn right_values(&self) -> Vec<&T> {
        self.right.iter().flatten().collect()
    }
}

/// Align two ascending sequences, inserting a gap wherever they disagree.
///
/// At each step the smaller of the two current values is emitted against a
/// gap on the other side; equal values are emitted together. Once one side is
/// exhausted the rest of the other side is emitted against gaps. Duplicates
/// pair up one-to-one by position, so `[a, a]` against `[a]` yields one
/// matched row and one `a` against a gap.
///
/// The output satisfies, for any inputs:
/// - removing the gaps from each column gives back the corresponding input;
/// - no row has a gap on both sides;
/// - every row without a gap holds equal values.
///
/// For sorted inputs the row count is `len(left) + len(right) - matched`.
pub fn align<T: Ord + Clone>(left: &[T], right: &[T]) -> Alignment<T> {
    let mut aligned = Alignment::with_capacity(left.len().max(right.len()));
    let mut left_cursor = 0;
    let mut right_cursor = 0;

    loop {
        match (left.get(left_cursor), right.get(right_cursor)) {
            (Some(l), Some(r)) => match l.cmp(r) {
                Ordering::Equal => {
                    aligned.push(Some(l.clone()), Some(r.clone()));
                    left_cursor += 1;
                    right_cursor += 1;
                }
                Ordering::Less => {
                    aligned.push(Some(l.clone()), None);
                    left_cursor += 1;
                }
                Ordering::Greater => {
                    aligned.push(None, Some(r.clone()));
                    right_cursor += 1;
                }
            },
            (Some(l), None) => {
                aligned.push(Some(l.clone()), None);
                left_cursor += 1;
            }
            (None, Some(r)) => {
                aligned.push(None, Some(r.clone()));
                right_cursor += 1;
            }
            (None, None) => break,
        }
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn column(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|value| value.map(str::to_string)).collect()
    }

    #[test]
    fn equal_inputs_need_no_gaps() {
        let values = owned(&["A", "B", "C"]);
        let aligned = align(&values, &values);
        assert_eq!(aligned.len(), 3);
        assert_eq!(aligned.mismatch_count(), 0);
        assert_eq!(aligned.left, aligned.right);
    }

    #[test]
    fn empty_inputs() {
        let empty: Vec<String> = Vec::new();
        assert!(align(&empty, &empty).is_empty());

        let aligned = align(&owned(&["A"]), &empty);
        assert_eq!(aligned.left, column(&[Some("A")]));
        assert_eq!(aligned.right, column(&[None]));
    }

    #[test]
    fn trailing_surplus_is_padded() {
        let aligned = align(&owned(&["A", "B", "C", "D"]), &owned(&["A"]));
        assert_eq!(aligned.left, column(&[Some("A"), Some("B"), Some("C"), Some("D")]));
        assert_eq!(aligned.right, column(&[Some("A"), None, None, None]));
    }

    #[test]
    fn interleaved_mismatches() {
        let aligned = align(&owned(&["A", "C", "E"]), &owned(&["B", "C", "D"]));
        assert_eq!(
            aligned.left,
            column(&[Some("A"), None, Some("C"), None, Some("E")])
        );
        assert_eq!(
            aligned.right,
            column(&[None, Some("B"), Some("C"), Some("D"), None])
        );
    }

    #[test]
    fn duplicates_pair_by_position() {
        let aligned = align(&owned(&["A", "A", "B"]), &owned(&["A", "B", "B"]));
        assert_eq!(
            aligned.left,
            column(&[Some("A"), Some("A"), Some("B"), None])
        );
        assert_eq!(
            aligned.right,
            column(&[Some("A"), None, Some("B"), Some("B")])
        );
        assert_eq!(aligned.left_values(), vec!["A", "A", "B"]);
        assert_eq!(aligned.right_values(), vec!["A", "B", "B"]);
    }
}
