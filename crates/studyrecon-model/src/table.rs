#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::ids::MISMATCH_MARKER;

/// One named column of a comparison table.
///
/// `None` marks a position where this side has no counterpart value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn rendered(&self, row: usize) -> &str {
        self.values
            .get(row)
            .and_then(Option::as_deref)
            .unwrap_or(MISMATCH_MARKER)
    }

    pub fn mismatch_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_none()).count()
    }
}

/// An ordered set of equally long columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub title: String,
    pub columns: Vec<Column>,
}

impl ComparisonTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
        }
    }

    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Number of rows, i.e. the length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Column::len).max().unwrap_or(0)
    }

    /// Rows with mismatch slots rendered as [`MISMATCH_MARKER`].
    pub fn rendered_rows(&self) -> Vec<Vec<&str>> {
        (0..self.row_count())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| column.rendered(row))
                    .collect()
            })
            .collect()
    }
}
