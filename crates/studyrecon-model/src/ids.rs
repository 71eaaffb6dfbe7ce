#![deny(unsafe_code)]

use std::fmt;

use crate::error::{ReconcileError, Result};

/// Separator between the components of a [`FlatPath`].
pub const PATH_SEPARATOR: &str = "-->";

/// Placeholder rendered wherever one side of a comparison has no value.
pub const MISMATCH_MARKER: &str = "~SENTINEL~";

/// Check that a raw identifier can be flattened and rendered unambiguously.
///
/// `context` names where the value came from and is only used in the error.
pub fn validate_identifier(context: &str, value: &str) -> Result<()> {
    let reason = if value.trim().is_empty() {
        "is blank"
    } else if value.contains(PATH_SEPARATOR) {
        "contains the path separator"
    } else if value == MISMATCH_MARKER {
        "equals the mismatch marker"
    } else {
        return Ok(());
    };
    Err(ReconcileError::ReservedIdentifier {
        context: context.to_string(),
        value: value.to_string(),
        reason,
    })
}

/// A 1-3 level identifier chain joined with [`PATH_SEPARATOR`].
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct FlatPath(String);

impl FlatPath {
    pub fn single(component: &str) -> Self {
        Self(component.to_string())
    }

    pub fn pair(first: &str, second: &str) -> Self {
        Self(format!("{first}{PATH_SEPARATOR}{second}"))
    }

    pub fn join<'a>(components: impl IntoIterator<Item = &'a str>) -> Self {
        let parts: Vec<&str> = components.into_iter().collect();
        Self(parts.join(PATH_SEPARATOR))
    }

    pub fn components(&self) -> Vec<&str> {
        self.0.split(PATH_SEPARATOR).collect()
    }

    /// The innermost component, i.e. the item id of a group/item path.
    pub fn leaf(&self) -> &str {
        self.0
            .rsplit_once(PATH_SEPARATOR)
            .map_or(self.0.as_str(), |(_, leaf)| leaf)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlatPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
