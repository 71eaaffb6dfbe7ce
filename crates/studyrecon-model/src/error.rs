use thiserror::Error;

use crate::hierarchy::IntegrityGap;

/// Faults raised while turning the two sources into hierarchies.
///
/// All variants are deterministic for a given input; nothing here is
/// transient or worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// A node in the metadata document lacks an attribute the extractor needs.
    #[error("source format fault: <{node}> is missing attribute '{attribute}'")]
    SourceFormat { node: String, attribute: String },

    /// The design-service payload does not have the expected shape.
    #[error("schema mismatch at {path}: {message}")]
    SchemaMismatch { path: String, message: String },

    /// A referenced unit or group has no definition.
    #[error("integrity gap: {0}")]
    IntegrityGap(IntegrityGap),

    /// An identifier collides with the path separator or the mismatch marker.
    #[error("reserved identifier in {context}: {value:?} {reason}")]
    ReservedIdentifier {
        context: String,
        value: String,
        reason: &'static str,
    },
}

impl ReconcileError {
    pub fn source_format(node: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::SourceFormat {
            node: node.into(),
            attribute: attribute.into(),
        }
    }

    pub fn schema_mismatch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
