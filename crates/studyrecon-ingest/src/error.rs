//! Error types for metadata and design ingestion.

use std::path::PathBuf;

use studyrecon_model::ReconcileError;
use thiserror::Error;

/// Errors that can occur while loading or extracting either source.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// The metadata document is not well-formed markup.
    #[error("malformed XML: {message}")]
    Xml { message: String },

    /// The design payload is not valid JSON.
    #[error("failed to parse JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    /// The exclusion policy file could not be parsed.
    #[error("failed to parse policy {path}: {source}")]
    Policy {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // === Extraction Errors ===
    /// The parsed source does not fit the expected hierarchy.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }

    pub(crate) fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = IngestError::read(
            "/path/to/pn_metadata.xml",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.to_string(), "file not found: /path/to/pn_metadata.xml");
    }

    #[test]
    fn test_reconcile_error_is_transparent() {
        let err: IngestError = ReconcileError::schema_mismatch("$", "missing field").into();
        assert_eq!(err.to_string(), "schema mismatch at $: missing field");
    }
}
