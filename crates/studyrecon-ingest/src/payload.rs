//! Byte-level decoding of captured source payloads.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode raw bytes as UTF-8, falling back to Windows-1252.
///
/// The design service has been observed to answer in Latin-1, so a payload
/// that is not valid UTF-8 is decoded with the superset encoding instead of
/// being rejected.
pub fn decode_payload(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(err) => {
            debug!(
                valid_up_to = err.valid_up_to(),
                "payload is not UTF-8, decoding as windows-1252"
            );
            let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Parse decoded text as JSON.
pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| IngestError::Json { source })
}

/// Read a captured design-service (or catalog) response from disk.
pub fn load_design_json(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path).map_err(|err| IngestError::read(path, err))?;
    let value = parse_json(&decode_payload(&bytes))?;
    debug!(path = %path.display(), "loaded design payload");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        assert_eq!(decode_payload(b"\xEF\xBB\xBF{}"), "{}");
    }

    #[test]
    fn falls_back_to_windows_1252() {
        // "Café" encoded as Latin-1
        assert_eq!(decode_payload(b"Caf\xE9"), "Café");
    }

    #[test]
    fn keeps_valid_utf8() {
        assert_eq!(decode_payload("Café".as_bytes()), "Café");
    }

    #[test]
    fn html_error_page_is_not_json() {
        let err = parse_json("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, IngestError::Json { .. }));
    }
}
