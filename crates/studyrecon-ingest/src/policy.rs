use std::path::Path;

use studyrecon_model::ExclusionPolicy;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Load an exclusion policy from a TOML file.
///
/// Keys absent from the file keep their built-in defaults, so an empty file
/// yields [`ExclusionPolicy::default`].
pub fn load_policy(path: &Path) -> Result<ExclusionPolicy> {
    let text = std::fs::read_to_string(path).map_err(|err| IngestError::read(path, err))?;
    let policy = parse_policy(&text).map_err(|source| IngestError::Policy {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        excluded_signing_units = policy.excluded_signing_units.len(),
        excluded_item_groups = policy.excluded_item_groups.len(),
        "loaded exclusion policy"
    );
    Ok(policy)
}

pub fn parse_policy(text: &str) -> std::result::Result<ExclusionPolicy, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use studyrecon_model::IntegrityPolicy;

    use super::*;

    #[test]
    fn empty_file_is_default_policy() {
        assert_eq!(parse_policy("").unwrap(), ExclusionPolicy::default());
    }

    #[test]
    fn overrides_replace_only_named_lists() {
        let policy = parse_policy(
            r#"
            event_kind = "Tablet"
            excluded_item_groups = ["Header"]
            integrity = "lenient"
            "#,
        )
        .unwrap();
        assert_eq!(policy.event_kind, "Tablet");
        assert_eq!(policy.excluded_item_groups.len(), 1);
        assert!(policy.excludes_signing_unit("Training"));
        assert_eq!(policy.integrity, IntegrityPolicy::Lenient);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(parse_policy("exclude_everything = true").is_err());
    }
}
