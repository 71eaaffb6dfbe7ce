//! Extraction of the `SU → IG → [(IT, includeInReports)]` hierarchy from a
//! study-design export.

use serde_json::{Map, Value};
use studyrecon_model::{
    DesignHierarchy, DesignItem, ExclusionPolicy, ReconcileError, Result, SigningUnit,
    validate_identifier,
};
use tracing::{debug, info};

/// Build the design hierarchy from the deserialized export payload.
///
/// The whole payload is shape-checked; a missing or mistyped field anywhere
/// is a [`ReconcileError::SchemaMismatch`] and nothing is returned.
pub fn extract_design_hierarchy(
    design: &Value,
    policy: &ExclusionPolicy,
) -> Result<DesignHierarchy> {
    let root = as_object(design, "$")?;
    let questionnaires = required_array(root, "$", "questionnaires")?;

    let mut hierarchy = DesignHierarchy::new();
    let mut skipped_items = 0usize;
    for (index, questionnaire) in questionnaires.iter().enumerate() {
        let path = format!("questionnaires[{index}]");
        let record = as_object(questionnaire, &path)?;
        let su = required_str(record, &path, "su")?;
        let name = required_str(record, &path, "name")?;
        let items = required_array(record, &path, "items")?;

        let excluded = policy.excludes_questionnaire(su);
        if !excluded {
            validate_identifier("su", su)?;
            validate_identifier("questionnaire name", name)?;
        }

        let mut unit = SigningUnit::new(su, name);
        for (item_index, item) in items.iter().enumerate() {
            let item_path = format!("{path}.items[{item_index}]");
            let entry = as_object(item, &item_path)?;
            let group = required_str(entry, &item_path, "ig")?;
            let item_id = required_str(entry, &item_path, "it")?;
            let include = required_bool(entry, &item_path, "includeInReports")?;
            if excluded {
                continue;
            }
            if policy.ignores_group_marker(group) {
                skipped_items += 1;
                continue;
            }
            validate_identifier("ig", group)?;
            validate_identifier("it", item_id)?;
            unit.group_entry(group)
                .items
                .push(DesignItem::new(item_id, include));
        }

        if excluded {
            debug!(su, "questionnaire excluded by policy");
            continue;
        }
        if let Some(previous) = hierarchy.insert(unit) {
            debug!(su = %previous.id, "duplicate questionnaire, keeping the later record");
        }
    }

    info!(
        units = hierarchy.len(),
        skipped_items,
        "extracted design hierarchy"
    );
    Ok(hierarchy)
}

pub(crate) fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ReconcileError::schema_mismatch(path, "expected an object"))
}

pub(crate) fn required_array<'a>(
    record: &'a Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<&'a Vec<Value>> {
    required(record, path, field)?
        .as_array()
        .ok_or_else(|| {
            ReconcileError::schema_mismatch(path, format!("field '{field}' is not an array"))
        })
}

pub(crate) fn required_str<'a>(
    record: &'a Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<&'a str> {
    required(record, path, field)?
        .as_str()
        .ok_or_else(|| {
            ReconcileError::schema_mismatch(path, format!("field '{field}' is not a string"))
        })
}

fn required_bool(record: &Map<String, Value>, path: &str, field: &str) -> Result<bool> {
    required(record, path, field)?
        .as_bool()
        .ok_or_else(|| {
            ReconcileError::schema_mismatch(path, format!("field '{field}' is not a boolean"))
        })
}

fn required<'a>(record: &'a Map<String, Value>, path: &str, field: &str) -> Result<&'a Value> {
    record
        .get(field)
        .ok_or_else(|| ReconcileError::schema_mismatch(path, format!("missing field '{field}'")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn groups_keep_first_seen_order() {
        let design = json!({
            "questionnaires": [{
                "su": "Diary",
                "name": "Daily Diary",
                "items": [
                    { "ig": "Sleep", "it": "Q1", "includeInReports": true },
                    { "ig": "Pain", "it": "Q2", "includeInReports": false },
                    { "ig": "Sleep", "it": "Q3", "includeInReports": true }
                ]
            }]
        });
        let hierarchy =
            extract_design_hierarchy(&design, &ExclusionPolicy::permissive()).unwrap();
        let unit = hierarchy.get("Diary").unwrap();
        let groups: Vec<&str> = unit.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(groups, vec!["Sleep", "Pain"]);
        let sleep: Vec<&str> = unit.groups[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(sleep, vec!["Q1", "Q3"]);
    }

    #[test]
    fn mistyped_flag_is_schema_mismatch() {
        let design = json!({
            "questionnaires": [{
                "su": "Diary",
                "name": "Daily Diary",
                "items": [{ "ig": "Sleep", "it": "Q1", "includeInReports": "yes" }]
            }]
        });
        let err = extract_design_hierarchy(&design, &ExclusionPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::schema_mismatch(
                "questionnaires[0].items[0]",
                "field 'includeInReports' is not a boolean"
            )
        );
    }
}
