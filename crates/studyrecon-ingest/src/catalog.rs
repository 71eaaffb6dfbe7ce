//! Study identification and design-catalog lookups.
//!
//! The metadata document names the study's protocols in a `Protocol`
//! codelist; the design service lists every design with its protocol. These
//! helpers pick the design export that belongs to the document.

use serde_json::Value;
use studyrecon_model::{ReconcileError, Result};
use tracing::debug;

use crate::design::{as_object, required_str};
use crate::tree::TreeNode;

const CODE_LIST_DEF: &str = "CodeListDef";
const CODE_LIST_ITEM: &str = "CodeListItem";
const PROTOCOL_CODE_LIST: &str = "Protocol";
const IDENTIFICATION: &str = "Identification";
const DESCRIPTION: &str = "Description";

const VERSION_SEPARATOR: char = '@';
const UNVERSIONED_RANK: f64 = -1.0;

/// Descriptions of the items of every `Protocol` codelist, in document order.
pub fn study_protocols<N: TreeNode>(root: &N) -> Result<Vec<String>> {
    let mut protocols = Vec::new();
    for codelist in root.find_all_where(CODE_LIST_DEF, "Name", PROTOCOL_CODE_LIST) {
        for item in codelist.find_all(CODE_LIST_ITEM) {
            protocols.push(item.require_attr(DESCRIPTION)?.to_string());
        }
    }
    Ok(protocols)
}

/// Text of the study's identification description, if present and non-empty.
pub fn study_description<N: TreeNode>(root: &N) -> Option<String> {
    root.find_first(IDENTIFICATION)
        .and_then(|identification| identification.find_first(DESCRIPTION))
        .map(|description| description.text().to_string())
        .filter(|text| !text.is_empty())
}

/// Design ids from a catalog payload whose protocol is one of `protocols`.
///
/// The catalog is a list of `{ "protocol": .., "designId": .. }` records.
pub fn matching_design_ids(catalog: &Value, protocols: &[String]) -> Result<Vec<String>> {
    let entries = catalog
        .as_array()
        .ok_or_else(|| ReconcileError::schema_mismatch("$", "expected an array"))?;
    let mut ids = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let path = format!("[{index}]");
        let record = as_object(entry, &path)?;
        let protocol = required_str(record, &path, "protocol")?;
        let design_id = required_str(record, &path, "designId")?;
        if protocols.iter().any(|candidate| candidate == protocol) {
            ids.push(design_id.to_string());
        }
    }
    debug!(matches = ids.len(), catalog_size = entries.len(), "matched design ids");
    Ok(ids)
}

/// Pick the highest-versioned id of the form `name` or `name@version`.
///
/// Unversioned ids rank below every versioned one; among equal versions the
/// last id in input order wins.
pub fn latest_design_id(ids: &[String]) -> Result<Option<&str>> {
    let mut latest: Option<(f64, &str)> = None;
    for id in ids {
        let rank = design_version(id)?;
        if latest.is_none_or(|(best, _)| rank >= best) {
            latest = Some((rank, id.as_str()));
        }
    }
    Ok(latest.map(|(_, id)| id))
}

fn design_version(id: &str) -> Result<f64> {
    let Some(version) = id.split(VERSION_SEPARATOR).nth(1) else {
        return Ok(UNVERSIONED_RANK);
    };
    version
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            ReconcileError::schema_mismatch(id, format!("design version {version:?} is not numeric"))
        })
}
