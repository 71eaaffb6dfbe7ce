//! Source ingestion for study design reconciliation.
//!
//! This crate turns the two independently authored descriptions of a
//! study's data-collection schema into comparable hierarchies.
//!
//! # Features
//!
//! - **Document Tree**: Parse the metadata XML into a queryable [`XmlNode`] tree
//! - **Metadata Extraction**: Build `kdSU → kdIG → [kdIT]` under an exclusion policy
//! - **Design Extraction**: Build `SU → IG → [(IT, includeInReports)]` from the export JSON
//! - **Catalog Lookup**: Find the study's protocols and its latest design id
//! - **Policy Files**: Load exclusion lists from TOML
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use studyrecon_ingest::{extract_design_hierarchy, extract_metadata_hierarchy, load_design_json, load_document};
//! use studyrecon_model::ExclusionPolicy;
//!
//! let policy = ExclusionPolicy::default();
//! let document = load_document(Path::new("pn_metadata.xml"))?;
//! let metadata = extract_metadata_hierarchy(&document, &policy)?;
//! let design = extract_design_hierarchy(&load_design_json(Path::new("design.json"))?, &policy)?;
//! ```

mod catalog;
mod design;
mod error;
mod metadata;
mod payload;
mod policy;
mod tree;

// === Error Types ===
pub use error::{IngestError, Result};

// === Document Tree ===
pub use tree::{TreeNode, XmlNode, load_document, parse_xml};

// === Extraction ===
pub use design::extract_design_hierarchy;
pub use metadata::extract_metadata_hierarchy;

// === Catalog ===
pub use catalog::{latest_design_id, matching_design_ids, study_description, study_protocols};

// === Payloads and Configuration ===
pub use payload::{decode_payload, load_design_json, parse_json};
pub use policy::{load_policy, parse_policy};
