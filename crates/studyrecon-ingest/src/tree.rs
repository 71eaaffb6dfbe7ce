//! Generic attribute tree over the metadata document.
//!
//! The extractors only need to find nodes of a kind and read their
//! attributes, so they are written against [`TreeNode`]. [`XmlNode`] is the
//! owned implementation built from XML text.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use studyrecon_model::ReconcileError;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::payload::decode_payload;

/// Read-only query surface over a tree of kinded, attributed nodes.
///
/// Kind and attribute-name comparisons ignore ASCII case; the source
/// documents are not consistent about `kdSU` versus `kdsu`.
pub trait TreeNode: Sized {
    fn kind(&self) -> &str;

    fn attr(&self, name: &str) -> Option<&str>;

    fn children(&self) -> &[Self];

    /// Concatenated character data directly under this node, trimmed.
    fn text(&self) -> &str;

    fn is_kind(&self, kind: &str) -> bool {
        self.kind().eq_ignore_ascii_case(kind)
    }

    /// All descendants of `kind` in document order, excluding `self`.
    fn find_all(&self, kind: &str) -> Vec<&Self> {
        let mut found = Vec::new();
        let mut pending: Vec<&Self> = self.children().iter().rev().collect();
        while let Some(node) = pending.pop() {
            if node.is_kind(kind) {
                found.push(node);
            }
            pending.extend(node.children().iter().rev());
        }
        found
    }

    /// Descendants of `kind` whose `attr` equals `value` exactly.
    fn find_all_where(&self, kind: &str, attr: &str, value: &str) -> Vec<&Self> {
        self.find_all(kind)
            .into_iter()
            .filter(|node| node.attr(attr) == Some(value))
            .collect()
    }

    fn find_first(&self, kind: &str) -> Option<&Self> {
        let mut pending: Vec<&Self> = self.children().iter().rev().collect();
        while let Some(node) = pending.pop() {
            if node.is_kind(kind) {
                return Some(node);
            }
            pending.extend(node.children().iter().rev());
        }
        None
    }

    /// Like [`TreeNode::attr`], but a missing attribute is a source format fault.
    fn require_attr(&self, name: &str) -> std::result::Result<&str, ReconcileError> {
        self.attr(name)
            .ok_or_else(|| ReconcileError::source_format(self.kind(), name))
    }
}

/// An owned XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    kind: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.push_str(&text.into());
        self
    }
}

impl TreeNode for XmlNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn text(&self) -> &str {
        self.text.trim()
    }
}

/// Read and parse a metadata document from disk.
pub fn load_document(path: &Path) -> Result<XmlNode> {
    let bytes = std::fs::read(path).map_err(|err| IngestError::read(path, err))?;
    let text = decode_payload(&bytes);
    let root = parse_xml(&text)?;
    debug!(path = %path.display(), root = root.kind(), "parsed metadata document");
    Ok(root)
}

/// Parse XML text into an owned element tree rooted at the document element.
pub fn parse_xml(text: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                return Err(IngestError::xml(format!(
                    "{err} at byte {}",
                    reader.error_position()
                )));
            }
        };
        match event {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let node = element_from(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                let node = stack
                    .pop()
                    .ok_or_else(|| IngestError::xml(format!("unexpected closing tag </{name}>")))?;
                if node.kind != name {
                    return Err(IngestError::xml(format!(
                        "closing tag </{name}> does not match <{}>",
                        node.kind
                    )));
                }
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&text);
                    let value =
                        unescape(&raw).map_err(|err| IngestError::xml(err.to_string()))?;
                    top.text.push_str(&value);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(top) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&reference).into_owned();
                    top.text.push_str(&resolve_reference(&name)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(IngestError::xml(format!("unclosed element <{}>", open.kind)));
    }
    root.ok_or_else(|| IngestError::xml("document has no root element"))
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| IngestError::xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = unescape(&raw)
            .map_err(|err| IngestError::xml(err.to_string()))?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(IngestError::xml(format!(
            "second root element <{}>",
            node.kind
        )));
    }
    *root = Some(node);
    Ok(())
}

fn resolve_reference(name: &str) -> Result<String> {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        return parsed
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| IngestError::xml(format!("invalid character reference &{name};")));
    }
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| IngestError::xml(format!("unknown entity &{name};")))
}
