use roxmltree::{Document, Node};

use crate::types::{
    error::{Result, YxdbError},
    field::RawField,
};

const RECORD_INFO_TAG: &str = "RecordInfo";

/// Extracts the raw attributes of every field described by the first
/// `RecordInfo` element, in declaration order.
///
/// Each element child of `RecordInfo` describes one field; text and comment
/// nodes are skipped.
pub fn parse_record_info(xml: &str) -> Result<Vec<RawField>> {
    let doc = Document::parse(xml).map_err(|e| YxdbError::InvalidMetadata {
        details: format!("Failed to parse XML: {}", e),
    })?;

    let record_info = doc
        .descendants()
        .find(|n| n.is_element() && n.has_tag_name(RECORD_INFO_TAG))
        .ok_or_else(|| YxdbError::InvalidMetadata {
            details: format!("missing {} element", RECORD_INFO_TAG),
        })?;

    Ok(record_info
        .children()
        .filter(|n| n.is_element())
        .map(|n| raw_field(&n))
        .collect())
}

fn raw_field(node: &Node) -> RawField {
    let attr = |name: &str| node.attribute(name).map(str::to_string);
    RawField {
        name: attr("name"),
        field_type: attr("type"),
        source: attr("source"),
        description: attr("description"),
        size: attr("size"),
        scale: attr("scale"),
    }
}
