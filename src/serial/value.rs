//! Loose-input boundary for serialization.
//!
//! Trees frequently arrive from untrusted structured-data sources — a
//! persisted JSON blob, a foreign producer, a hand-built value — with
//! missing or mistyped fields. Rather than threading optional-field
//! tolerance through the serializer, this module converts such input once
//! into the strict node type, applying defined defaulting rules:
//!
//! - unknown or missing discriminant → the node is skipped
//! - missing `children`/`attributes` → empty
//! - missing or non-string scalar fields → empty string
//! - missing XML-declaration version → `"1.0"`
//! - missing or empty `prefix` → no prefix
//! - a nameless attribute is dropped
//!
//! [`serialize_value`] composes the conversion with the strict serializer
//! and never fails — malformed input degrades to an empty string.

use serde_json::Value;

use crate::serial::xml::serialize_node;
use crate::tree::{Attribute, Document, DocumentType, Element, Node, Pi, XmlDeclaration};

/// The discriminant key, matching the serde representation of [`Node`].
const TYPE_KEY: &str = "type";

/// Converts a loose value into a strict [`Node`].
///
/// Returns `None` when the value is not an object or its discriminant is
/// missing or unknown — callers skip such nodes silently.
#[must_use]
pub fn node_from_value(value: &Value) -> Option<Node> {
    let kind = value.get(TYPE_KEY)?.as_str()?;
    match kind {
        "Element" => Some(Node::Element(element_from_value(value))),
        "Text" => Some(Node::Text {
            content: string_field(value, "content"),
        }),
        "CData" => Some(Node::CData {
            content: string_field(value, "content"),
        }),
        "Comment" => Some(Node::Comment {
            content: string_field(value, "content"),
        }),
        "ProcessingInstruction" => Some(Node::ProcessingInstruction(Pi {
            target: string_field(value, "target"),
            data: string_field(value, "data"),
        })),
        "XmlDeclaration" => Some(Node::XmlDeclaration(XmlDeclaration {
            version: match optional_string_field(value, "version") {
                Some(v) => v,
                None => "1.0".to_string(),
            },
            encoding: optional_string_field(value, "encoding"),
            standalone: value.get("standalone").and_then(Value::as_bool),
        })),
        "DocumentType" => Some(Node::DocumentType(DocumentType {
            name: string_field(value, "name"),
            public_id: optional_string_field(value, "public_id"),
            system_id: optional_string_field(value, "system_id"),
            internal_subset: optional_string_field(value, "internal_subset"),
        })),
        _ => None,
    }
}

/// Converts a loose value into a [`Document`], treating a missing or
/// mistyped `children` field as empty and skipping unrecognized children.
#[must_use]
pub fn document_from_value(value: &Value) -> Document {
    Document {
        children: child_nodes(value),
        diagnostics: Vec::new(),
    }
}

/// Serializes a loose value directly. Unknown or missing node kinds yield
/// an empty string; this function never fails.
#[must_use]
pub fn serialize_value(value: &Value) -> String {
    match node_from_value(value) {
        Some(node) => serialize_node(&node),
        None => String::new(),
    }
}

fn element_from_value(value: &Value) -> Element {
    let attributes = value
        .get("attributes")
        .and_then(Value::as_array)
        .map(|attrs| {
            attrs
                .iter()
                .filter_map(attribute_from_value)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Element {
        name: string_field(value, "name"),
        prefix: prefix_field(value),
        namespace: optional_string_field(value, "namespace"),
        attributes,
        children: child_nodes(value),
    }
}

fn attribute_from_value(value: &Value) -> Option<Attribute> {
    let name = string_field(value, "name");
    if name.is_empty() {
        // Nameless attributes are dropped.
        return None;
    }
    Some(Attribute {
        name,
        prefix: prefix_field(value),
        namespace: optional_string_field(value, "namespace"),
        value: string_field(value, "value"),
    })
}

fn child_nodes(value: &Value) -> Vec<Node> {
    value
        .get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().filter_map(node_from_value).collect())
        .unwrap_or_default()
}

/// A scalar field: missing or non-string values default to empty string.
fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// An optional scalar field: present strings only.
fn optional_string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// A prefix field: missing or empty means "no prefix".
fn prefix_field(value: &Value) -> Option<String> {
    optional_string_field(value, "prefix").filter(|p| !p.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unknown_discriminant_is_empty() {
        assert_eq!(serialize_value(&json!({"type": "Wombat"})), "");
        assert_eq!(serialize_value(&json!({"name": "no-type"})), "");
        assert_eq!(serialize_value(&json!(42)), "");
        assert_eq!(serialize_value(&json!(null)), "");
    }

    #[test]
    fn test_minimal_element() {
        assert_eq!(serialize_value(&json!({"type": "Element", "name": "a"})), "<a/>");
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let v = json!({"type": "Element", "name": "a", "attributes": null, "children": "bogus"});
        assert_eq!(serialize_value(&v), "<a/>");
    }

    #[test]
    fn test_unknown_children_skipped() {
        let v = json!({
            "type": "Element",
            "name": "a",
            "children": [
                {"type": "Text", "content": "x"},
                {"type": "Mystery"},
                {"type": "Text", "content": "y"},
            ]
        });
        assert_eq!(serialize_value(&v), "<a>xy</a>");
    }

    #[test]
    fn test_nameless_element_renders_children_inline() {
        let v = json!({
            "type": "Element",
            "children": [{"type": "Text", "content": "inner"}]
        });
        assert_eq!(serialize_value(&v), "inner");
    }

    #[test]
    fn test_nameless_attribute_dropped() {
        let v = json!({
            "type": "Element",
            "name": "a",
            "attributes": [
                {"value": "ignored"},
                {"name": "k", "value": "v"},
            ]
        });
        assert_eq!(serialize_value(&v), "<a k=\"v\"/>");
    }

    #[test]
    fn test_empty_prefix_is_no_prefix() {
        let v = json!({"type": "Element", "name": "a", "prefix": ""});
        assert_eq!(serialize_value(&v), "<a/>");
        let v = json!({"type": "Element", "name": "a", "prefix": "D"});
        assert_eq!(serialize_value(&v), "<D:a/>");
    }

    #[test]
    fn test_missing_scalars_default_to_empty() {
        let v = json!({"type": "Text"});
        assert_eq!(serialize_value(&v), "");
        let v = json!({"type": "Text", "content": 7});
        assert_eq!(serialize_value(&v), "");
        let v = json!({"type": "Comment"});
        assert_eq!(serialize_value(&v), "<!---->");
        let v = json!({"type": "ProcessingInstruction", "target": "t"});
        assert_eq!(serialize_value(&v), "<?t?>");
    }

    #[test]
    fn test_xml_declaration_version_defaults() {
        let v = json!({"type": "XmlDeclaration"});
        assert_eq!(serialize_value(&v), "<?xml version=\"1.0\"?>");
        let v = json!({"type": "XmlDeclaration", "version": "1.1", "standalone": false});
        assert_eq!(
            serialize_value(&v),
            "<?xml version=\"1.1\" standalone=\"no\"?>"
        );
    }

    #[test]
    fn test_doctype_from_value() {
        let v = json!({"type": "DocumentType", "name": "r", "system_id": "r.dtd"});
        assert_eq!(serialize_value(&v), "<!DOCTYPE r SYSTEM \"r.dtd\">");
    }

    #[test]
    fn test_document_from_value_missing_children() {
        let doc = document_from_value(&json!({}));
        assert!(doc.children.is_empty());
        assert!(doc.root_element().is_none());
    }

    #[test]
    fn test_loose_output_reparses() {
        // Output of the loose serializer is always parseable once wrapped
        // in a root element.
        let v = json!({
            "type": "Element",
            "name": "a",
            "children": [
                {"type": "Text", "content": "1 < 2 & 3"},
                {"type": "CData", "content": "raw ]]> raw"},
            ]
        });
        let xml = serialize_value(&v);
        let doc = crate::parse(&xml).unwrap();
        let a = doc.root_element().unwrap();
        assert_eq!(a.text(), "1 < 2 & 3raw ]]> raw");
    }

    #[test]
    fn test_matches_serde_representation() {
        // The loose converter accepts exactly what serde produces for a
        // strict node, so persisted trees round-trip through it.
        let node = Node::Element(Element {
            name: "response".to_string(),
            prefix: Some("D".to_string()),
            namespace: Some("DAV:".to_string()),
            attributes: vec![],
            children: vec![Node::Text {
                content: "body".to_string(),
            }],
        });
        let value = serde_json::to_value(&node).unwrap();
        let back = node_from_value(&value).unwrap();
        assert_eq!(node, back);
    }
}
