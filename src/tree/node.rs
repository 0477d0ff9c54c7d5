//! Node type definitions.
//!
//! The [`Node`] enum represents all node types in an XML document tree. Each
//! variant carries its node-type-specific payload (element name and
//! attributes, text content, and so on). Trees are plain owned values:
//! children live inside their parent, there are no back-references, and no
//! node is shared between two documents.
//!
//! All types are serde-serializable so a parsed tree can be persisted to and
//! reconstructed from any structured-data format. Deserialization defaults
//! missing collections and optional fields, so trees written by older
//! producers still load.

use serde::{Deserialize, Serialize};

/// The kind of an XML node and its associated data.
///
/// The document node itself is not a variant — it is the [`Document`]
/// container, which owns the top-level sequence of these.
///
/// [`Document`]: super::Document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// An element node, e.g., `<D:prop>`.
    Element(Element),

    /// A text node containing character data. Entity and character
    /// references are already decoded.
    Text {
        /// The decoded text content.
        #[serde(default)]
        content: String,
    },

    /// A CDATA section, e.g., `<![CDATA[...]]>`. The content is the raw
    /// value between the markers — no escaping applied, none needed.
    CData {
        /// The verbatim CDATA content.
        #[serde(default)]
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`. Content is verbatim.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        #[serde(default)]
        content: String,
    },

    /// A processing instruction, e.g., `<?xml-stylesheet href="a.css"?>`.
    ProcessingInstruction(Pi),

    /// The XML declaration, e.g., `<?xml version="1.0"?>`. At most one per
    /// document, and only ever the document's first child.
    XmlDeclaration(XmlDeclaration),

    /// A document type declaration, e.g., `<!DOCTYPE html>`. At most one
    /// per document.
    DocumentType(DocumentType),
}

/// An element node.
///
/// The namespace URI is resolved eagerly while the element is constructed
/// and never recomputed afterwards; a tree never contains unresolved
/// prefixes. `xmlns`/`xmlns:*` declarations stay in [`attributes`] as
/// ordinary attributes.
///
/// [`attributes`]: Element::attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// The element's local name (the part after any `prefix:`).
    #[serde(default)]
    pub name: String,
    /// Namespace prefix (e.g., `"D"` in `D:prop`), if any.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Resolved namespace URI, if any.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Attributes in document order, namespace declarations included.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// An XML attribute, carried inside its owning [`Element`].
///
/// Unprefixed attributes always have a `None` namespace — they never
/// inherit the element's default namespace. `xml:*` attributes carry the
/// fixed XML namespace URI, `xmlns`/`xmlns:*` the fixed XMLNS URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute's local name.
    #[serde(default)]
    pub name: String,
    /// Namespace prefix, if any.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Resolved namespace URI, if any.
    #[serde(default)]
    pub namespace: Option<String>,
    /// The decoded attribute value (entity references resolved).
    #[serde(default)]
    pub value: String,
}

/// A processing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pi {
    /// The PI target (e.g., `"xml-stylesheet"`).
    #[serde(default)]
    pub target: String,
    /// The PI data. Empty when the instruction has none. Trailing
    /// whitespace is trimmed at parse time so the value round-trips.
    #[serde(default)]
    pub data: String,
}

/// The XML declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlDeclaration {
    /// XML version (e.g., `"1.0"`).
    #[serde(default)]
    pub version: String,
    /// Declared encoding, if any.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Standalone flag, if declared.
    #[serde(default)]
    pub standalone: Option<bool>,
}

/// A document type declaration.
///
/// The internal subset, when present, is captured verbatim between its
/// brackets and never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentType {
    /// The root element name declared in the DOCTYPE.
    #[serde(default)]
    pub name: String,
    /// The PUBLIC identifier, if any.
    #[serde(default)]
    pub public_id: Option<String>,
    /// The SYSTEM identifier (URI), if any.
    #[serde(default)]
    pub system_id: Option<String>,
    /// The raw internal subset (between `[` and `]`), if any.
    #[serde(default)]
    pub internal_subset: Option<String>,
}

impl Node {
    /// Returns the contained element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Returns the text content of a text, CDATA, or comment node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text { content } | Node::CData { content } | Node::Comment { content } => {
                Some(content)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_as_element() {
        let el = Node::Element(Element {
            name: "prop".to_string(),
            prefix: None,
            namespace: None,
            attributes: vec![],
            children: vec![],
        });
        assert_eq!(el.as_element().map(|e| e.name.as_str()), Some("prop"));

        let text = Node::Text {
            content: "hi".to_string(),
        };
        assert!(text.as_element().is_none());
    }

    #[test]
    fn test_as_text() {
        let text = Node::Text {
            content: "hi".to_string(),
        };
        assert_eq!(text.as_text(), Some("hi"));

        let cdata = Node::CData {
            content: "raw".to_string(),
        };
        assert_eq!(cdata.as_text(), Some("raw"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let el = Node::Element(Element {
            name: "response".to_string(),
            prefix: Some("D".to_string()),
            namespace: Some("DAV:".to_string()),
            attributes: vec![Attribute {
                name: "depth".to_string(),
                prefix: None,
                namespace: None,
                value: "0".to_string(),
            }],
            children: vec![Node::Text {
                content: "body".to_string(),
            }],
        });
        let json = serde_json::to_string(&el).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(el, back);
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        // A minimal persisted element with most fields absent still loads.
        let back: Node = serde_json::from_str(r#"{"type":"Element","name":"a"}"#).unwrap();
        match back {
            Node::Element(el) => {
                assert_eq!(el.name, "a");
                assert!(el.attributes.is_empty());
                assert!(el.children.is_empty());
                assert!(el.namespace.is_none());
            }
            other => panic!("expected element, got {other:?}"),
        }
    }
}
