//! The XML document tree.
//!
//! A [`Document`] owns its whole subtree as a plain value: children are
//! stored inline, there are no parent back-references, and no two live
//! trees share nodes. Each parse produces a fully independent tree, handed
//! to the caller atomically; nodes are never mutated after construction —
//! any transformation builds a new tree.
//!
//! The navigation helpers here consume the data model read-only and follow
//! a tolerance contract: an absent root is "not found" rather than an
//! error, empty child/attribute sequences behave like any other, and only
//! the explicit `required_*` variants report a missing result as an error.

mod node;

pub use node::{Attribute, DocumentType, Element, Node, Pi, XmlDeclaration};

use serde::{Deserialize, Serialize};

use crate::error::{ParseDiagnostic, QueryError};

/// An XML document: the root container of a parsed tree.
///
/// Holds the ordered sequence of top-level children — at most one
/// [`XmlDeclaration`] (always first if present), at most one
/// [`DocumentType`], exactly one root [`Element`] for trees produced by the
/// parser, plus any comments and processing instructions.
///
/// # Examples
///
/// ```
/// let doc = davxml::parse("<D:multistatus xmlns:D=\"DAV:\"/>").unwrap();
/// let root = doc.root_element().unwrap();
/// assert_eq!(root.name, "multistatus");
/// assert_eq!(root.namespace.as_deref(), Some("DAV:"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level nodes in document order.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Diagnostics recorded while parsing (every tolerated recovery).
    /// Empty for documents built by hand. Not part of the tree: round-trip
    /// equality is defined over `children`.
    #[serde(default)]
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Document {
    /// Returns the root element of the document, or `None` if the document
    /// has no element child.
    #[must_use]
    pub fn root_element(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    /// Returns the XML declaration, if the document carries one.
    #[must_use]
    pub fn xml_declaration(&self) -> Option<&XmlDeclaration> {
        self.children.iter().find_map(|n| match n {
            Node::XmlDeclaration(decl) => Some(decl),
            _ => None,
        })
    }

    /// Returns the document type declaration, if present.
    #[must_use]
    pub fn doctype(&self) -> Option<&DocumentType> {
        self.children.iter().find_map(|n| match n {
            Node::DocumentType(dt) => Some(dt),
            _ => None,
        })
    }
}

impl Element {
    /// Returns an iterator over this element's child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Returns the first child element with the given namespace URI and
    /// local name, or `None`.
    ///
    /// `namespace: None` matches children with no namespace.
    #[must_use]
    pub fn child(&self, namespace: Option<&str>, name: &str) -> Option<&Element> {
        self.child_elements()
            .find(|el| el.name == name && el.namespace.as_deref() == namespace)
    }

    /// Returns all child elements with the given namespace URI and local
    /// name, in document order.
    pub fn children_named<'a>(
        &'a self,
        namespace: Option<&'a str>,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.child_elements()
            .filter(move |el| el.name == name && el.namespace.as_deref() == namespace)
    }

    /// Searches the subtree depth-first for the first element with the
    /// given namespace URI and local name. The element itself is not a
    /// candidate.
    #[must_use]
    pub fn descendant(&self, namespace: Option<&str>, name: &str) -> Option<&Element> {
        for el in self.child_elements() {
            if el.name == name && el.namespace.as_deref() == namespace {
                return Some(el);
            }
            if let Some(found) = el.descendant(namespace, name) {
                return Some(found);
            }
        }
        None
    }

    /// Like [`child`](Element::child), but a missing result is an error
    /// naming the missing child, its namespace, and this element.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when no matching child element exists.
    pub fn required_child(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<&Element, QueryError> {
        self.child(namespace, name).ok_or_else(|| QueryError {
            child: name.to_string(),
            namespace: namespace.map(String::from),
            parent: self.name.clone(),
        })
    }

    /// Returns the concatenated text content of the subtree: every text and
    /// CDATA node, in document order. Comments and processing instructions
    /// contribute nothing.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Returns the value of the first attribute with the given namespace
    /// URI and local name.
    #[must_use]
    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.as_deref() == namespace)
            .map(|a| a.value.as_str())
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text { content } | Node::CData { content } => out.push_str(content),
            Node::Element(el) => collect_text(&el.children, out),
            _ => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn elem(name: &str, namespace: Option<&str>, children: Vec<Node>) -> Element {
        Element {
            name: name.to_string(),
            prefix: None,
            namespace: namespace.map(String::from),
            attributes: vec![],
            children,
        }
    }

    #[test]
    fn test_root_element() {
        let doc = Document {
            children: vec![
                Node::Comment {
                    content: " prolog ".to_string(),
                },
                Node::Element(elem("root", None, vec![])),
            ],
            diagnostics: vec![],
        };
        assert_eq!(doc.root_element().map(|e| e.name.as_str()), Some("root"));
    }

    #[test]
    fn test_root_element_absent() {
        let doc = Document::default();
        assert!(doc.root_element().is_none());
    }

    #[test]
    fn test_child_lookup_by_namespace_and_name() {
        let root = elem(
            "multistatus",
            Some("DAV:"),
            vec![
                Node::Element(elem("response", Some("DAV:"), vec![])),
                Node::Element(elem("response", Some("urn:other"), vec![])),
            ],
        );
        assert!(root.child(Some("DAV:"), "response").is_some());
        assert!(root.child(None, "response").is_none());
        assert_eq!(root.children_named(Some("DAV:"), "response").count(), 1);
    }

    #[test]
    fn test_descendant_depth_first() {
        let root = elem(
            "a",
            None,
            vec![Node::Element(elem(
                "b",
                None,
                vec![Node::Element(elem("target", Some("urn:x"), vec![]))],
            ))],
        );
        let found = root.descendant(Some("urn:x"), "target");
        assert!(found.is_some());
        assert!(root.descendant(Some("urn:x"), "absent").is_none());
    }

    #[test]
    fn test_required_child_error_names_parts() {
        let root = elem("propstat", Some("DAV:"), vec![]);
        let err = root.required_child(Some("DAV:"), "status").unwrap_err();
        assert_eq!(err.child, "status");
        assert_eq!(err.namespace.as_deref(), Some("DAV:"));
        assert_eq!(err.parent, "propstat");
    }

    #[test]
    fn test_text_concatenates_text_and_cdata() {
        let root = elem(
            "p",
            None,
            vec![
                Node::Text {
                    content: "hello ".to_string(),
                },
                Node::Element(elem(
                    "b",
                    None,
                    vec![Node::CData {
                        content: "wor".to_string(),
                    }],
                )),
                Node::Text {
                    content: "ld".to_string(),
                },
                Node::Comment {
                    content: "ignored".to_string(),
                },
            ],
        );
        assert_eq!(root.text(), "hello world");
    }

    #[test]
    fn test_attribute_lookup() {
        let root = Element {
            name: "a".to_string(),
            prefix: None,
            namespace: None,
            attributes: vec![
                Attribute {
                    name: "k".to_string(),
                    prefix: None,
                    namespace: None,
                    value: "v".to_string(),
                },
                Attribute {
                    name: "lang".to_string(),
                    prefix: Some("xml".to_string()),
                    namespace: Some(crate::parser::XML_NAMESPACE.to_string()),
                    value: "en".to_string(),
                },
            ],
            children: vec![],
        };
        assert_eq!(root.attribute(None, "k"), Some("v"));
        assert_eq!(
            root.attribute(Some(crate::parser::XML_NAMESPACE), "lang"),
            Some("en")
        );
        assert_eq!(root.attribute(None, "lang"), None);
    }
}
