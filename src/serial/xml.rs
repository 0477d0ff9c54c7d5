//! XML serializer.
//!
//! Serializes a tree into an XML string that is always re-parseable by this
//! crate's parser. Serialization is a pure function of the tree and never
//! fails; exhaustive matching over the node sum type covers every kind.
//!
//! Escaping contract: text content escapes `&`, `<`, `>`; attribute values
//! (always double-quoted on output) escape `&`, `<`, `"`. No other
//! characters are escaped. Elements with no children always serialize in
//! self-closing form — a normalization, not a preservation of the source.

use crate::tree::{Document, DocumentType, Element, Node, Pi, XmlDeclaration};

/// Serializes a document to an XML string.
///
/// # Examples
///
/// ```
/// let doc = davxml::parse("<r><child>Hello &amp; bye</child></r>").unwrap();
/// assert_eq!(davxml::serialize(&doc), "<r><child>Hello &amp; bye</child></r>");
/// ```
#[must_use]
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    for child in &doc.children {
        write_node(child, &mut out);
    }
    out
}

/// Serializes a single node (and its subtree) to an XML string.
#[must_use]
pub fn serialize_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text { content } => write_escaped_text(content, out),
        Node::CData { content } => write_cdata(content, out),
        Node::Comment { content } => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(pi) => write_pi(pi, out),
        Node::XmlDeclaration(decl) => write_xml_declaration(decl, out),
        Node::DocumentType(doctype) => write_doctype(doctype, out),
    }
}

fn write_element(el: &Element, out: &mut String) {
    // A nameless element renders only its children, inline.
    if el.name.is_empty() {
        for child in &el.children {
            write_node(child, out);
        }
        return;
    }

    out.push('<');
    write_qname(el.prefix.as_deref(), &el.name, out);
    for attr in &el.attributes {
        // A nameless attribute is dropped.
        if attr.name.is_empty() {
            continue;
        }
        out.push(' ');
        write_qname(attr.prefix.as_deref(), &attr.name, out);
        out.push_str("=\"");
        write_escaped_attr(&attr.value, out);
        out.push('"');
    }

    if el.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        for child in &el.children {
            write_node(child, out);
        }
        out.push_str("</");
        write_qname(el.prefix.as_deref(), &el.name, out);
        out.push('>');
    }
}

/// Writes `prefix:name`, treating a missing or empty prefix as "no prefix".
fn write_qname(prefix: Option<&str>, name: &str, out: &mut String) {
    if let Some(pfx) = prefix {
        if !pfx.is_empty() {
            out.push_str(pfx);
            out.push(':');
        }
    }
    out.push_str(name);
}

fn write_pi(pi: &Pi, out: &mut String) {
    out.push_str("<?");
    out.push_str(&pi.target);
    if !pi.data.is_empty() {
        out.push(' ');
        out.push_str(&pi.data);
    }
    out.push_str("?>");
}

fn write_xml_declaration(decl: &XmlDeclaration, out: &mut String) {
    out.push_str("<?xml version=\"");
    if decl.version.is_empty() {
        out.push_str("1.0");
    } else {
        out.push_str(&decl.version);
    }
    out.push('"');
    if let Some(encoding) = &decl.encoding {
        out.push_str(" encoding=\"");
        out.push_str(encoding);
        out.push('"');
    }
    if let Some(standalone) = decl.standalone {
        out.push_str(" standalone=\"");
        out.push_str(if standalone { "yes" } else { "no" });
        out.push('"');
    }
    out.push_str("?>");
}

fn write_doctype(doctype: &DocumentType, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(&doctype.name);
    if let Some(public_id) = &doctype.public_id {
        out.push_str(" PUBLIC \"");
        out.push_str(public_id);
        out.push_str("\" \"");
        out.push_str(doctype.system_id.as_deref().unwrap_or(""));
        out.push('"');
    } else if let Some(system_id) = &doctype.system_id {
        out.push_str(" SYSTEM \"");
        out.push_str(system_id);
        out.push('"');
    }
    if let Some(subset) = &doctype.internal_subset {
        out.push_str(" [");
        out.push_str(subset);
        out.push(']');
    }
    out.push('>');
}

/// Writes a CDATA value, splitting at each `]]>` so that no emitted section
/// contains the terminator internally. Each occurrence is broken after its
/// first `]`: the current section closes, and the next reopens with `]>`
/// plus the remainder. Concatenating the text content of the sections after
/// re-parsing reproduces the original value exactly.
fn write_cdata(value: &str, out: &mut String) {
    let mut rest = value;
    loop {
        match rest.find("]]>") {
            Some(pos) => {
                out.push_str("<![CDATA[");
                out.push_str(&rest[..=pos]);
                out.push_str("]]>");
                rest = &rest[pos + 1..];
            }
            None => {
                out.push_str("<![CDATA[");
                out.push_str(rest);
                out.push_str("]]>");
                break;
            }
        }
    }
}

/// Escapes text content: `&`, `<`, `>`.
fn write_escaped_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Escapes attribute values: `&`, `<`, `"`.
fn write_escaped_attr(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
