//! Tolerant XML parser.
//!
//! A hand-rolled recursive descent parser over a fully in-memory input
//! string. The parser is hand-rolled (not combinator-based) because the
//! tolerance rules require fine-grained control over parse state: nearly
//! every malformed construct has a defined recovery that produces a
//! best-effort tree instead of an error.
//!
//! The only fatal conditions are a non-empty input in which no root element
//! can be located, and nesting-depth exhaustion. Everything else — BOM,
//! unknown entities, undeclared prefixes, mismatched or missing closing
//! tags, unterminated comments/CDATA/PIs, garbage inside tags — is
//! recovered and recorded as a diagnostic on the resulting document.
//!
//! Parsing is a pure function: no I/O, no shared mutable state, and a
//! namespace scope chain local to each call, so concurrent parses on
//! independent inputs are safe.

pub(crate) mod input;
mod xml;

pub use input::{XML_NAMESPACE, XMLNS_NAMESPACE};

use crate::error::ParseError;
use crate::tree::Document;

/// Parses an XML string into a [`Document`].
///
/// # Errors
///
/// Returns [`ParseError`] only when the input is non-empty but contains no
/// root element, or when element nesting exceeds the depth bound. All other
/// malformed input parses to a best-effort tree with diagnostics attached.
///
/// # Examples
///
/// ```
/// let doc = davxml::parse("<D:prop xmlns:D=\"DAV:\"><D:getetag/></D:prop>").unwrap();
/// let prop = doc.root_element().unwrap();
/// assert!(prop.child(Some("DAV:"), "getetag").is_some());
/// ```
pub fn parse(input: &str) -> Result<Document, ParseError> {
    xml::XmlParser::new(input).parse()
}

/// Parses XML from raw bytes, detecting the encoding automatically.
///
/// Sniffs a byte-order mark (UTF-8, UTF-16BE, UTF-16LE), transcodes to
/// UTF-8, and parses. Undecodable byte sequences are replaced rather than
/// rejected, in keeping with the crate's tolerance contract.
///
/// # Errors
///
/// Same conditions as [`parse`].
///
/// # Examples
///
/// ```
/// let doc = davxml::parse_bytes(b"<r>body</r>").unwrap();
/// assert_eq!(doc.root_element().unwrap().text(), "body");
/// ```
pub fn parse_bytes(input: &[u8]) -> Result<Document, ParseError> {
    let text = crate::encoding::decode_to_utf8(input);
    parse(&text)
}
