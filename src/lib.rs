//! # davxml
//!
//! A tolerant XML reader/writer for document-oriented protocol payloads —
//! the small, frequently non-conformant bodies exchanged by
//! WebDAV/CalDAV/CardDAV-style clients and servers, where throwing on minor
//! spec violations is unacceptable.
//!
//! The parser recovers from malformed input wherever a sane interpretation
//! exists and records every recovery as a diagnostic on the document. The
//! serializer's output is always re-parseable, and parse → serialize →
//! parse is lossless at the tree level. The engine is namespace-URI/
//! local-name aware but never schema-aware.
//!
//! ## Quick Start
//!
//! ```
//! let doc = davxml::parse(
//!     "<D:multistatus xmlns:D=\"DAV:\"><D:response><D:href>/cal</D:href></D:response></D:multistatus>",
//! )
//! .unwrap();
//!
//! let root = doc.root_element().unwrap();
//! assert_eq!(root.namespace.as_deref(), Some("DAV:"));
//! let response = root.child(Some("DAV:"), "response").unwrap();
//! assert_eq!(response.required_child(Some("DAV:"), "href").unwrap().text(), "/cal");
//!
//! assert_eq!(davxml::parse(&davxml::serialize(&doc)).unwrap().children, doc.children);
//! ```

pub mod encoding;
pub mod error;
pub mod parser;
pub mod serial;
pub mod tree;

// Re-export the primary types and entry points at the crate root.
pub use error::{ParseDiagnostic, ParseError, QueryError};
pub use parser::{parse, parse_bytes};
pub use serial::{serialize, serialize_node, serialize_value};
pub use tree::{Attribute, Document, Element, Node};
