//! XML serialization.
//!
//! Serializes a tree back to XML text. The strict layer in [`xml`] consumes
//! the crate's node types and never fails; the loose layer in [`value`]
//! accepts untrusted `serde_json::Value` trees and degrades malformed input
//! to a best-effort (possibly empty) string through a one-time conversion
//! into the strict node type.

pub mod value;
pub mod xml;

pub use value::{document_from_value, node_from_value, serialize_value};
pub use xml::{serialize, serialize_node};
