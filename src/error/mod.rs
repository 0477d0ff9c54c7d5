//! Error types and diagnostics.
//!
//! Parsing is tolerant by design: nearly every malformed construct is
//! recovered from and recorded as a [`ParseDiagnostic`] on the resulting
//! document. A [`ParseError`] is raised only for the handful of truly
//! structural failures (no root element in non-empty input, nesting depth
//! exhausted). Errors carry line, column, and byte offset information for
//! precise reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level for a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// A recovered deviation that did not change the shape of the tree
    /// (e.g., an unknown entity preserved verbatim).
    Warning,
    /// A recovered error — the parser continued, but the input was
    /// malformed and the tree reflects a best-effort interpretation.
    Error,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location within an XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single diagnostic recorded during parsing.
///
/// Diagnostics are the crate's recovery log: every tolerated deviation from
/// well-formed XML appends one of these to [`Document::diagnostics`] instead
/// of failing the parse.
///
/// [`Document::diagnostics`]: crate::tree::Document::diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    /// The severity of this diagnostic.
    pub severity: ErrorSeverity,
    /// Human-readable message.
    pub message: String,
    /// Where in the source the recovery happened.
    pub location: SourceLocation,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.location)
    }
}

/// The error type returned when no document could be parsed at all.
///
/// Callers should expect [`parse`](crate::parse) to succeed for nearly all
/// real-world input; this error indicates the engine could not locate a root
/// element in non-empty input (or ran out of nesting depth).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The primary error message.
    pub message: String,
    /// Where in the source the failure was detected.
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.location, self.message)
    }
}

impl std::error::Error for ParseError {}

/// The error returned by the `required_*` tree-query helpers.
///
/// Names the missing child, its namespace, and the parent element it was
/// expected under.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    /// Local name of the missing child element.
    pub child: String,
    /// Namespace URI the child was expected in, if any.
    pub namespace: Option<String>,
    /// Local name of the parent element that was searched.
    pub parent: String,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(
                f,
                "required child '{{{}}}{}' not found under '{}'",
                ns, self.child, self.parent
            ),
            None => write!(
                f,
                "required child '{}' not found under '{}'",
                self.child, self.parent
            ),
        }
    }
}

impl std::error::Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation {
            line: 10,
            column: 5,
            byte_offset: 42,
        };
        assert_eq!(loc.to_string(), "10:5");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            message: "no root element found".to_string(),
            location: SourceLocation {
                line: 1,
                column: 15,
                byte_offset: 14,
            },
        };
        assert_eq!(err.to_string(), "parse error at 1:15: no root element found");
    }

    #[test]
    fn test_parse_diagnostic_display() {
        let diag = ParseDiagnostic {
            severity: ErrorSeverity::Warning,
            message: "unknown entity reference preserved".to_string(),
            location: SourceLocation {
                line: 3,
                column: 10,
                byte_offset: 50,
            },
        };
        assert_eq!(
            diag.to_string(),
            "warning: unknown entity reference preserved at 3:10"
        );
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError {
            child: "href".to_string(),
            namespace: Some("DAV:".to_string()),
            parent: "response".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required child '{DAV:}href' not found under 'response'"
        );

        let err = QueryError {
            child: "status".to_string(),
            namespace: None,
            parent: "propstat".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required child 'status' not found under 'propstat'"
        );
    }

    #[test]
    fn test_parse_error_is_error_trait() {
        let err = ParseError {
            message: "test".to_string(),
            location: SourceLocation::default(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
