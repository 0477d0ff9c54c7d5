//! Low-level input handling for the XML parser.
//!
//! [`ParserInput`] encapsulates the raw byte stream, position tracking
//! (line, column, byte offset), and the common parsing primitives: peeking,
//! advancing, name lexing, reference decoding, and the content scanners for
//! comments, CDATA sections, and processing instructions. All recovery
//! diagnostics accumulate here.
//!
//! The module also hosts the XML Name character classifier and the
//! namespace scope chain. Scopes are explicit per-frame values threaded
//! through the recursive element parser rather than a shared mutable stack,
//! so each parse call is self-contained and unwinds with the call stack.

use crate::error::{ErrorSeverity, ParseDiagnostic, ParseError, SourceLocation};

/// Maximum element nesting depth. Exceeding it is one of the two
/// unrecoverable structural failures (stack exhaustion guard).
pub(crate) const MAX_DEPTH: u32 = 256;

/// The well-known XML namespace URI, permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The well-known xmlns namespace URI, permanently bound to the `xmlns`
/// prefix and carried by every namespace-declaration attribute.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

// -------------------------------------------------------------------------
// XML Name character classes (XML 1.0 §2.3)
// -------------------------------------------------------------------------

/// Returns `true` if `c` is XML whitespace (space, tab, CR, LF).
pub(crate) fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Returns `true` if `c` is a valid `NameStartChar` per XML 1.0 §2.3 `[4]`.
///
/// `:` and `_` are start characters, so a qualified name lexes as a single
/// token and is split on its first colon afterwards.
pub(crate) fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` is a valid `NameChar` per XML 1.0 §2.3 [4a].
pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Splits a qualified name into optional prefix and local part on the
/// first colon.
///
/// `"D:prop"` → `(Some("D"), "prop")`, `"prop"` → `(None, "prop")`.
pub(crate) fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.find(':') {
        Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
        None => (None, name),
    }
}

/// Like [`split_name`], but consumes the owned `String`. Unprefixed names
/// (the common case) are moved through without reallocation.
pub(crate) fn split_owned_name(name: String) -> (Option<String>, String) {
    match name.find(':') {
        Some(pos) => (
            Some(name[..pos].to_string()),
            name[pos + 1..].to_string(),
        ),
        None => (None, name),
    }
}

// -------------------------------------------------------------------------
// ParserInput
// -------------------------------------------------------------------------

/// A snapshot of the input position (byte offset, line, column), restored
/// when a speculative parse is abandoned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SavedPosition {
    pos: usize,
    line: u32,
    column: u32,
}

/// Low-level input state for the parser.
///
/// Tracks the byte stream, position (line/column/offset), nesting depth,
/// and accumulated recovery diagnostics.
pub(crate) struct ParserInput<'a> {
    /// The input bytes (valid UTF-8, borrowed from the caller's `&str`).
    input: &'a [u8],
    /// Current byte offset in `input`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// Current element nesting depth.
    depth: u32,
    /// Accumulated recovery diagnostics.
    pub(crate) diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> ParserInput<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    // -- Position queries --

    /// Returns the current source location.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    /// Returns `true` if all input has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the input text between two byte offsets.
    pub fn slice_str(&self, start: usize, end: usize) -> &'a str {
        std::str::from_utf8(&self.input[start..end]).unwrap_or("")
    }

    // -- Peek operations --

    /// Returns the byte at the current position without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Returns the byte at `current_position + offset` without consuming.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Returns the character at the current position without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.peek_char_at(0)
    }

    /// Returns the character starting at `current_position + offset`.
    /// The offset must land on a character boundary.
    pub fn peek_char_at(&self, offset: usize) -> Option<char> {
        let remaining = self.input.get(self.pos + offset..)?;
        std::str::from_utf8(remaining)
            .ok()
            .and_then(|s| s.chars().next())
    }

    // -- Advance operations --

    /// Advances the position by `count` bytes, updating line/column.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            if self.pos < self.input.len() {
                if self.input[self.pos] == b'\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
                self.pos += 1;
            }
        }
    }

    /// Advances past one already-peeked character, updating line/column.
    pub fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += ch.len_utf8();
    }

    /// Consumes and returns the next character, if any.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.advance_char(ch);
        Some(ch)
    }

    // -- Lookahead --

    /// Returns `true` if the remaining input starts with `s`.
    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    /// Case-insensitive (ASCII) variant of [`looking_at`](Self::looking_at).
    pub fn looking_at_ci(&self, expected: &[u8]) -> bool {
        self.input
            .get(self.pos..self.pos + expected.len())
            .is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
    }

    /// Finds the byte offset (relative to the current position) of the next
    /// occurrence of `pattern` in the remaining input.
    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        self.input[self.pos..]
            .windows(pattern.len())
            .position(|w| w == pattern)
    }

    // -- Whitespace --

    /// Skips XML whitespace. Returns `true` if any was consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.advance(1);
        }
        self.pos > start
    }

    /// Skips forward until the next occurrence of `byte` (not consumed) or
    /// end of input. Used for recovery after abandoned constructs.
    pub fn skip_until(&mut self, byte: u8) {
        while let Some(b) = self.peek() {
            if b == byte {
                break;
            }
            self.advance(1);
        }
    }

    // -- Position checkpointing --

    /// Saves the current position so an abandoned speculative parse can
    /// rewind before skipping forward.
    pub fn save_position(&self) -> SavedPosition {
        SavedPosition {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Restores a previously saved position. Diagnostics recorded since the
    /// save are kept.
    pub fn restore_position(&mut self, saved: SavedPosition) {
        self.pos = saved.pos;
        self.line = saved.line;
        self.column = saved.column;
    }

    // -- Name lexing (XML 1.0 §2.3) --

    /// Lexes an XML `Name`: a `NameStartChar` followed by `NameChar`s.
    /// Returns an empty string when the current character is not a name
    /// start — the tolerant caller decides what to do with that.
    pub fn take_name(&mut self) -> String {
        let start = self.pos;
        if let Some(first) = self.peek_char() {
            if is_name_start_char(first) {
                self.advance_char(first);
                while let Some(ch) = self.peek_char() {
                    if is_name_char(ch) {
                        self.advance_char(ch);
                    } else {
                        break;
                    }
                }
            }
        }
        self.slice_str(start, self.pos).to_string()
    }

    // -- Depth tracking --

    /// Increments the nesting depth. Errors when the limit is exceeded —
    /// a truly unrecoverable structural failure.
    pub fn increment_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.fatal(format!("maximum nesting depth exceeded ({MAX_DEPTH})")));
        }
        Ok(())
    }

    /// Decrements the nesting depth (saturating at 0).
    pub fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -- Reference decoding (XML 1.0 §4.1, tolerant) --

    /// Decodes an entity or character reference at the current `&` into
    /// `out`.
    ///
    /// The five predefined entities decode to their characters; a missing
    /// terminating `;` is tolerated. An unrecognized named entity is
    /// preserved verbatim, delimiters included. A bare `&` with no
    /// following name becomes a literal `&`. Numeric references that are
    /// absent, zero, surrogates, or beyond U+10FFFF decode to U+FFFD.
    pub fn decode_reference_into(&mut self, out: &mut String) {
        self.advance(1); // '&'

        if self.peek() == Some(b'#') {
            self.advance(1);
            let hex = self.peek() == Some(b'x');
            if hex {
                self.advance(1);
            }
            let start = self.pos;
            while let Some(b) = self.peek() {
                let is_digit = if hex {
                    b.is_ascii_hexdigit()
                } else {
                    b.is_ascii_digit()
                };
                if is_digit {
                    self.advance(1);
                } else {
                    break;
                }
            }
            let digits = self.slice_str(start, self.pos).to_string();
            if self.peek() == Some(b';') {
                self.advance(1);
            }
            let radix = if hex { 16 } else { 10 };
            let decoded = u32::from_str_radix(&digits, radix)
                .ok()
                .filter(|&code| code != 0)
                .and_then(char::from_u32);
            match decoded {
                Some(ch) => out.push(ch),
                None => {
                    self.push_diagnostic(
                        ErrorSeverity::Warning,
                        format!("invalid character reference '&#{digits};' replaced with U+FFFD"),
                    );
                    out.push('\u{FFFD}');
                }
            }
            return;
        }

        let name = self.take_name();
        if name.is_empty() {
            // Bare '&' — literal ampersand.
            out.push('&');
            return;
        }
        let terminated = self.peek() == Some(b';');

        match name.as_str() {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "apos" => out.push('\''),
            "quot" => out.push('"'),
            _ => {
                // Unknown entity: keep it verbatim, delimiters included.
                self.push_diagnostic(
                    ErrorSeverity::Warning,
                    format!("unknown entity reference '&{name};' preserved"),
                );
                out.push('&');
                out.push_str(&name);
                if terminated {
                    self.advance(1);
                    out.push(';');
                }
                return;
            }
        }

        if terminated {
            self.advance(1);
        } else {
            self.push_diagnostic(
                ErrorSeverity::Warning,
                format!("entity reference '&{name}' missing terminating ';'"),
            );
        }
    }

    // -- Attribute values (XML 1.0 §3.3.3, tolerant) --

    /// Parses a quoted attribute value whose opening quote has already been
    /// consumed. Entities decode as in text; the value stops at the
    /// matching quote. An unterminated value consumes to end of input.
    pub fn parse_quoted_attr_value(&mut self, quote: u8) -> String {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    self.push_diagnostic(
                        ErrorSeverity::Error,
                        "unterminated attribute value".to_string(),
                    );
                    break;
                }
                Some(b) if b == quote => {
                    self.advance(1);
                    break;
                }
                Some(b'&') => self.decode_reference_into(&mut value),
                Some(_) => {
                    if let Some(ch) = self.next_char() {
                        value.push(ch);
                    } else {
                        break;
                    }
                }
            }
        }
        value
    }

    /// Parses an unquoted ("bare") attribute value: everything up to the
    /// next whitespace or closing tag marker.
    pub fn parse_bare_attr_value(&mut self) -> String {
        let mut value = String::new();
        while let Some(b) = self.peek() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'>') {
                break;
            }
            if b == b'/' && self.peek_at(1) == Some(b'>') {
                break;
            }
            if b == b'&' {
                self.decode_reference_into(&mut value);
            } else if let Some(ch) = self.next_char() {
                value.push(ch);
            } else {
                break;
            }
        }
        value
    }

    // -- Error helpers --

    /// Creates a fatal `ParseError` at the current location.
    pub fn fatal(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.location(),
        }
    }

    /// Appends a recovery diagnostic at the current location.
    pub fn push_diagnostic(&mut self, severity: ErrorSeverity, message: String) {
        self.diagnostics.push(ParseDiagnostic {
            severity,
            message,
            location: self.location(),
        });
    }
}

// -------------------------------------------------------------------------
// Leaf content scanners
// -------------------------------------------------------------------------

/// Scans a comment body. The `<!--` opener has not been consumed yet.
/// Everything up to the first `-->` is content, verbatim — `--` inside the
/// body is permitted. An unterminated comment consumes the rest of the
/// input.
pub(crate) fn parse_comment_content(input: &mut ParserInput<'_>) -> String {
    input.advance(4); // <!--
    let start = input.pos();
    match input.find(b"-->") {
        Some(rel) => {
            let content = input.slice_str(start, start + rel).to_string();
            input.advance(rel + 3);
            content
        }
        None => {
            input.push_diagnostic(ErrorSeverity::Error, "unterminated comment".to_string());
            let content = input.slice_str(start, input.input.len()).to_string();
            input.advance(input.input.len() - start);
            content
        }
    }
}

/// Scans a CDATA section body. The `<![CDATA[` opener has not been
/// consumed yet. Everything up to the first `]]>` is content, verbatim; an
/// unterminated section consumes the rest of the input.
pub(crate) fn parse_cdata_content(input: &mut ParserInput<'_>) -> String {
    input.advance(9); // <![CDATA[
    let start = input.pos();
    match input.find(b"]]>") {
        Some(rel) => {
            let content = input.slice_str(start, start + rel).to_string();
            input.advance(rel + 3);
            content
        }
        None => {
            input.push_diagnostic(
                ErrorSeverity::Error,
                "unterminated CDATA section".to_string(),
            );
            let content = input.slice_str(start, input.input.len()).to_string();
            input.advance(input.input.len() - start);
            content
        }
    }
}

/// Scans a processing instruction. The `<?` opener has not been consumed
/// yet. Returns `(target, data)`; data is empty when absent and has its
/// trailing whitespace trimmed so it round-trips. An unterminated PI
/// consumes the rest of the input.
pub(crate) fn parse_pi_content(input: &mut ParserInput<'_>) -> (String, String) {
    input.advance(2); // <?
    let target = input.take_name();
    input.skip_whitespace();
    let start = input.pos();
    let raw = match input.find(b"?>") {
        Some(rel) => {
            let data = input.slice_str(start, start + rel).to_string();
            input.advance(rel + 2);
            data
        }
        None => {
            input.push_diagnostic(
                ErrorSeverity::Error,
                "unterminated processing instruction".to_string(),
            );
            let data = input.slice_str(start, input.input.len()).to_string();
            input.advance(input.input.len() - start);
            data
        }
    };
    let data = raw.trim_end_matches(is_xml_whitespace).to_string();
    (target, data)
}

// -------------------------------------------------------------------------
// Namespace scopes
// -------------------------------------------------------------------------

/// One frame of namespace bindings, linked to its enclosing frame.
///
/// Each element gets its own frame holding exactly the `xmlns`/`xmlns:*`
/// declarations found on it (the empty-string key is the default
/// namespace). Frames are immutable once built and are threaded by
/// reference through the recursive parse, so scope lifetime follows the
/// call stack and no shared mutable state exists between nested calls.
pub(crate) struct NamespaceScope<'a> {
    /// `(prefix, uri)` pairs declared on this element. An empty-string
    /// prefix is the default namespace; an empty-string URI is an explicit
    /// undeclaration.
    bindings: Vec<(String, String)>,
    /// The enclosing scope, if any.
    parent: Option<&'a NamespaceScope<'a>>,
}

impl<'a> NamespaceScope<'a> {
    /// The bottom scope, permanently seeded with the `xml` and `xmlns`
    /// bindings.
    pub fn root() -> NamespaceScope<'static> {
        NamespaceScope {
            bindings: vec![
                ("xml".to_string(), XML_NAMESPACE.to_string()),
                ("xmlns".to_string(), XMLNS_NAMESPACE.to_string()),
            ],
            parent: None,
        }
    }

    /// Builds the scope for an element, holding exactly `bindings` and
    /// enclosing `self`.
    pub fn nested<'p>(&'p self, bindings: Vec<(String, String)>) -> NamespaceScope<'p> {
        NamespaceScope {
            bindings,
            parent: Some(self),
        }
    }

    /// Walks scopes innermost-first for `key`. The first match wins; an
    /// empty-string URI means "explicitly undeclared" and resolves to no
    /// namespace.
    fn lookup(&self, key: &str) -> Option<&str> {
        if let Some((_, uri)) = self.bindings.iter().rev().find(|(k, _)| k == key) {
            if uri.is_empty() {
                return None;
            }
            return Some(uri.as_str());
        }
        self.parent.and_then(|p| p.lookup(key))
    }

    /// Resolves an element's namespace from its prefix. Unprefixed
    /// elements consult the default namespace. An unbound prefix tolerantly
    /// yields no namespace — never an error.
    pub fn resolve_element(&self, prefix: Option<&str>) -> Option<String> {
        match prefix {
            Some("xml") => Some(XML_NAMESPACE.to_string()),
            Some("xmlns") => Some(XMLNS_NAMESPACE.to_string()),
            Some(p) => self.lookup(p).map(String::from),
            None => self.lookup("").map(String::from),
        }
    }

    /// Resolves an attribute's namespace. Unprefixed attributes never
    /// consult the default namespace; the bare `xmlns` declaration itself
    /// carries the fixed XMLNS namespace URI.
    pub fn resolve_attribute(&self, prefix: Option<&str>, name: &str) -> Option<String> {
        match prefix {
            Some("xml") => Some(XML_NAMESPACE.to_string()),
            Some("xmlns") => Some(XMLNS_NAMESPACE.to_string()),
            Some(p) => self.lookup(p).map(String::from),
            None if name == "xmlns" => Some(XMLNS_NAMESPACE.to_string()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut input = ParserInput::new("abc");
        assert_eq!(input.peek(), Some(b'a'));
        assert_eq!(input.peek_at(1), Some(b'b'));
        input.advance(1);
        assert_eq!(input.peek(), Some(b'b'));
        input.advance(2);
        assert!(input.at_end());
    }

    #[test]
    fn test_line_column_tracking() {
        let mut input = ParserInput::new("ab\ncd");
        assert_eq!(input.location().line, 1);
        assert_eq!(input.location().column, 1);
        input.advance(2);
        assert_eq!(input.location().column, 3);
        input.advance(1);
        assert_eq!(input.location().line, 2);
        assert_eq!(input.location().column, 1);
    }

    #[test]
    fn test_take_name() {
        let mut input = ParserInput::new("D:prop rest");
        assert_eq!(input.take_name(), "D:prop");
        assert_eq!(input.peek(), Some(b' '));
    }

    #[test]
    fn test_take_name_not_a_name() {
        let mut input = ParserInput::new("1abc");
        assert_eq!(input.take_name(), "");
        assert_eq!(input.peek(), Some(b'1'));
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("D:prop"), (Some("D"), "prop"));
        assert_eq!(split_name("prop"), (None, "prop"));
        assert_eq!(split_name("a:b:c"), (Some("a"), "b:c"));
    }

    fn decode(s: &str) -> String {
        let mut input = ParserInput::new(s);
        let mut out = String::new();
        input.decode_reference_into(&mut out);
        out
    }

    #[test]
    fn test_decode_builtin_entities() {
        assert_eq!(decode("&amp;"), "&");
        assert_eq!(decode("&lt;"), "<");
        assert_eq!(decode("&gt;"), ">");
        assert_eq!(decode("&apos;"), "'");
        assert_eq!(decode("&quot;"), "\"");
    }

    #[test]
    fn test_decode_builtin_missing_semicolon() {
        assert_eq!(decode("&amp "), "&");
        assert_eq!(decode("&lt"), "<");
    }

    #[test]
    fn test_decode_char_references() {
        assert_eq!(decode("&#65;"), "A");
        assert_eq!(decode("&#x41;"), "A");
        assert_eq!(decode("&#169;"), "\u{A9}");
        assert_eq!(decode("&#xA9;"), "\u{A9}");
    }

    #[test]
    fn test_decode_char_reference_invalid() {
        // absent, zero, surrogate, out of range — all replaced
        assert_eq!(decode("&#;"), "\u{FFFD}");
        assert_eq!(decode("&#0;"), "\u{FFFD}");
        assert_eq!(decode("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode("&#x110000;"), "\u{FFFD}");
    }

    #[test]
    fn test_decode_unknown_entity_preserved() {
        assert_eq!(decode("&nbsp;"), "&nbsp;");
        assert_eq!(decode("&nbsp"), "&nbsp");
    }

    #[test]
    fn test_decode_bare_ampersand() {
        assert_eq!(decode("& x"), "&");
        assert_eq!(decode("&"), "&");
    }

    #[test]
    fn test_parse_quoted_attr_value() {
        let mut input = ParserInput::new("hello &amp; world\" rest");
        let value = input.parse_quoted_attr_value(b'"');
        assert_eq!(value, "hello & world");
        assert_eq!(input.peek(), Some(b' '));
    }

    #[test]
    fn test_parse_quoted_attr_value_unterminated() {
        let mut input = ParserInput::new("never ends");
        let value = input.parse_quoted_attr_value(b'"');
        assert_eq!(value, "never ends");
        assert!(!input.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_bare_attr_value() {
        let mut input = ParserInput::new("plain>rest");
        assert_eq!(input.parse_bare_attr_value(), "plain");
        assert_eq!(input.peek(), Some(b'>'));

        let mut input = ParserInput::new("v/>");
        assert_eq!(input.parse_bare_attr_value(), "v");
        assert!(input.looking_at(b"/>"));
    }

    #[test]
    fn test_parse_comment_content() {
        let mut input = ParserInput::new("<!-- hello -->x");
        assert_eq!(parse_comment_content(&mut input), " hello ");
        assert_eq!(input.peek(), Some(b'x'));
    }

    #[test]
    fn test_parse_comment_double_dash_allowed() {
        let mut input = ParserInput::new("<!--a--b-->");
        assert_eq!(parse_comment_content(&mut input), "a--b");
    }

    #[test]
    fn test_parse_comment_unterminated() {
        let mut input = ParserInput::new("<!--never");
        assert_eq!(parse_comment_content(&mut input), "never");
        assert!(input.at_end());
        assert!(!input.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_cdata_content() {
        let mut input = ParserInput::new("<![CDATA[x < 1 && y > 2]]>");
        assert_eq!(parse_cdata_content(&mut input), "x < 1 && y > 2");
    }

    #[test]
    fn test_parse_cdata_unterminated() {
        let mut input = ParserInput::new("<![CDATA[tail");
        assert_eq!(parse_cdata_content(&mut input), "tail");
        assert!(input.at_end());
    }

    #[test]
    fn test_parse_pi_content() {
        let mut input = ParserInput::new("<?target data here?>");
        let (target, data) = parse_pi_content(&mut input);
        assert_eq!(target, "target");
        assert_eq!(data, "data here");
    }

    #[test]
    fn test_parse_pi_no_data() {
        let mut input = ParserInput::new("<?target?>");
        let (target, data) = parse_pi_content(&mut input);
        assert_eq!(target, "target");
        assert_eq!(data, "");
    }

    #[test]
    fn test_parse_pi_trailing_whitespace_trimmed() {
        let mut input = ParserInput::new("<?t data  ?>");
        let (_, data) = parse_pi_content(&mut input);
        assert_eq!(data, "data");
    }

    #[test]
    fn test_parse_pi_unterminated() {
        let mut input = ParserInput::new("<?t rest of input  ");
        let (target, data) = parse_pi_content(&mut input);
        assert_eq!(target, "t");
        assert_eq!(data, "rest of input");
        assert!(input.at_end());
    }

    #[test]
    fn test_namespace_scope_fixed_bindings() {
        let root = NamespaceScope::root();
        assert_eq!(
            root.resolve_element(Some("xml")).as_deref(),
            Some(XML_NAMESPACE)
        );
        assert_eq!(
            root.resolve_attribute(Some("xmlns"), "D").as_deref(),
            Some(XMLNS_NAMESPACE)
        );
        assert_eq!(
            root.resolve_attribute(None, "xmlns").as_deref(),
            Some(XMLNS_NAMESPACE)
        );
        assert_eq!(root.resolve_element(None), None);
    }

    #[test]
    fn test_namespace_scope_nesting() {
        let root = NamespaceScope::root();
        let outer = root.nested(vec![
            (String::new(), "urn:default".to_string()),
            ("D".to_string(), "DAV:".to_string()),
        ]);

        assert_eq!(outer.resolve_element(None).as_deref(), Some("urn:default"));
        assert_eq!(outer.resolve_element(Some("D")).as_deref(), Some("DAV:"));

        // Unprefixed attributes never see the default namespace.
        assert_eq!(outer.resolve_attribute(None, "k"), None);

        let inner = outer.nested(vec![(String::new(), String::new())]);
        // xmlns="" removes the default namespace for the subtree.
        assert_eq!(inner.resolve_element(None), None);
        // Prefix bindings from the outer scope still apply.
        assert_eq!(inner.resolve_element(Some("D")).as_deref(), Some("DAV:"));
    }

    #[test]
    fn test_namespace_scope_unbound_prefix_is_none() {
        let root = NamespaceScope::root();
        assert_eq!(root.resolve_element(Some("UNDECLARED")), None);
        assert_eq!(root.resolve_attribute(Some("UNDECLARED"), "a"), None);
    }

    #[test]
    fn test_namespace_scope_innermost_wins() {
        let root = NamespaceScope::root();
        let outer = root.nested(vec![("p".to_string(), "urn:outer".to_string())]);
        let inner = outer.nested(vec![("p".to_string(), "urn:inner".to_string())]);
        assert_eq!(inner.resolve_element(Some("p")).as_deref(), Some("urn:inner"));
        assert_eq!(outer.resolve_element(Some("p")).as_deref(), Some("urn:outer"));
    }
}
