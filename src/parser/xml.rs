//! Core XML parser state machine.
//!
//! A hand-rolled recursive descent parser with tolerant recovery at every
//! decision point. The only unrecoverable failures are a non-empty input
//! with no root element and nesting-depth exhaustion; everything else is
//! repaired to a best-effort tree and recorded as a diagnostic.
//!
//! Top-level grammar:
//!
//! ```text
//! Start → [BOM skip] → [XmlDeclaration] → Misc* → [DocumentType] → Misc*
//!       → RootElement → Misc* → End
//! ```

use crate::error::{ErrorSeverity, ParseError};
use crate::tree::{Attribute, Document, DocumentType, Element, Node, Pi, XmlDeclaration};

use super::input::{
    is_name_start_char, parse_cdata_content, parse_comment_content, parse_pi_content, split_name,
    split_owned_name, NamespaceScope, ParserInput,
};

/// The tolerant XML parser. Owns the cursor and produces the tree.
pub(crate) struct XmlParser<'a> {
    input: ParserInput<'a>,
}

impl<'a> XmlParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: ParserInput::new(input),
        }
    }

    /// Parses the entire document.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        let empty_input = self.input.at_end();

        // A leading byte-order mark is discarded before anything else.
        if self.input.looking_at(b"\xEF\xBB\xBF") {
            self.input.advance(3);
        }

        let mut children = Vec::new();
        let scope = NamespaceScope::root();

        // Optional XML declaration — always the first child when present.
        // `<?xml` not followed by whitespace or `?>` is an ordinary PI whose
        // target happens to start with "xml" and is handled by Misc below.
        self.input.skip_whitespace();
        if self.at_xml_declaration() {
            let decl = self.parse_xml_declaration();
            children.push(Node::XmlDeclaration(decl));
        }

        self.parse_misc(&mut children);

        // Optional DOCTYPE.
        if self.input.looking_at_ci(b"<!DOCTYPE") {
            if let Some(doctype) = self.parse_doctype() {
                children.push(Node::DocumentType(doctype));
            }
            self.parse_misc(&mut children);
        }

        // Root element: scan tolerantly past anything that cannot start it.
        let mut found_root = false;
        loop {
            self.parse_misc(&mut children);
            if self.input.at_end() {
                break;
            }
            if self.at_element_start() {
                let root = self.parse_element(&scope)?;
                children.push(Node::Element(root));
                found_root = true;
                break;
            }
            self.input.push_diagnostic(
                ErrorSeverity::Error,
                "skipping content that cannot start the root element".to_string(),
            );
            let _ = self.input.next_char();
            self.input.skip_until(b'<');
        }

        // Trailing Misc, with anything else skipped.
        loop {
            self.parse_misc(&mut children);
            if self.input.at_end() {
                break;
            }
            if self.at_element_start() {
                self.input.push_diagnostic(
                    ErrorSeverity::Error,
                    "multiple root elements".to_string(),
                );
                let extra = self.parse_element(&scope)?;
                children.push(Node::Element(extra));
                continue;
            }
            self.input.push_diagnostic(
                ErrorSeverity::Error,
                "skipping content after document element".to_string(),
            );
            let _ = self.input.next_char();
            self.input.skip_until(b'<');
        }

        if !found_root {
            if empty_input {
                return Ok(Document::default());
            }
            // The one fatal condition: non-empty input, no document to parse.
            return Err(self.input.fatal("no root element found"));
        }

        Ok(Document {
            children,
            diagnostics: std::mem::take(&mut self.input.diagnostics),
        })
    }

    /// True when the cursor sits on `<` followed by a name start character.
    fn at_element_start(&self) -> bool {
        self.input.peek() == Some(b'<')
            && self
                .input
                .peek_char_at(1)
                .is_some_and(is_name_start_char)
    }

    /// True when `<?xml` here is the XML declaration: it must be followed
    /// by whitespace or `?>` to count (disambiguates from a PI whose target
    /// merely starts with "xml").
    fn at_xml_declaration(&self) -> bool {
        if !self.input.looking_at(b"<?xml") {
            return false;
        }
        match self.input.peek_at(5) {
            None => true,
            Some(b' ' | b'\t' | b'\r' | b'\n') => true,
            Some(b'?') => self.input.peek_at(6) == Some(b'>'),
            _ => false,
        }
    }

    // --- XML Declaration ---

    /// Parses `<?xml version="1.0" encoding="..." standalone="..."?>`,
    /// tolerating missing or malformed pseudo-attributes. A missing version
    /// defaults to `"1.0"`; an unterminated declaration consumes the rest
    /// of the input.
    fn parse_xml_declaration(&mut self) -> XmlDeclaration {
        self.input.advance(5); // <?xml
        let mut version = None;
        let mut encoding = None;
        let mut standalone = None;

        loop {
            self.input.skip_whitespace();
            if self.input.at_end() {
                self.input.push_diagnostic(
                    ErrorSeverity::Error,
                    "unterminated XML declaration".to_string(),
                );
                break;
            }
            if self.input.looking_at(b"?>") {
                self.input.advance(2);
                break;
            }
            let name = self.input.take_name();
            if name.is_empty() {
                let _ = self.input.next_char();
                continue;
            }
            self.input.skip_whitespace();
            let value = if self.input.peek() == Some(b'=') {
                self.input.advance(1);
                self.input.skip_whitespace();
                match self.input.peek() {
                    Some(q @ (b'"' | b'\'')) => {
                        self.input.advance(1);
                        self.input.parse_quoted_attr_value(q)
                    }
                    _ => self.parse_decl_bare_value(),
                }
            } else {
                String::new()
            };
            match name.as_str() {
                "version" => version = Some(value),
                "encoding" => encoding = Some(value),
                "standalone" => match value.as_str() {
                    "yes" => standalone = Some(true),
                    "no" => standalone = Some(false),
                    other => self.input.push_diagnostic(
                        ErrorSeverity::Warning,
                        format!("ignoring standalone value '{other}'"),
                    ),
                },
                other => self.input.push_diagnostic(
                    ErrorSeverity::Warning,
                    format!("ignoring XML declaration attribute '{other}'"),
                ),
            }
        }

        XmlDeclaration {
            version: version.unwrap_or_else(|| "1.0".to_string()),
            encoding,
            standalone,
        }
    }

    /// Reads an unquoted pseudo-attribute value inside the XML declaration,
    /// stopping before whitespace, `?`, or `>`.
    fn parse_decl_bare_value(&mut self) -> String {
        let mut value = String::new();
        while let Some(b) = self.input.peek() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'?' | b'>') {
                break;
            }
            if let Some(ch) = self.input.next_char() {
                value.push(ch);
            } else {
                break;
            }
        }
        value
    }

    // --- Misc (comments, PIs, whitespace) ---

    /// Consumes any run of comments, processing instructions, and
    /// whitespace. Document-level whitespace is separator content and is
    /// not preserved as nodes.
    fn parse_misc(&mut self, children: &mut Vec<Node>) {
        loop {
            self.input.skip_whitespace();
            if self.input.looking_at(b"<!--") {
                let content = parse_comment_content(&mut self.input);
                children.push(Node::Comment { content });
            } else if self.input.looking_at(b"<?") {
                let (target, data) = parse_pi_content(&mut self.input);
                children.push(Node::ProcessingInstruction(Pi { target, data }));
            } else {
                break;
            }
        }
    }

    // --- DOCTYPE Declaration ---

    /// Parses `<!DOCTYPE ...>`. A structurally broken declaration is
    /// abandoned: a diagnostic is recorded, the cursor skips forward to the
    /// next `<`, and no node is produced.
    fn parse_doctype(&mut self) -> Option<DocumentType> {
        self.input.advance(9); // <!DOCTYPE (case-insensitive, checked by caller)
        let checkpoint = self.input.save_position();
        match self.parse_doctype_body() {
            Ok(doctype) => Some(doctype),
            Err(()) => {
                self.input.push_diagnostic(
                    ErrorSeverity::Error,
                    "abandoning malformed DOCTYPE".to_string(),
                );
                // Rewind to just past the keyword, then skip forward to the
                // next '<' so a following root element is still found.
                self.input.restore_position(checkpoint);
                self.input.skip_until(b'<');
                None
            }
        }
    }

    fn parse_doctype_body(&mut self) -> Result<DocumentType, ()> {
        if !self.input.skip_whitespace() {
            return Err(());
        }
        let name = self.input.take_name();
        if name.is_empty() {
            return Err(());
        }
        self.input.skip_whitespace();

        let mut public_id = None;
        let mut system_id = None;
        if self.input.looking_at_ci(b"PUBLIC") {
            self.input.advance(6);
            self.input.skip_whitespace();
            public_id = Some(self.parse_doctype_literal()?);
            self.input.skip_whitespace();
            system_id = Some(self.parse_doctype_literal()?);
            self.input.skip_whitespace();
        } else if self.input.looking_at_ci(b"SYSTEM") {
            self.input.advance(6);
            self.input.skip_whitespace();
            system_id = Some(self.parse_doctype_literal()?);
            self.input.skip_whitespace();
        }

        // Optional internal subset, captured verbatim. Quoted literals are
        // opaque so a ']' inside one does not terminate the subset.
        let mut internal_subset = None;
        if self.input.peek() == Some(b'[') {
            self.input.advance(1);
            let start = self.input.pos();
            loop {
                match self.input.peek() {
                    None => return Err(()),
                    Some(b']') => break,
                    Some(q @ (b'"' | b'\'')) => {
                        self.input.advance(1);
                        self.input.skip_until(q);
                        if self.input.at_end() {
                            return Err(());
                        }
                        self.input.advance(1);
                    }
                    Some(_) => {
                        let _ = self.input.next_char();
                    }
                }
            }
            internal_subset = Some(self.input.slice_str(start, self.input.pos()).to_string());
            self.input.advance(1); // ']'
            self.input.skip_whitespace();
        }

        if self.input.peek() != Some(b'>') {
            return Err(());
        }
        self.input.advance(1);

        Ok(DocumentType {
            name,
            public_id,
            system_id,
            internal_subset,
        })
    }

    /// Reads one quoted DOCTYPE identifier literal.
    fn parse_doctype_literal(&mut self) -> Result<String, ()> {
        let quote = match self.input.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(()),
        };
        self.input.advance(1);
        let start = self.input.pos();
        self.input.skip_until(quote);
        if self.input.at_end() {
            return Err(());
        }
        let literal = self.input.slice_str(start, self.input.pos()).to_string();
        self.input.advance(1);
        Ok(literal)
    }

    // --- Elements ---

    /// Parses an element whose `<` the cursor sits on. `parent_scope` is the
    /// namespace scope in effect outside this element; the element's own
    /// scope is built from its `xmlns` declarations and threaded through to
    /// the children, unwinding with the call stack.
    fn parse_element(
        &mut self,
        parent_scope: &NamespaceScope<'_>,
    ) -> Result<Element, ParseError> {
        self.input.increment_depth()?;
        self.input.advance(1); // '<'
        let qname = self.input.take_name();

        // First pass: raw attributes, no namespace resolution yet.
        let mut attributes = Vec::new();
        let has_content = loop {
            self.input.skip_whitespace();
            match self.input.peek() {
                None => {
                    self.input.push_diagnostic(
                        ErrorSeverity::Error,
                        format!("unterminated start tag <{qname}> treated as self-closing"),
                    );
                    break false;
                }
                Some(b'>') => {
                    self.input.advance(1);
                    break true;
                }
                Some(b'/') if self.input.peek_at(1) == Some(b'>') => {
                    self.input.advance(2);
                    break false;
                }
                Some(b'<') => {
                    // A new tag begins before this one was terminated.
                    self.input.push_diagnostic(
                        ErrorSeverity::Error,
                        format!("malformed start tag <{qname}> treated as self-closing"),
                    );
                    break false;
                }
                Some(_) => {
                    if self.input.peek_char().is_some_and(is_name_start_char) {
                        attributes.push(self.parse_raw_attribute());
                    } else {
                        self.input.push_diagnostic(
                            ErrorSeverity::Error,
                            format!("skipping unexpected character in <{qname}> start tag"),
                        );
                        let _ = self.input.next_char();
                    }
                }
            }
        };

        // The element's scope holds exactly its xmlns declarations.
        let mut declarations = Vec::new();
        for attr in &attributes {
            if attr.prefix.is_none() && attr.name == "xmlns" {
                declarations.push((String::new(), attr.value.clone()));
            } else if attr.prefix.as_deref() == Some("xmlns") {
                declarations.push((attr.name.clone(), attr.value.clone()));
            }
        }
        let scope = parent_scope.nested(declarations);

        let (prefix, local_name) = split_owned_name(qname);
        let namespace = scope.resolve_element(prefix.as_deref());
        if namespace.is_none() {
            if let Some(pfx) = prefix.as_deref() {
                self.input.push_diagnostic(
                    ErrorSeverity::Warning,
                    format!("undeclared namespace prefix '{pfx}'"),
                );
            }
        }
        for attr in &mut attributes {
            attr.namespace = scope.resolve_attribute(attr.prefix.as_deref(), &attr.name);
        }

        let display_name = match prefix.as_deref() {
            Some(pfx) => format!("{pfx}:{local_name}"),
            None => local_name.clone(),
        };

        let children = if has_content {
            self.parse_content(&scope, &display_name)?
        } else {
            Vec::new()
        };

        self.input.decrement_depth();
        Ok(Element {
            name: local_name,
            prefix,
            namespace,
            attributes,
            children,
        })
    }

    /// Parses one raw attribute: name, optional `=` and value. Tolerates a
    /// missing `=` (empty value), either quote style, and bare unquoted
    /// values.
    fn parse_raw_attribute(&mut self) -> Attribute {
        let qname = self.input.take_name();
        self.input.skip_whitespace();
        let value = if self.input.peek() == Some(b'=') {
            self.input.advance(1);
            self.input.skip_whitespace();
            match self.input.peek() {
                Some(q @ (b'"' | b'\'')) => {
                    self.input.advance(1);
                    self.input.parse_quoted_attr_value(q)
                }
                None => String::new(),
                Some(_) => self.input.parse_bare_attr_value(),
            }
        } else {
            self.input.push_diagnostic(
                ErrorSeverity::Warning,
                format!("attribute '{qname}' has no value"),
            );
            String::new()
        };

        let (prefix, local) = split_name(&qname);
        Attribute {
            name: local.to_string(),
            prefix: prefix.map(String::from),
            namespace: None,
            value,
        }
    }

    // --- Content ---

    /// Parses element content until a closing tag or end of input. Any
    /// closing tag ends this element, even when its name does not match —
    /// the remaining sibling stream reparents one level up through stack
    /// unwinding.
    fn parse_content(
        &mut self,
        scope: &NamespaceScope<'_>,
        open_name: &str,
    ) -> Result<Vec<Node>, ParseError> {
        let mut children = Vec::new();
        loop {
            if self.input.at_end() {
                self.input.push_diagnostic(
                    ErrorSeverity::Error,
                    format!("missing closing tag for <{open_name}>"),
                );
                break;
            }
            if self.input.looking_at(b"</") {
                self.consume_closing_tag(open_name);
                break;
            }
            if self.input.looking_at(b"<![CDATA[") {
                let content = parse_cdata_content(&mut self.input);
                children.push(Node::CData { content });
            } else if self.input.looking_at(b"<!--") {
                let content = parse_comment_content(&mut self.input);
                children.push(Node::Comment { content });
            } else if self.input.looking_at(b"<?") {
                let (target, data) = parse_pi_content(&mut self.input);
                children.push(Node::ProcessingInstruction(Pi { target, data }));
            } else if self.at_element_start() {
                let child = self.parse_element(scope)?;
                children.push(Node::Element(child));
            } else if self.input.looking_at(b"<!") {
                // Markup declarations have no place in content.
                self.input.push_diagnostic(
                    ErrorSeverity::Error,
                    "skipping markup declaration in element content".to_string(),
                );
                self.input.skip_until(b'>');
                self.input.advance(1);
            } else {
                let text = self.parse_text();
                if !text.is_empty() {
                    children.push(Node::Text { content: text });
                }
            }
        }
        Ok(children)
    }

    /// Consumes a closing tag. The tag always terminates the current
    /// element; a name mismatch is recorded but not repaired.
    fn consume_closing_tag(&mut self, open_name: &str) {
        self.input.advance(2); // "</"
        let close_name = self.input.take_name();
        self.input.skip_whitespace();
        if self.input.peek() == Some(b'>') {
            self.input.advance(1);
        } else {
            self.input.push_diagnostic(
                ErrorSeverity::Error,
                format!("malformed closing tag </{close_name}>"),
            );
            self.input.skip_until(b'>');
            self.input.advance(1);
        }
        if close_name != open_name {
            self.input.push_diagnostic(
                ErrorSeverity::Error,
                format!("mismatched closing tag: expected </{open_name}>, found </{close_name}>"),
            );
        }
    }

    // --- Character Data ---

    /// Accumulates text until the next construct start or `&`, resolving
    /// references inline. A stray `<` that cannot start a tag is literal
    /// text.
    fn parse_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(b) = self.input.peek() {
            if b == b'<' {
                if self.at_element_start()
                    || self.input.looking_at(b"</")
                    || self.input.looking_at(b"<!")
                    || self.input.looking_at(b"<?")
                {
                    break;
                }
                self.input.push_diagnostic(
                    ErrorSeverity::Warning,
                    "stray '<' treated as literal text".to_string(),
                );
                self.input.advance(1);
                text.push('<');
            } else if b == b'&' {
                self.input.decode_reference_into(&mut text);
            } else if let Some(ch) = self.input.next_char() {
                text.push(ch);
            } else {
                break;
            }
        }
        text
    }
}
