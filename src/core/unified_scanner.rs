//! Unified Scanner with ScanHandler Trait
//!
//! Push-style scanner: walks the input once and calls a `ScanHandler` for
//! each construct it recognises, passing spans (byte offsets) instead of
//! string copies. Well-formedness problems are reported through
//! `ScanHandler::fatal` and abort the scan; recoverable anomalies go through
//! `ScanHandler::warning`, and the handler decides whether to continue.
//!
//! The scanner guarantees the nesting contract the tree builder relies on:
//! every end tag matches the most recently opened element, and there is
//! exactly one root element.

use super::scanner::{is_name_start_char, line_at, Scanner, Span};

/// A problem found in the input, with its 1-based line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
}

/// Trait for handling scan events
///
/// Every callback may abort the scan by returning the handler's error, which
/// `UnifiedScanner::scan` propagates unchanged.
pub trait ScanHandler {
    type Error;

    /// Called when an element starts
    ///
    /// # Arguments
    /// * `name` - Span of the element name in the input
    /// * `attrs` - Slice of (name_span, value_span) pairs, values unquoted
    /// * `is_empty` - True if this is a self-closing element (e.g., `<br/>`);
    ///   no `end_element` call follows
    fn start_element(
        &mut self,
        name: Span,
        attrs: &[(Span, Span)],
        is_empty: bool,
    ) -> Result<(), Self::Error>;

    /// Called when an element ends
    fn end_element(&mut self, name: Span) -> Result<(), Self::Error>;

    /// Called for a run of character data inside the root element
    ///
    /// # Arguments
    /// * `span` - Span of the text in the input
    /// * `needs_entity_decode` - True if the text contains '&'
    fn text(&mut self, span: Span, needs_entity_decode: bool) -> Result<(), Self::Error>;

    /// Called for CDATA sections (content excludes `<![CDATA[` and `]]>`)
    fn cdata(&mut self, span: Span) -> Result<(), Self::Error>;

    /// Called for comments (optional, default does nothing)
    fn comment(&mut self, _span: Span) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for processing instructions (optional, default does nothing)
    fn processing_instruction(
        &mut self,
        _target: Span,
        _data: Option<Span>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for XML declaration (optional, default does nothing)
    fn xml_declaration(
        &mut self,
        _version: Option<Span>,
        _encoding: Option<Span>,
        _standalone: Option<Span>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for DOCTYPE (optional, default does nothing)
    fn doctype(&mut self, _content: Span) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for a recoverable anomaly; return Ok to keep scanning
    fn warning(&mut self, diagnostic: Diagnostic) -> Result<(), Self::Error>;

    /// Called for a well-formedness error; the returned error ends the scan
    fn fatal(&mut self, diagnostic: Diagnostic) -> Self::Error;

    /// Called once after the whole input was scanned without error
    fn end_document(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Unified scanner that uses ScanHandler for event dispatch
pub struct UnifiedScanner<'a> {
    input: &'a [u8],
    scanner: Scanner<'a>,
    /// Reusable attribute buffer to avoid per-element allocations
    attrs_buf: Vec<(Span, Span)>,
    /// Names of currently open elements, innermost last
    open: Vec<Span>,
    seen_root: bool,
}

impl<'a> UnifiedScanner<'a> {
    /// Create a new unified scanner for the input
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            scanner: Scanner::new(input),
            attrs_buf: Vec::with_capacity(8), // Most elements have < 8 attrs
            open: Vec::with_capacity(16),
            seen_root: false,
        }
    }

    /// Scan the entire document, calling handler methods for each construct
    pub fn scan<H: ScanHandler>(&mut self, handler: &mut H) -> Result<(), H::Error> {
        while let Some(b) = self.scanner.peek() {
            if b == b'<' {
                self.scan_markup(handler)?;
            } else {
                self.scan_text(handler)?;
            }
        }

        if let Some(&unclosed) = self.open.last() {
            let name = String::from_utf8_lossy(unclosed.slice(self.input)).into_owned();
            return Err(self.fail(handler, unclosed.start, format!("Unclosed tag: <{name}>")));
        }
        if !self.seen_root {
            return Err(self.fail(handler, self.input.len(), "Document has no root element"));
        }

        handler.end_document()
    }

    fn fail<H: ScanHandler>(
        &self,
        handler: &mut H,
        offset: usize,
        message: impl Into<String>,
    ) -> H::Error {
        handler.fatal(Diagnostic {
            message: message.into(),
            line: line_at(self.input, offset),
        })
    }

    /// Scan markup starting with '<'
    fn scan_markup<H: ScanHandler>(&mut self, handler: &mut H) -> Result<(), H::Error> {
        let start = self.scanner.position();

        if self.scanner.starts_with(b"</") {
            self.scanner.advance(2);
            return self.scan_end_tag(handler, start);
        }
        if self.scanner.starts_with(b"<!--") {
            self.scanner.advance(4);
            let span = self.scan_until(handler, b"-->", start, "Unterminated comment")?;
            return handler.comment(span);
        }
        if self.scanner.starts_with(b"<![CDATA[") {
            if self.open.is_empty() {
                return Err(self.fail(handler, start, "CDATA section not allowed outside the root element"));
            }
            self.scanner.advance(9);
            let span = self.scan_until(handler, b"]]>", start, "Unterminated CDATA section")?;
            return handler.cdata(span);
        }
        if self.scanner.starts_with(b"<!DOCTYPE") {
            return self.scan_doctype(handler, start);
        }
        if self.scanner.starts_with(b"<!") {
            return Err(self.fail(handler, start, "Unsupported markup declaration"));
        }
        if self.scanner.starts_with(b"<?") {
            self.scanner.advance(2);
            return self.scan_pi(handler, start);
        }

        match self.scanner.peek_at(1) {
            Some(c) if is_name_start_char(c) => self.scan_start_tag(handler, start),
            _ => Err(self.fail(handler, start, "Invalid markup: '<' not followed by a name")),
        }
    }

    /// Advance past `terminator`, returning the span of the content before it
    fn scan_until<H: ScanHandler>(
        &mut self,
        handler: &mut H,
        terminator: &[u8],
        start: usize,
        message: &str,
    ) -> Result<Span, H::Error> {
        let content_start = self.scanner.position();
        match self.scanner.find_sequence(terminator) {
            Some(end) => {
                self.scanner.set_position(end + terminator.len());
                Ok(Span::new(content_start, end))
            }
            None => Err(self.fail(handler, start, message)),
        }
    }

    /// Scan a start tag
    fn scan_start_tag<H: ScanHandler>(&mut self, handler: &mut H, start: usize) -> Result<(), H::Error> {
        self.scanner.advance(1); // Skip '<'

        let Some(name) = self.scanner.read_name() else {
            return Err(self.fail(handler, start, "Malformed start tag"));
        };

        // Parse attributes - reuse buffer to avoid per-element allocations
        self.attrs_buf.clear();
        let is_empty = loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some(b'>') => {
                    self.scanner.advance(1);
                    break false;
                }
                Some(b'/') => {
                    if self.scanner.peek_at(1) != Some(b'>') {
                        return Err(self.fail(handler, start, "Expected '>' after '/' in start tag"));
                    }
                    self.scanner.advance(2);
                    break true;
                }
                Some(c) if is_name_start_char(c) => {
                    let attr = self.scan_attribute(handler, start)?;
                    self.attrs_buf.push(attr);
                }
                Some(_) => {
                    return Err(self.fail(handler, self.scanner.position(), "Unexpected character in start tag"));
                }
                None => return Err(self.fail(handler, start, "Unterminated start tag")),
            }
        };

        if self.open.is_empty() {
            if self.seen_root {
                return Err(self.fail(handler, start, "Document has multiple root elements"));
            }
            self.seen_root = true;
        }
        if !is_empty {
            self.open.push(name);
        }

        handler.start_element(name, &self.attrs_buf, is_empty)
    }

    /// Scan an attribute, returning (name_span, value_span)
    fn scan_attribute<H: ScanHandler>(&mut self, handler: &mut H, tag_start: usize) -> Result<(Span, Span), H::Error> {
        let at = self.scanner.position();
        let Some(name) = self.scanner.read_name() else {
            return Err(self.fail(handler, at, "Malformed attribute name"));
        };
        let name_bytes = name.slice(self.input);

        if self.attrs_buf.iter().any(|(n, _)| n.slice(self.input) == name_bytes) {
            let dup = String::from_utf8_lossy(name_bytes).into_owned();
            return Err(self.fail(handler, at, format!("Duplicate attribute: {dup}")));
        }

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            let attr = String::from_utf8_lossy(name_bytes).into_owned();
            return Err(self.fail(handler, at, format!("Attribute {attr} has no value")));
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();

        let quote = match self.scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.fail(handler, at, "Attribute value must be quoted")),
        };
        self.scanner.advance(1);

        let value_start = self.scanner.position();
        let Some(value_end) = self.scanner.find_byte(quote) else {
            return Err(self.fail(handler, tag_start, "Unterminated attribute value"));
        };
        let value = Span::new(value_start, value_end);
        if value.slice(self.input).contains(&b'<') {
            return Err(self.fail(handler, value_start, "'<' not allowed in attribute value"));
        }
        self.scanner.set_position(value_end + 1);

        Ok((name, value))
    }

    /// Scan an end tag (position is just past `</`)
    fn scan_end_tag<H: ScanHandler>(&mut self, handler: &mut H, start: usize) -> Result<(), H::Error> {
        let Some(name) = self.scanner.read_name() else {
            return Err(self.fail(handler, start, "Malformed end tag"));
        };
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(self.fail(handler, start, "Unterminated end tag"));
        }
        self.scanner.advance(1);

        let end_name = name.slice(self.input);
        match self.open.pop() {
            Some(open) if open.slice(self.input) == end_name => handler.end_element(name),
            Some(open) => {
                let start_str = String::from_utf8_lossy(open.slice(self.input)).into_owned();
                let end_str = String::from_utf8_lossy(end_name).into_owned();
                Err(self.fail(handler, start, format!("Tag mismatch: <{start_str}> closed with </{end_str}>")))
            }
            None => {
                let end_str = String::from_utf8_lossy(end_name).into_owned();
                Err(self.fail(handler, start, format!("Unexpected end tag: </{end_str}> without matching start tag")))
            }
        }
    }

    /// Scan text content up to the next '<'
    fn scan_text<H: ScanHandler>(&mut self, handler: &mut H) -> Result<(), H::Error> {
        let start = self.scanner.position();
        let end = self.scanner.find_tag_start().unwrap_or(self.input.len());
        self.scanner.set_position(end);

        let span = Span::new(start, end);
        let content = span.slice(self.input);

        if self.open.is_empty() {
            // Whitespace between prolog items and after the root is fine
            if content.iter().all(u8::is_ascii_whitespace) {
                return Ok(());
            }
            return Err(self.fail(handler, start, "Text content not allowed outside the root element"));
        }

        handler.text(span, memchr::memchr(b'&', content).is_some())
    }

    /// Scan a processing instruction or the XML declaration (position is just past `<?`)
    fn scan_pi<H: ScanHandler>(&mut self, handler: &mut H, start: usize) -> Result<(), H::Error> {
        let Some(target) = self.scanner.read_name() else {
            return Err(self.fail(handler, start, "Malformed processing instruction"));
        };
        self.scanner.skip_whitespace();
        let data = self.scan_until(handler, b"?>", start, "Unterminated processing instruction")?;
        let data = (!data.is_empty()).then_some(data);

        if target.slice(self.input) != b"xml" {
            return handler.processing_instruction(target, data);
        }

        if start != 0 {
            return Err(self.fail(handler, start, "XML declaration must be at the start of the document"));
        }
        let version = data.and_then(|d| self.pseudo_attribute(d, b"version"));
        let encoding = data.and_then(|d| self.pseudo_attribute(d, b"encoding"));
        let standalone = data.and_then(|d| self.pseudo_attribute(d, b"standalone"));

        if let Some(enc) = encoding {
            let declared = enc.slice(self.input);
            if !declared.eq_ignore_ascii_case(b"utf-8") && !declared.eq_ignore_ascii_case(b"utf8") {
                let declared = String::from_utf8_lossy(declared).into_owned();
                handler.warning(Diagnostic {
                    message: format!("Declared encoding {declared} is read as UTF-8"),
                    line: line_at(self.input, enc.start),
                })?;
            }
        }

        handler.xml_declaration(version, encoding, standalone)
    }

    /// Find `name="value"` inside an XML declaration body
    fn pseudo_attribute(&self, data: Span, name: &[u8]) -> Option<Span> {
        let body = data.slice(self.input);
        let at = body.windows(name.len()).position(|w| w == name)?;
        let mut pos = at + name.len();

        while body.get(pos)?.is_ascii_whitespace() {
            pos += 1;
        }
        if body[pos] != b'=' {
            return None;
        }
        pos += 1;
        while body.get(pos)?.is_ascii_whitespace() {
            pos += 1;
        }

        let quote = body[pos];
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        let value_start = pos + 1;
        let len = memchr::memchr(quote, &body[value_start..])?;
        Some(Span::new(data.start + value_start, data.start + value_start + len))
    }

    /// Scan DOCTYPE, handling an internal subset
    fn scan_doctype<H: ScanHandler>(&mut self, handler: &mut H, start: usize) -> Result<(), H::Error> {
        if self.seen_root {
            return Err(self.fail(handler, start, "DOCTYPE must come before the root element"));
        }
        self.scanner.advance(2); // Skip "<!"
        let content_start = self.scanner.position();

        let mut depth = 0usize;
        while let Some(c) = self.scanner.peek() {
            match c {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => {
                    let span = Span::new(content_start, self.scanner.position());
                    self.scanner.advance(1);
                    return handler.doctype(span);
                }
                _ => {}
            }
            self.scanner.advance(1);
        }

        Err(self.fail(handler, start, "Unterminated DOCTYPE declaration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test handler that records events as readable strings
    struct TestHandler<'a> {
        input: &'a [u8],
        events: Vec<String>,
        warnings: Vec<Diagnostic>,
    }

    impl<'a> TestHandler<'a> {
        fn new(input: &'a [u8]) -> Self {
            Self {
                input,
                events: Vec::new(),
                warnings: Vec::new(),
            }
        }

        fn str(&self, span: Span) -> String {
            String::from_utf8_lossy(span.slice(self.input)).into_owned()
        }
    }

    impl ScanHandler for TestHandler<'_> {
        type Error = Diagnostic;

        fn start_element(&mut self, name: Span, attrs: &[(Span, Span)], is_empty: bool) -> Result<(), Diagnostic> {
            let attrs: Vec<String> = attrs
                .iter()
                .map(|(n, v)| format!("{}={}", self.str(*n), self.str(*v)))
                .collect();
            let marker = if is_empty { "/" } else { "" };
            self.events
                .push(format!("<{}{}{}>", self.str(name), attrs.join(","), marker));
            Ok(())
        }

        fn end_element(&mut self, name: Span) -> Result<(), Diagnostic> {
            self.events.push(format!("</{}>", self.str(name)));
            Ok(())
        }

        fn text(&mut self, span: Span, needs_decode: bool) -> Result<(), Diagnostic> {
            let marker = if needs_decode { "&" } else { "" };
            self.events.push(format!("text{}:{}", marker, self.str(span)));
            Ok(())
        }

        fn cdata(&mut self, span: Span) -> Result<(), Diagnostic> {
            self.events.push(format!("cdata:{}", self.str(span)));
            Ok(())
        }

        fn warning(&mut self, diagnostic: Diagnostic) -> Result<(), Diagnostic> {
            self.warnings.push(diagnostic);
            Ok(())
        }

        fn fatal(&mut self, diagnostic: Diagnostic) -> Diagnostic {
            diagnostic
        }
    }

    fn scan(input: &[u8]) -> Result<Vec<String>, Diagnostic> {
        let mut handler = TestHandler::new(input);
        UnifiedScanner::new(input).scan(&mut handler)?;
        Ok(handler.events)
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(scan(b"<root/>").unwrap(), vec!["<root/>"]);
    }

    #[test]
    fn test_nested_elements_with_attributes() {
        let events = scan(b"<a id='1'><b x=\"y\" z='w'/></a>").unwrap();
        assert_eq!(events, vec!["<aid=1>", "<bx=y,z=w/>", "</a>"]);
    }

    #[test]
    fn test_text_and_entity_detection() {
        let events = scan(b"<a>hello &amp; world</a>").unwrap();
        assert_eq!(events[1], "text&:hello &amp; world");
    }

    #[test]
    fn test_cdata_comment_and_pi() {
        let events = scan(b"<?xml version='1.0'?><!-- c --><a><?php x?><![CDATA[<raw>]]></a>").unwrap();
        assert_eq!(events, vec!["<a>", "cdata:<raw>", "</a>"]);
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let events = scan(b"<!DOCTYPE a [<!ELEMENT a ANY>]>\n<a/>").unwrap();
        assert_eq!(events, vec!["<a/>"]);
    }

    #[test]
    fn test_whitespace_outside_root_is_skipped() {
        assert_eq!(scan(b"\n  <a/>\n").unwrap(), vec!["<a/>"]);
    }

    #[test]
    fn test_tag_mismatch_reports_line() {
        let err = scan(b"<a>\n<b>\n</a>").unwrap_err();
        assert_eq!(err.message, "Tag mismatch: <b> closed with </a>");
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_unclosed_tag() {
        let err = scan(b"<a><b></b>").unwrap_err();
        assert_eq!(err.message, "Unclosed tag: <a>");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_multiple_roots() {
        let err = scan(b"<a/><b/>").unwrap_err();
        assert_eq!(err.message, "Document has multiple root elements");
    }

    #[test]
    fn test_no_root() {
        let err = scan(b"<!-- only a comment -->").unwrap_err();
        assert_eq!(err.message, "Document has no root element");
    }

    #[test]
    fn test_text_outside_root() {
        let err = scan(b"<a/>trailing").unwrap_err();
        assert_eq!(err.message, "Text content not allowed outside the root element");
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = scan(b"<a x='1' x='2'/>").unwrap_err();
        assert_eq!(err.message, "Duplicate attribute: x");
    }

    #[test]
    fn test_unquoted_attribute() {
        let err = scan(b"<a x=1/>").unwrap_err();
        assert_eq!(err.message, "Attribute value must be quoted");
    }

    #[test]
    fn test_invalid_markup() {
        let err = scan(b"<a><1bad/></a>").unwrap_err();
        assert_eq!(err.message, "Invalid markup: '<' not followed by a name");
    }

    #[test]
    fn test_unterminated_comment() {
        let err = scan(b"<a><!-- never closed</a>").unwrap_err();
        assert_eq!(err.message, "Unterminated comment");
    }

    #[test]
    fn test_foreign_encoding_warns() {
        let input = b"<?xml version='1.0' encoding='ISO-8859-1'?><a/>";
        let mut handler = TestHandler::new(input);
        UnifiedScanner::new(input).scan(&mut handler).unwrap();
        assert_eq!(handler.warnings.len(), 1);
        assert_eq!(handler.warnings[0].message, "Declared encoding ISO-8859-1 is read as UTF-8");
    }

    #[test]
    fn test_late_xml_declaration() {
        let err = scan(b"<a/><?xml version='1.0'?>").unwrap_err();
        assert_eq!(err.message, "XML declaration must be at the start of the document");
    }
}
