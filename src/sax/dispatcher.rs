//! Event Dispatcher
//!
//! Adapts scanner callbacks to the four `TreeSink` primitives:
//! - resolves element and attribute names (local names when namespace aware)
//! - decodes entities, then trims each text chunk before forwarding it
//! - applies the warning policy (escalate to ParseError, or drop)
//! - runs the validation hook once after the tree is complete
//!
//! ```text
//! UnifiedScanner ---> ScanDispatch ---> Dispatcher ---> TreeSink ---> Document
//!                                          ^
//!                   SaxEvent stream -------+
//! ```

use std::borrow::Cow;

use super::events::SaxEvent;
use crate::config::ParseOptions;
use crate::core::entities::decode_text;
use crate::core::scanner::{line_at, Span};
use crate::core::unified_scanner::{Diagnostic, ScanHandler, UnifiedScanner};
use crate::dom::namespace::{is_namespace_declaration, resolve_name};
use crate::dom::{Document, TreeBuilder, TreeSink};
use crate::error::{BuildError, ParseError, Result, ValidationError};

/// Name-level dispatcher in front of a `TreeSink`
pub struct Dispatcher<'o, S: TreeSink = TreeBuilder> {
    sink: S,
    options: &'o ParseOptions,
    /// Element that receives text: set on open, cleared on close
    current: Option<String>,
}

impl<'o, S: TreeSink> Dispatcher<'o, S> {
    pub fn new(sink: S, options: &'o ParseOptions) -> Self {
        Dispatcher {
            sink,
            options,
            current: None,
        }
    }

    /// Open an element and set its attributes, in source order
    pub fn on_start<'v>(
        &mut self,
        qname: &str,
        attributes: impl IntoIterator<Item = (&'v str, &'v str)>,
    ) -> Result<()> {
        let aware = self.options.namespace_aware;
        let name = resolve_name(qname, aware);
        log::trace!("open <{name}>");

        self.sink.open(name)?;
        for (key, value) in attributes {
            if aware && is_namespace_declaration(key) {
                continue;
            }
            self.sink.set_attribute(name, resolve_name(key, aware), value)?;
        }

        self.current = Some(name.to_string());
        Ok(())
    }

    pub fn on_end(&mut self, qname: &str) -> Result<()> {
        let name = resolve_name(qname, self.options.namespace_aware);
        log::trace!("close <{name}>");

        self.sink.close(name)?;
        self.current = None;
        Ok(())
    }

    /// Forward one chunk of decoded text, trimmed on its own
    pub fn on_characters(&mut self, text: &str) -> Result<()> {
        let Some(current) = self.current.as_deref() else {
            log::trace!("dropping {} bytes of text: no current element", text.len());
            return Ok(());
        };

        // Space and control characters only; U+00A0 and friends are data
        let chunk = text.trim_matches(|c: char| c <= ' ');
        if chunk.is_empty() {
            return Ok(());
        }
        self.sink.append_data(current, chunk)
    }

    /// Apply the warning policy
    pub fn on_warning(&mut self, message: impl Into<String>, line: Option<usize>) -> Result<()> {
        let message = message.into();
        if self.options.ignore_warnings {
            log::debug!("ignoring warning: {message}");
            return Ok(());
        }
        Err(self.parse_error(message, line).into())
    }

    /// Feed one owned event
    pub fn dispatch(&mut self, event: SaxEvent) -> Result<()> {
        match event {
            SaxEvent::StartElement { name, attributes } => self.on_start(
                &name,
                attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ),
            SaxEvent::EndElement { name } => self.on_end(&name),
            SaxEvent::Characters(text) => self.on_characters(&text),
            SaxEvent::Warning { message, line } => self.on_warning(message, line),
        }
    }

    /// ParseError carrying the configured source identifier
    pub fn parse_error(&self, message: impl Into<String>, line: Option<usize>) -> ParseError {
        let mut err = ParseError::new(message).with_source(self.options.source_id.clone());
        err.line = line;
        err
    }

    /// End of stream: complete the tree, then run `validate` once if enabled
    pub fn finish<F>(self, validate: F) -> Result<S::Output>
    where
        F: FnOnce(&S::Output) -> std::result::Result<(), ValidationError>,
    {
        let options = self.options;
        let output = self.sink.finish().map_err(|err| match err {
            BuildError::Parse(e) => BuildError::Parse(e.with_source(options.source_id.clone())),
            other => other,
        })?;

        if options.validate_data {
            log::debug!("running validation hook");
            validate(&output)?;
        }
        Ok(output)
    }
}

/// ScanHandler over a UTF-8 input, slicing spans into `&str`
struct ScanDispatch<'a, 'o, S: TreeSink> {
    input: &'a str,
    dispatcher: Dispatcher<'o, S>,
}

impl<'a, S: TreeSink> ScanDispatch<'a, '_, S> {
    /// Span boundaries always fall on ASCII delimiters
    fn str_at(&self, span: Span) -> &'a str {
        self.input.get(span.start..span.end).unwrap_or_default()
    }

    fn line(&self, span: Span) -> usize {
        line_at(self.input.as_bytes(), span.start)
    }

    /// Entity-decode a span; unknown entities go through the warning policy
    fn decode(&mut self, span: Span) -> Result<Cow<'a, str>> {
        let line = self.line(span);
        let decoded = decode_text(self.str_at(span))
            .map_err(|msg| BuildError::from(self.dispatcher.parse_error(msg, Some(line))))?;

        for name in &decoded.unknown {
            self.dispatcher
                .on_warning(format!("Unknown entity: &{name};"), Some(line))?;
        }
        Ok(decoded.text)
    }
}

impl<S: TreeSink> ScanHandler for ScanDispatch<'_, '_, S> {
    type Error = BuildError;

    fn start_element(&mut self, name: Span, attrs: &[(Span, Span)], is_empty: bool) -> Result<()> {
        let qname = self.str_at(name);

        let mut decoded = Vec::with_capacity(attrs.len());
        for &(key, value) in attrs {
            decoded.push((self.str_at(key), self.decode(value)?));
        }
        self.dispatcher
            .on_start(qname, decoded.iter().map(|(k, v)| (*k, v.as_ref())))?;

        if is_empty {
            self.dispatcher.on_end(qname)?;
        }
        Ok(())
    }

    fn end_element(&mut self, name: Span) -> Result<()> {
        let qname = self.str_at(name);
        self.dispatcher.on_end(qname)
    }

    fn text(&mut self, span: Span, needs_entity_decode: bool) -> Result<()> {
        let text = if needs_entity_decode {
            self.decode(span)?
        } else {
            Cow::Borrowed(self.str_at(span))
        };
        self.dispatcher.on_characters(&text)
    }

    fn cdata(&mut self, span: Span) -> Result<()> {
        let text = self.str_at(span);
        self.dispatcher.on_characters(text)
    }

    fn warning(&mut self, diagnostic: Diagnostic) -> Result<()> {
        self.dispatcher
            .on_warning(diagnostic.message, Some(diagnostic.line))
    }

    fn fatal(&mut self, diagnostic: Diagnostic) -> BuildError {
        self.dispatcher
            .parse_error(diagnostic.message, Some(diagnostic.line))
            .into()
    }
}

/// Build a tree from raw markup
pub fn build(input: &[u8], options: &ParseOptions) -> Result<Document> {
    build_with(input, options, |_| Ok(()))
}

/// `build`, with a validation hook run once when `validate_data` is set
pub fn build_with<F>(input: &[u8], options: &ParseOptions, validate: F) -> Result<Document>
where
    F: FnOnce(&Document) -> std::result::Result<(), ValidationError>,
{
    build_into(input, options, TreeBuilder::new(), validate)
}

/// Build from raw markup into any `TreeSink`
pub fn build_into<S, F>(input: &[u8], options: &ParseOptions, sink: S, validate: F) -> Result<S::Output>
where
    S: TreeSink,
    F: FnOnce(&S::Output) -> std::result::Result<(), ValidationError>,
{
    let dispatcher = Dispatcher::new(sink, options);

    let text = std::str::from_utf8(input).map_err(|e| {
        let at = e.valid_up_to();
        dispatcher.parse_error(
            format!("Invalid UTF-8 sequence at byte {at}"),
            Some(line_at(input, at)),
        )
    })?;

    let mut handler = ScanDispatch {
        input: text,
        dispatcher,
    };
    UnifiedScanner::new(text.as_bytes()).scan(&mut handler)?;
    handler.dispatcher.finish(validate)
}

/// Build a tree from owned events
pub fn build_events<I>(events: I, options: &ParseOptions) -> Result<Document>
where
    I: IntoIterator<Item = SaxEvent>,
{
    build_events_with(events, options, |_| Ok(()))
}

/// `build_events`, with a validation hook run once when `validate_data` is set
pub fn build_events_with<I, F>(events: I, options: &ParseOptions, validate: F) -> Result<Document>
where
    I: IntoIterator<Item = SaxEvent>,
    F: FnOnce(&Document) -> std::result::Result<(), ValidationError>,
{
    let mut dispatcher = Dispatcher::new(TreeBuilder::new(), options);
    for event in events {
        dispatcher.dispatch(event)?;
    }
    dispatcher.finish(validate)
}
