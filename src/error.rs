//! Error Types
//!
//! Three ways a build can fail, kept distinct so callers can tell a malformed
//! document from a well-formed but invalid one:
//! - `ParseError`: syntax errors and escalated warnings from the scanner
//! - `ValidationError`: raised by the post-build validation hook
//! - `RoutingError`: an event named an element other than the open one

use std::fmt;

use thiserror::Error;

/// Result alias used by every build entry point
pub type Result<T> = std::result::Result<T, BuildError>;

/// Malformed input, or a warning that was not ignored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    pub message: String,
    /// 1-based line in the source, when known
    pub line: Option<usize>,
    /// Caller-supplied source identifier (file name, URI)
    pub source_id: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            line: None,
            source_id: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_source(mut self, source_id: Option<String>) -> Self {
        if self.source_id.is_none() {
            self.source_id = source_id;
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        if let Some(source) = &self.source_id {
            write!(f, " in {source}")?;
        }
        Ok(())
    }
}

/// A well-formed document that failed a domain check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError {
            message: message.into(),
        }
    }
}

/// Event stream broke the nesting contract the builder relies on.
///
/// The scanner never produces these for well-formed input; seeing one means
/// the caller fed events by hand and got the order wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("event for <{found}> routed to open element <{expected}>")]
    NameMismatch { expected: String, found: String },

    #[error("event for <{element}> arrived with no open element")]
    NoOpenElement { element: String },

    #[error("<{element}> opened after the root element was closed")]
    RootAlreadyClosed { element: String },
}

/// Any failure of a build
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("routing contract violated: {0}")]
    Routing(#[from] RoutingError),
}

impl BuildError {
    /// Short tag used in the `{:error, {kind, message, line}}` NIF tuple
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::Parse(_) => "parse",
            BuildError::Validation(_) => "validation",
            BuildError::Routing(_) => "routing",
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            BuildError::Parse(e) => e.line,
            _ => None,
        }
    }

    /// Message without the kind prefix
    pub fn message(&self) -> String {
        match self {
            BuildError::Parse(e) => e.to_string(),
            BuildError::Validation(e) => e.to_string(),
            BuildError::Routing(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Unclosed tag: <a>")
            .at_line(3)
            .with_source(Some("feed.xml".to_string()));
        assert_eq!(err.to_string(), "Unclosed tag: <a> (line 3) in feed.xml");
    }

    #[test]
    fn test_with_source_keeps_existing() {
        let err = ParseError::new("x")
            .with_source(Some("first".to_string()))
            .with_source(Some("second".to_string()));
        assert_eq!(err.source_id.as_deref(), Some("first"));
    }

    #[test]
    fn test_kind() {
        let parse: BuildError = ParseError::new("bad").into();
        let validation: BuildError = ValidationError::new("invalid").into();
        let routing: BuildError = RoutingError::NoOpenElement {
            element: "a".to_string(),
        }
        .into();

        assert_eq!(parse.kind(), "parse");
        assert_eq!(validation.kind(), "validation");
        assert_eq!(routing.kind(), "routing");
        assert_eq!(validation.message(), "invalid");
    }
}
