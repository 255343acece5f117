//! SAX Event Types
//!
//! Owned events for driving a build without the byte scanner (tests, other
//! front ends, replayed streams). Names are qualified names as a scanner would
//! report them; text is already entity-decoded but not trimmed.

/// A scanner-level event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaxEvent {
    /// Start of an element
    StartElement {
        /// Qualified element name
        name: String,
        /// Attributes as (qualified name, value) pairs, in source order
        attributes: Vec<(String, String)>,
    },

    /// End of an element
    EndElement {
        /// Qualified element name
        name: String,
    },

    /// One chunk of character data
    Characters(String),

    /// Recoverable anomaly, subject to the warning policy
    Warning {
        message: String,
        line: Option<usize>,
    },
}

impl SaxEvent {
    /// Start event with no attributes
    pub fn start(name: impl Into<String>) -> Self {
        SaxEvent::StartElement {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Start event with attributes
    pub fn start_with<K, V>(name: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        SaxEvent::StartElement {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        SaxEvent::EndElement { name: name.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        SaxEvent::Characters(text.into())
    }
}
