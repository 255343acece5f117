//! Tree Builder
//!
//! Reconstructs element nesting from a flat, well-nested event stream.
//!
//! Routing is structural: the node that receives an attribute, text, or close
//! event is always the innermost open element (top of `stack`). The element
//! name carried by each event is only checked against that node; a mismatch
//! means the caller broke the nesting contract and is reported as a
//! `RoutingError`, never used to pick a different node.

use super::document::Document;
use super::node::{Node, NodeId};
use crate::error::{ParseError, Result, RoutingError};

/// Receiver of the four build primitives
///
/// `TreeBuilder` is the plain implementation. Wrappers can implement this to
/// reject events as they arrive (returning `BuildError::Validation`) and
/// delegate the rest.
pub trait TreeSink {
    type Output;

    fn open(&mut self, name: &str) -> Result<()>;
    fn set_attribute(&mut self, element: &str, key: &str, value: &str) -> Result<()>;
    fn append_data(&mut self, element: &str, text: &str) -> Result<()>;
    fn close(&mut self, element: &str) -> Result<()>;

    /// Hand out the finished tree
    fn finish(self) -> Result<Self::Output>;
}

/// Arena + explicit stack builder. One instance backs exactly one build.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    /// Open elements, innermost last
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            nodes: Vec::with_capacity(64),
            stack: Vec::with_capacity(16),
        }
    }

    /// Number of currently open elements
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Innermost open node, checked against the element name on the event
    fn current(&mut self, element: &str) -> Result<&mut Node> {
        let Some(&id) = self.stack.last() else {
            return Err(RoutingError::NoOpenElement {
                element: element.to_string(),
            }
            .into());
        };

        let node = &mut self.nodes[id as usize];
        if node.name != element {
            return Err(RoutingError::NameMismatch {
                expected: node.name.clone(),
                found: element.to_string(),
            }
            .into());
        }
        Ok(node)
    }
}

impl TreeSink for TreeBuilder {
    type Output = Document;

    /// Open an element as a child of the innermost open element, or as the
    /// root when nothing has been opened yet.
    fn open(&mut self, name: &str) -> Result<()> {
        let id = self.nodes.len() as NodeId;

        match self.stack.last() {
            Some(&parent) => self.nodes[parent as usize].children.push(id),
            None if self.nodes.is_empty() => {}
            None => {
                return Err(RoutingError::RootAlreadyClosed {
                    element: name.to_string(),
                }
                .into());
            }
        }

        self.nodes.push(Node::element(name));
        self.stack.push(id);
        Ok(())
    }

    fn set_attribute(&mut self, element: &str, key: &str, value: &str) -> Result<()> {
        self.current(element)?.set_attribute(key, value);
        Ok(())
    }

    /// Append a chunk to the open element's text buffer. Chunks concatenate;
    /// nothing is replaced.
    fn append_data(&mut self, element: &str, text: &str) -> Result<()> {
        self.current(element)?.buffer.push_str(text);
        Ok(())
    }

    /// Close the innermost open element and freeze it.
    fn close(&mut self, element: &str) -> Result<()> {
        let node = self.current(element)?;

        let buffer = std::mem::take(&mut node.buffer);
        if !buffer.trim().is_empty() {
            if node.children.is_empty() {
                node.data = Some(buffer);
            } else {
                log::debug!(
                    "dropping {} bytes of text in <{}>: element has child elements",
                    buffer.len(),
                    node.name
                );
            }
        }
        node.complete = true;

        self.stack.pop();
        Ok(())
    }

    fn finish(self) -> Result<Document> {
        if let Some(&open) = self.stack.last() {
            let name = &self.nodes[open as usize].name;
            return Err(ParseError::new(format!("Unclosed element: <{name}>")).into());
        }
        if self.nodes.is_empty() {
            return Err(ParseError::new("Document has no root element").into());
        }

        log::debug!("tree complete: {} elements", self.nodes.len());
        Ok(Document::from_parts(self.nodes, 0))
    }
}
