//! Completed document tree
//!
//! Arena storage produced by the TreeBuilder:
//! - Nodes in a single Vec, root first
//! - NodeId indices for child links
//! - NodeRef borrowed handles for read-only traversal
//!
//! A Document is never mutated after the builder hands it out, so it can be
//! shared between readers freely.

use super::node::{Node, NodeId, Shape};

/// A fully built tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        Document { nodes, root }
    }

    /// Handle to the root element
    #[inline]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: self.root,
        }
    }

    /// Handle to any node by ID
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes
            .get(id as usize)
            .map(|_| NodeRef { doc: self, id })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }
}

/// Borrowed handle to one element of a Document
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn node(&self) -> &'a Node {
        self.doc.node(self.id)
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        self.node().name()
    }

    #[inline]
    pub fn attributes(&self) -> &'a [(String, String)] {
        self.node().attributes()
    }

    #[inline]
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.node().attribute(key)
    }

    #[inline]
    pub fn data(&self) -> Option<&'a str> {
        self.node().data()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.node().shape()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.node().is_complete()
    }

    /// Iterate over children in document order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        self.node()
            .child_ids()
            .iter()
            .map(move |&id| NodeRef { doc, id })
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{TreeBuilder, TreeSink};

    fn sample() -> Document {
        let mut b = TreeBuilder::new();
        b.open("root").unwrap();
        b.open("a").unwrap();
        b.close("a").unwrap();
        b.open("b").unwrap();
        b.append_data("b", "text").unwrap();
        b.close("b").unwrap();
        b.close("root").unwrap();
        b.finish().unwrap()
    }

    #[test]
    fn test_root_and_children() {
        let doc = sample();
        let root = doc.root();
        assert_eq!(root.name(), "root");
        let names: Vec<_> = root.children().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.node_count(), 3);
    }

    #[test]
    fn test_get_by_id() {
        let doc = sample();
        let b = doc.get(2).unwrap();
        assert_eq!(b.name(), "b");
        assert_eq!(b.data(), Some("text"));
        assert!(doc.get(99).is_none());
    }

    #[test]
    fn test_noderef_equality() {
        let doc = sample();
        assert_eq!(doc.root(), doc.get(0).unwrap());
        assert_ne!(doc.root(), doc.get(1).unwrap());
    }
}
