//! Element node representation
//!
//! Nodes live in the document arena and refer to their children by NodeId.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// What a completed element holds. Exactly one applies to every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No data, no children: serialized as `<name/>`
    Empty,
    /// Text data, no children
    Data,
    /// One or more children, no direct data
    Parent,
}

/// One element in the arena
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) name: String,
    /// (key, value) in first-set order; keys are unique
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) data: Option<String>,
    pub(crate) children: Vec<NodeId>,
    /// Text accumulated between open and close; flushed into `data` on close
    pub(crate) buffer: String,
    pub(crate) complete: bool,
}

impl Node {
    pub(crate) fn element(name: &str) -> Self {
        Node {
            name: name.to_string(),
            ..Node::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Get attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    #[inline]
    pub fn child_ids(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn shape(&self) -> Shape {
        if !self.children.is_empty() {
            Shape::Parent
        } else if self.data.is_some() {
            Shape::Data
        } else {
            Shape::Empty
        }
    }

    /// Insert or replace an attribute, keeping the original position on replace
    pub(crate) fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node() {
        let node = Node::element("item");
        assert_eq!(node.name(), "item");
        assert_eq!(node.shape(), Shape::Empty);
        assert!(!node.is_complete());
        assert!(!node.has_attributes());
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut node = Node::element("item");
        node.set_attribute("a", "1");
        node.set_attribute("b", "2");
        node.set_attribute("a", "3");
        assert_eq!(
            node.attributes(),
            &[("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert_eq!(node.attribute("a"), Some("3"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test]
    fn test_shape() {
        let mut node = Node::element("x");
        node.data = Some("text".to_string());
        assert_eq!(node.shape(), Shape::Data);
        node.data = None;
        node.children.push(1);
        assert_eq!(node.shape(), Shape::Parent);
    }
}
