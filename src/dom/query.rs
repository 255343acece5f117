//! Tree queries
//!
//! Read-only lookups over a completed Document, starting at any node.

use super::document::{Document, NodeRef};

impl<'a> NodeRef<'a> {
    /// Depth-first, pre-order search: this node first, then each child
    /// subtree in document order. Returns the first element named `name`.
    pub fn find_first(&self, name: &str) -> Option<NodeRef<'a>> {
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            if node.name() == name {
                return Some(node);
            }
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }
        None
    }

    /// Value of `key` on the first element named `name`
    pub fn find_attribute(&self, name: &str, key: &str) -> Option<&'a str> {
        self.find_first(name)?.attribute(key)
    }

    /// Collect elements named `name`, in document order.
    ///
    /// This is a narrow search, unlike `find_first`:
    /// - a matching node is collected and its subtree is not searched further
    /// - otherwise only direct children named `name` are descended into, so a
    ///   match sitting below a non-matching child is not found
    ///
    /// For `<a><b><c/></b></a>`, searching `a` for `c` returns nothing.
    pub fn find_all_matching(&self, name: &str) -> Vec<NodeRef<'a>> {
        if self.name() == name {
            return vec![*self];
        }
        // Every child taken here matches, so it is collected without descending
        self.children().filter(|child| child.name() == name).collect()
    }
}

impl Document {
    /// `find_first` from the root
    pub fn find_first(&self, name: &str) -> Option<NodeRef<'_>> {
        self.root().find_first(name)
    }

    /// `find_attribute` from the root
    pub fn find_attribute(&self, name: &str, key: &str) -> Option<&str> {
        self.root().find_attribute(name, key)
    }

    /// `find_all_matching` from the root
    pub fn find_all_matching(&self, name: &str) -> Vec<NodeRef<'_>> {
        self.root().find_all_matching(name)
    }
}
