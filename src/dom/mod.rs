//! DOM Module - Arena-based element tree
//!
//! Implements the tree the dispatcher builds:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for child links
//! - Explicit open-element stack while building
//! - Depth-first queries and markup output over the finished tree

pub mod builder;
pub mod document;
pub mod namespace;
pub mod node;
pub mod query;
pub mod serialize;

pub use builder::{TreeBuilder, TreeSink};
pub use document::{Document, NodeRef};
pub use node::{Node, NodeId, Shape};
pub use serialize::XML_PROLOGUE;
