//! ResourceArc Wrappers
//!
//! A built Document is never mutated again, so it is held directly in the
//! resource and read without locking from any scheduler thread.

use rustler::ResourceArc;

use crate::dom::Document;

/// Wrapper for Document that can be stored in a ResourceArc
pub struct DocumentResource {
    pub doc: Document,
}

impl DocumentResource {
    pub fn new(doc: Document) -> Self {
        DocumentResource { doc }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
