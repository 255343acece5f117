//! SAX Module - scanner events to tree
//!
//! The dispatcher sits between the unified scanner and a `TreeSink`:
//!
//! ```text
//! UnifiedScanner ---> Dispatcher ---> TreeBuilder ---> Document
//! ```
//!
//! Owned `SaxEvent`s can be fed through the same dispatcher when the input
//! does not come from the byte scanner.

pub mod dispatcher;
pub mod events;

pub use dispatcher::{build, build_events, build_events_with, build_into, build_with, Dispatcher};
pub use events::SaxEvent;
