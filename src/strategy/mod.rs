//! Build Strategy Module
//!
//! - Single build: `sax::build`, one scanner pass on the calling thread
//! - Batch build: independent inputs built in parallel, one builder each

pub mod parallel;

pub use parallel::build_many;
