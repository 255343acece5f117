//! Core XML parsing primitives
//!
//! This module contains the building blocks the dispatcher is driven by:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: XML entity decoding with Cow (zero-copy when possible)
//! - UnifiedScanner: ScanHandler-based push scanner with well-formedness checks

pub mod entities;
pub mod scanner;
pub mod unified_scanner;
