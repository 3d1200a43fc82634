//! Primitive types for spanscope
//!
//! This module defines the canonical data structures shared by the index and
//! the feed crates.
//!
//! ## Design Principle
//!
//! - **spanscope-core** defines canonical semantic types (this module)
//! - **spanscope-index** owns all mutation of indexed state
//! - **spanscope-feed** decodes records at the I/O boundary

pub mod span;
pub mod trace;

// Re-export all types at module level
pub use span::{Span, SpanKind, SpanStatus};
pub use trace::TraceInfo;
