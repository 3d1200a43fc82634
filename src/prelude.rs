//! Convenient imports for spanscope.
//!
//! ```ignore
//! use spanscope::prelude::*;
//!
//! let index = SpanIndex::new();
//! index.ingest(Span::new("t1", "root"));
//! ```

// Index
pub use spanscope_index::{IndexChange, IndexSnapshot, SpanIndex};

// Records
pub use spanscope_core::{Span, SpanKind, SpanStatus, TraceInfo};

// Error handling
pub use spanscope_core::{Error, HistorySource, Result};

// Live feed
pub use spanscope_feed::{FeedConfig, JsonLinesHistory, LiveFeed, StreamClient};

// Re-export serde_json for convenience
pub use serde_json::json;
