//! # spanscope
//!
//! Incremental in-memory index over a live stream of trace spans.
//!
//! Span records arrive out of order, may be re-emitted under the same
//! `span_id` as their status changes, and must be queryable the moment they
//! land. spanscope keeps four structures consistent after every record:
//!
//! - identity: `span_id` to latest record
//! - adjacency: parent id to child ids, in first-seen order
//! - trace rollups: root, duration, model, error count per `trace_id`
//! - timeline: every distinct span in first-seen order
//!
//! ## Quick Start
//!
//! ```ignore
//! use spanscope::prelude::*;
//!
//! let index = SpanIndex::new();
//! index.ingest(Span::new("t1", "conv").with_kind(SpanKind::Conversation));
//! index.ingest(Span::new("t1", "turn").with_parent("conv").with_data("model", "gpt-4o"));
//!
//! let snap = index.snapshot();
//! assert_eq!(snap.children_of(Some("conv")).len(), 1);
//! ```
//!
//! ## Live feed
//!
//! ```ignore
//! let index = Arc::new(SpanIndex::new());
//! let feed = LiveFeed::new(Arc::clone(&index));
//! StreamClient::new(FeedConfig::default()).run(&feed, &stop);
//! ```

#![warn(missing_docs)]

pub mod prelude;

pub use spanscope_core::{
    Error, HistorySource, Result, Span, SpanData, SpanKind, SpanStatus, SpanValue, TraceInfo,
};
pub use spanscope_feed::{
    Backoff, EventOutcome, FeedConfig, FeedStatus, HttpHistory, JsonLinesHistory, LiveFeed,
    SseDecoder, SseEvent, StreamClient, CONNECTION_LOST,
};
pub use spanscope_index::{IndexChange, IndexSnapshot, SpanIndex, SpanIndexBuilder, SubscriptionId};
