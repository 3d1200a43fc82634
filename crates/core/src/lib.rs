//! Core types for spanscope
//!
//! This crate defines the fundamental types used throughout the system:
//! - [`Span`]: one timed unit of work, identified by `span_id`
//! - [`TraceInfo`]: rollup summary of all spans sharing a `trace_id`
//! - [`SpanValue`] / [`SpanData`]: the primitive attribute bag on a span
//! - [`HistorySource`]: boundary trait for bootstrap batches
//! - [`Error`]: errors raised at the I/O boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod primitives;
pub mod source;
pub mod value;

pub use error::{Error, Result};
pub use primitives::{Span, SpanKind, SpanStatus, TraceInfo};
pub use source::HistorySource;
pub use value::{SpanData, SpanValue};
