//! Trace summary types
//!
//! A trace is the set of spans sharing a `trace_id`. The index keeps one
//! [`TraceInfo`] per trace, updated incrementally as spans arrive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rollup summary for one trace
///
/// - `root_span_id` / `duration_ms` follow the latest record of the root span
/// - `span_ids` is in first-seen order, one entry per distinct span
/// - `model` is sticky: the first truthy `data.model` seen on a `turn` span
/// - `error_count` counts distinct spans that entered `error` status
/// - `start_ts` is the timestamp of the first span seen; never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceInfo {
    /// Trace ID
    pub trace_id: String,
    /// Root span ID, once the root has been seen
    pub root_span_id: Option<String>,
    /// Member span IDs in first-seen order
    pub span_ids: Vec<String>,
    /// Model name captured from the first qualifying turn span; empty if none
    pub model: String,
    /// Duration of the root span
    pub duration_ms: Option<f64>,
    /// Number of distinct spans in error status
    pub error_count: u32,
    /// Timestamp of the first span seen
    pub start_ts: DateTime<Utc>,
}

impl TraceInfo {
    /// Create an empty summary for a trace first seen at `start_ts`
    pub fn new(trace_id: impl Into<String>, start_ts: DateTime<Utc>) -> Self {
        Self {
            trace_id: trace_id.into(),
            root_span_id: None,
            span_ids: Vec::new(),
            model: String::new(),
            duration_ms: None,
            error_count: 0,
            start_ts,
        }
    }

    /// Number of distinct spans in the trace
    pub fn span_count(&self) -> usize {
        self.span_ids.len()
    }

    /// Check if a model has been captured
    pub fn has_model(&self) -> bool {
        !self.model.is_empty()
    }

    /// Check if any span in the trace is errored
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
