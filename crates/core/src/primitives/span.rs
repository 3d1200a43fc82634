//! Span types for the span index
//!
//! A span is one timed unit of work inside a trace. Producers emit a span
//! when it starts (status `running`, no duration) and emit it again under the
//! same `span_id` when it finishes. The later record fully replaces the
//! earlier one.

use crate::value::{SpanData, SpanValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of work a span represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// A whole conversation; usually the root of a trace
    Conversation,
    /// One user/assistant exchange
    Turn,
    /// A model call
    Llm,
    /// A tool invocation
    Tool,
    /// Anything else
    #[default]
    Internal,
}

impl SpanKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Conversation => "conversation",
            SpanKind::Turn => "turn",
            SpanKind::Llm => "llm",
            SpanKind::Tool => "tool",
            SpanKind::Internal => "internal",
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    /// Started, not yet finished
    Running,
    /// Finished successfully
    #[default]
    Ok,
    /// Finished with an error
    Error,
}

impl SpanStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanStatus::Running => "running",
            SpanStatus::Ok => "ok",
            SpanStatus::Error => "error",
        }
    }

    /// Check if this is the error status
    pub fn is_error(&self) -> bool {
        matches!(self, SpanStatus::Error)
    }

    /// Check if the span has finished (ok or error)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SpanStatus::Running)
    }
}

impl fmt::Display for SpanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span record as emitted by a producer
///
/// `span_id` is the identity: a record arriving with an id that was already
/// seen is a replacement, never a new entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Emission time of this record
    #[serde(rename = "ts", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Trace this span belongs to
    pub trace_id: String,
    /// Unique span ID, reused on re-emission
    pub span_id: String,
    /// Parent span ID; `None` marks the root of the trace
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Human-readable operation name
    pub name: String,
    /// Category of work
    pub kind: SpanKind,
    /// Duration in milliseconds, `None` while the span is open
    #[serde(default)]
    pub duration_ms: Option<f64>,
    /// Lifecycle status
    pub status: SpanStatus,
    /// Free-form attributes
    #[serde(default)]
    pub data: SpanData,
    /// Error message when status is `error`
    #[serde(default)]
    pub error: Option<String>,
}

impl Span {
    /// Create a root `internal` span with status `ok`, stamped now
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            parent_id: None,
            name: String::new(),
            kind: SpanKind::default(),
            duration_ms: None,
            status: SpanStatus::default(),
            data: SpanData::new(),
            error: None,
        }
    }

    /// Set the parent span
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the operation name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: SpanKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: SpanStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the duration
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the emission timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set one attribute
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<SpanValue>) -> Self {
        self.data.insert(key, value);
        self
    }

    /// Mark as errored with a message
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.status = SpanStatus::Error;
        self.error = Some(message.into());
        self
    }

    /// Check if this span is the root of its trace
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
