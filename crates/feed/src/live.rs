//! Live feed state
//!
//! [`LiveFeed`] sits between a stream transport and the index. The transport
//! reports three things and the feed reacts:
//!
//! | Transport signal | Feed reaction                                      |
//! |------------------|----------------------------------------------------|
//! | opened           | mark connected, clear error, reload history        |
//! | event            | decode `span` events and ingest; ignore the rest   |
//! | error / closed   | mark disconnected, surface a retrying message      |
//!
//! The reload on open completes before `on_open` returns, so a transport
//! that handles events on the same thread never interleaves live records
//! with the bulk load.

use crate::sse::SseEvent;
use parking_lot::RwLock;
use spanscope_core::{HistorySource, Span};
use spanscope_index::SpanIndex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Event name carrying span records
pub const SPAN_EVENT: &str = "span";

/// Message surfaced while the stream is down
pub const CONNECTION_LOST: &str = "Connection lost. Retrying...";

/// Connection state visible to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStatus {
    /// Stream is open
    pub connected: bool,
    /// Last connection problem, cleared on reconnect
    pub error: Option<String>,
    /// Live events dropped because they failed to decode
    pub skipped: u64,
}

/// What happened to one stream event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Decoded and ingested
    Ingested,
    /// Not a span event
    Ignored,
    /// A span event whose payload failed to decode
    Skipped,
}

/// Glue between a live stream and a [`SpanIndex`]
#[derive(Debug)]
pub struct LiveFeed {
    index: Arc<SpanIndex>,
    state: RwLock<(bool, Option<String>)>,
    skipped: AtomicU64,
}

impl LiveFeed {
    /// Feed records into `index`
    pub fn new(index: Arc<SpanIndex>) -> Self {
        Self {
            index,
            state: RwLock::new((false, None)),
            skipped: AtomicU64::new(0),
        }
    }

    /// Index this feed writes to
    pub fn index(&self) -> &Arc<SpanIndex> {
        &self.index
    }

    /// Stream opened: bootstrap from `history`, replacing current contents
    ///
    /// Returns the number of historical records loaded. A failed fetch keeps
    /// the current index and returns 0.
    pub fn on_open(&self, history: &dyn HistorySource) -> usize {
        *self.state.write() = (true, None);
        tracing::info!(source = %history.describe(), "Live feed connected");
        self.index.reload(history)
    }

    /// One event from the stream
    pub fn on_event(&self, event: &SseEvent) -> EventOutcome {
        if event.event != SPAN_EVENT {
            tracing::trace!(event = %event.event, "Ignoring non-span event");
            return EventOutcome::Ignored;
        }

        match serde_json::from_str::<Span>(&event.data) {
            Ok(span) => {
                self.index.ingest(span);
                EventOutcome::Ingested
            }
            Err(e) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    id = event.id.as_deref().unwrap_or("-"),
                    error = %e,
                    "Skipping malformed live span"
                );
                EventOutcome::Skipped
            }
        }
    }

    /// A frame the transport could not read (e.g. not valid UTF-8)
    ///
    /// Counted and logged like a malformed payload; the stream stays open.
    pub fn on_unreadable(&self, reason: &dyn std::fmt::Display) -> EventOutcome {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(error = %reason, "Skipping unreadable live event");
        EventOutcome::Skipped
    }

    /// Stream failed or closed; the transport will retry
    pub fn on_error(&self) {
        let mut state = self.state.write();
        if state.0 {
            tracing::warn!("Live feed connection lost");
        }
        *state = (false, Some(CONNECTION_LOST.to_string()));
    }

    /// Deliberate shutdown; no error is surfaced
    pub fn disconnect(&self) {
        *self.state.write() = (false, None);
        tracing::info!("Live feed disconnected");
    }

    /// Current connection state
    pub fn status(&self) -> FeedStatus {
        let (connected, error) = self.state.read().clone();
        FeedStatus {
            connected,
            error,
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Whether the stream is open
    pub fn is_connected(&self) -> bool {
        self.state.read().0
    }
}
