//! The span index
//!
//! [`SpanIndex`] is the single writer over the identity map, adjacency map,
//! trace map and timeline. Every mutating call derives the next
//! [`IndexSnapshot`] and publishes it atomically; readers take an
//! `Arc<IndexSnapshot>` and never observe a half-applied ingest.
//!
//! ## Write Sequence
//!
//! ```text
//! 1. Acquire write lock (serializes writers and their notifications)
//! 2. Take the published snapshot for writing
//! 3. Arc::make_mut - clones only if a reader still holds this version
//! 4. Fold the record(s) into identity / adjacency / trace / timeline
//! 5. Bump version, release the snapshot (readers now see the change)
//! 6. Notify subscribers
//! 7. Release write lock
//! ```
//!
//! Ingestion is O(1) amortized while no reader pins an old snapshot. A reader
//! holding a snapshot across writes costs the writer one clone per write.

use crate::change::{IndexChange, Listeners, SubscriptionId};
use crate::snapshot::IndexSnapshot;
use parking_lot::{Mutex, RwLock};
use spanscope_core::{HistorySource, Span, TraceInfo};
use std::sync::Arc;

/// Incrementally maintained index over a stream of spans
///
/// Construct one per data source and pass it where needed; there is no
/// process-wide instance.
///
/// # Example
///
/// ```ignore
/// let index = SpanIndex::new();
/// index.ingest(span);
/// let snap = index.snapshot();
/// let children = snap.children_of(Some("sp_root"));
/// ```
pub struct SpanIndex {
    /// Currently published snapshot
    current: RwLock<Arc<IndexSnapshot>>,
    /// Serializes writers so notifications go out in version order
    write_lock: Mutex<()>,
    listeners: Listeners,
    span_capacity: usize,
    trace_capacity: usize,
}

impl SpanIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for capacity hints
    pub fn builder() -> SpanIndexBuilder {
        SpanIndexBuilder::new()
    }

    /// Current snapshot
    ///
    /// Cheap: clones an `Arc`. The snapshot stays valid and unchanged for as
    /// long as it is held.
    ///
    /// While any snapshot is alive, the next write cannot update in place and
    /// copies the whole index first (O(n) in spans held). Drop snapshots
    /// once the read is done rather than keeping them across ingests.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Version of the current snapshot
    pub fn version(&self) -> u64 {
        self.current.read().version()
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Ingest one span record
    ///
    /// A new `span_id` is appended to the timeline, its parent's adjacency
    /// bucket and its trace's span list. A known `span_id` replaces the stored
    /// record in place and touches none of the ordered structures. The trace
    /// summary is updated in the same publish either way.
    pub fn ingest(&self, span: Span) {
        let _write = self.write_lock.lock();

        let (applied, version) = {
            let mut current = self.current.write();
            let snap = Arc::make_mut(&mut *current);
            let applied = snap.apply(span);
            (applied, snap.advance())
        };

        tracing::debug!(
            span_id = %applied.span_id,
            trace_id = %applied.trace_id,
            inserted = applied.inserted,
            version,
            "Ingested span"
        );

        self.listeners.notify(&IndexChange::Ingested {
            span_id: applied.span_id,
            trace_id: applied.trace_id,
            inserted: applied.inserted,
            version,
        });
    }

    /// Ingest records in order, publishing once at the end
    ///
    /// Equivalent to calling [`ingest`](Self::ingest) per record, except that
    /// readers see either none or all of the batch. Returns the number of
    /// records ingested.
    pub fn ingest_batch<I>(&self, spans: I) -> usize
    where
        I: IntoIterator<Item = Span>,
    {
        let _write = self.write_lock.lock();

        let (count, inserted, version) = {
            let mut current = self.current.write();
            let snap = Arc::make_mut(&mut *current);
            let mut count = 0;
            let mut inserted = 0;
            for span in spans {
                if snap.apply(span).inserted {
                    inserted += 1;
                }
                count += 1;
            }
            (count, inserted, snap.advance())
        };

        tracing::debug!(spans = count, inserted, version, "Ingested batch");

        self.listeners.notify(&IndexChange::BatchIngested {
            spans: count,
            inserted,
            version,
        });
        count
    }

    // ========================================================================
    // Reset and bulk load
    // ========================================================================

    /// Reset every structure to empty
    ///
    /// Snapshots already handed out keep their contents.
    pub fn clear(&self) {
        let _write = self.write_lock.lock();

        let version = {
            let mut current = self.current.write();
            let mut fresh = current.emptied(self.span_capacity, self.trace_capacity);
            let version = fresh.advance();
            *current = Arc::new(fresh);
            version
        };

        tracing::info!(version, "Cleared span index");
        self.listeners.notify(&IndexChange::Cleared { version });
    }

    /// Fetch a history batch and ingest it on top of the current contents
    ///
    /// A failed fetch is logged and treated as an empty batch; the index is
    /// left untouched. Returns the number of records ingested.
    pub fn load_history(&self, source: &dyn HistorySource) -> usize {
        match source.fetch() {
            Ok(spans) => {
                let count = self.ingest_batch(spans);
                tracing::info!(source = %source.describe(), spans = count, "Loaded history");
                count
            }
            Err(e) => {
                tracing::warn!(source = %source.describe(), error = %e, "Failed to load history");
                0
            }
        }
    }

    /// Replace the index with a freshly fetched history batch
    ///
    /// Used when a live connection is (re)established. The fetch happens
    /// first; only on success is the index cleared and rebuilt, published as
    /// one snapshot. On failure the prior contents stay in place.
    pub fn reload(&self, source: &dyn HistorySource) -> usize {
        let spans = match source.fetch() {
            Ok(spans) => spans,
            Err(e) => {
                tracing::warn!(
                    source = %source.describe(),
                    error = %e,
                    "Failed to reload history, keeping current index"
                );
                return 0;
            }
        };

        let _write = self.write_lock.lock();

        let (count, version) = {
            let mut current = self.current.write();
            let mut fresh = current.emptied(
                self.span_capacity.max(spans.len()),
                self.trace_capacity,
            );
            let count = spans.len();
            for span in spans {
                fresh.apply(span);
            }
            let version = fresh.advance();
            *current = Arc::new(fresh);
            (count, version)
        };

        tracing::info!(source = %source.describe(), spans = count, version, "Reloaded span index");
        self.listeners.notify(&IndexChange::Reloaded { spans: count, version });
        count
    }

    // ========================================================================
    // Convenience queries (owned results)
    // ========================================================================

    /// Latest record for a span id
    pub fn span(&self, span_id: &str) -> Option<Span> {
        self.current.read().span(span_id).cloned()
    }

    /// Summary for a trace id
    pub fn trace(&self, trace_id: &str) -> Option<TraceInfo> {
        self.current.read().trace(trace_id).cloned()
    }

    /// Children of `parent_id` (roots for `None`) in first-seen order
    pub fn children_of(&self, parent_id: Option<&str>) -> Vec<Span> {
        self.current
            .read()
            .children_of(parent_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Spans of a trace in first-seen order; empty for unknown traces
    pub fn spans_of_trace(&self, trace_id: &str) -> Vec<Span> {
        self.current
            .read()
            .spans_of_trace(trace_id)
            .into_iter()
            .cloned()
            .collect()
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Register a callback for every published change
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&IndexChange) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(callback))
    }

    /// Remove a callback; returns `false` if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}

impl Default for SpanIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpanIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.snapshot();
        f.debug_struct("SpanIndex")
            .field("version", &snap.version())
            .field("span_count", &snap.span_count())
            .field("trace_count", &snap.trace_count())
            .field("listeners", &self.listeners)
            .finish()
    }
}

/// Builder for [`SpanIndex`]
///
/// # Example
///
/// ```ignore
/// let index = SpanIndex::builder()
///     .span_capacity(10_000)
///     .trace_capacity(200)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpanIndexBuilder {
    span_capacity: usize,
    trace_capacity: usize,
}

impl SpanIndexBuilder {
    /// Create a builder with no pre-allocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected number of distinct spans
    pub fn span_capacity(mut self, capacity: usize) -> Self {
        self.span_capacity = capacity;
        self
    }

    /// Expected number of distinct traces
    pub fn trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }

    /// Build the index
    pub fn build(self) -> SpanIndex {
        SpanIndex {
            current: RwLock::new(Arc::new(IndexSnapshot::with_capacity(
                self.span_capacity,
                self.trace_capacity,
            ))),
            write_lock: Mutex::new(()),
            listeners: Listeners::default(),
            span_capacity: self.span_capacity,
            trace_capacity: self.trace_capacity,
        }
    }
}
