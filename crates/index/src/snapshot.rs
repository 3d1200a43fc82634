//! Immutable view of the span index
//!
//! An [`IndexSnapshot`] holds all four indexed structures at one version:
//!
//! - identity map: `span_id -> Span` (latest record only)
//! - adjacency map: `parent_id | None -> [child span_id]` in first-seen order
//! - trace map: `trace_id -> TraceInfo`
//! - timeline: span ids in first-seen order, one entry per distinct span
//!
//! Snapshots handed to readers are never mutated. The writer in
//! [`SpanIndex`](crate::SpanIndex) derives the next version copy-on-write and
//! publishes it with a single pointer swap.

use crate::aggregate;
use rustc_hash::{FxHashMap, FxHashSet};
use spanscope_core::{Span, SpanStatus, TraceInfo};

/// Outcome of folding one record into a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Applied {
    pub span_id: String,
    pub trace_id: String,
    pub inserted: bool,
}

/// Point-in-time view of the span index
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    spans: FxHashMap<String, Span>,
    children: FxHashMap<Option<String>, Vec<String>>,
    traces: FxHashMap<String, TraceInfo>,
    timeline: Vec<String>,
    version: u64,
}

impl IndexSnapshot {
    /// Create an empty snapshot at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty snapshot with pre-allocated capacity
    pub(crate) fn with_capacity(spans: usize, traces: usize) -> Self {
        Self {
            spans: FxHashMap::with_capacity_and_hasher(spans, Default::default()),
            children: FxHashMap::with_capacity_and_hasher(spans, Default::default()),
            traces: FxHashMap::with_capacity_and_hasher(traces, Default::default()),
            timeline: Vec::with_capacity(spans),
            version: 0,
        }
    }

    // ========================================================================
    // Mutation (writer only)
    // ========================================================================

    /// Fold one record into every structure
    ///
    /// First sighting of a span id appends to the timeline, its parent's
    /// adjacency bucket and its trace's `span_ids`. Later sightings replace the
    /// identity entry only; adjacency is never rewritten, so a span that
    /// changes parent stays listed under the parent it first arrived with.
    pub(crate) fn apply(&mut self, span: Span) -> Applied {
        let previous = self.spans.get(&span.span_id).map(|s| s.status);
        let inserted = previous.is_none();

        if inserted {
            self.timeline.push(span.span_id.clone());
            self.children
                .entry(span.parent_id.clone())
                .or_default()
                .push(span.span_id.clone());
        }

        let info = self
            .traces
            .entry(span.trace_id.clone())
            .or_insert_with(|| TraceInfo::new(span.trace_id.clone(), span.timestamp));
        aggregate::fold(info, &span, previous);

        let applied = Applied {
            span_id: span.span_id.clone(),
            trace_id: span.trace_id.clone(),
            inserted,
        };
        self.spans.insert(span.span_id.clone(), span);
        applied
    }

    /// Bump the version; called once per publish
    pub(crate) fn advance(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Start a fresh, empty snapshot that continues this version sequence
    pub(crate) fn emptied(&self, spans: usize, traces: usize) -> Self {
        let mut next = Self::with_capacity(spans, traces);
        next.version = self.version;
        next
    }

    // ========================================================================
    // Raw structures
    // ========================================================================

    /// Monotonic version; increases on every published change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Identity map
    pub fn spans(&self) -> &FxHashMap<String, Span> {
        &self.spans
    }

    /// Adjacency map; the `None` bucket holds root spans
    pub fn children(&self) -> &FxHashMap<Option<String>, Vec<String>> {
        &self.children
    }

    /// Trace map
    pub fn traces(&self) -> &FxHashMap<String, TraceInfo> {
        &self.traces
    }

    /// Span ids in first-seen order
    pub fn timeline_ids(&self) -> &[String] {
        &self.timeline
    }

    /// Number of distinct spans
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Number of distinct traces
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Check if nothing has been ingested
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Latest record for a span id
    pub fn span(&self, span_id: &str) -> Option<&Span> {
        self.spans.get(span_id)
    }

    /// Summary for a trace id
    pub fn trace(&self, trace_id: &str) -> Option<&TraceInfo> {
        self.traces.get(trace_id)
    }

    /// Children of `parent_id` in first-seen order
    ///
    /// `None` returns root spans. Unknown parents yield an empty list; ids
    /// without a record are skipped.
    pub fn children_of(&self, parent_id: Option<&str>) -> Vec<&Span> {
        let key = parent_id.map(str::to_owned);
        self.children
            .get(&key)
            .map(|ids| self.resolve(ids))
            .unwrap_or_default()
    }

    /// Root spans (no parent) in first-seen order
    pub fn roots(&self) -> Vec<&Span> {
        self.children_of(None)
    }

    /// Spans of a trace in first-seen order; empty for unknown traces
    pub fn spans_of_trace(&self, trace_id: &str) -> Vec<&Span> {
        self.traces
            .get(trace_id)
            .map(|info| self.resolve(&info.span_ids))
            .unwrap_or_default()
    }

    /// Every span in first-seen order, each at its latest record
    ///
    /// One entry per span id: a record that replaces an earlier one keeps the
    /// earlier one's position and hides it. This is not a log of every record
    /// received; callers that need each update should subscribe to
    /// [`IndexChange`](crate::IndexChange) instead.
    pub fn timeline(&self) -> Vec<&Span> {
        self.resolve(&self.timeline)
    }

    /// The subtree rooted at `span_id`, flattened in pre-order
    ///
    /// Parent comes before its children; siblings keep first-seen order.
    /// Returns an empty list for an unknown span. Each span appears once even
    /// if the producer emitted a parent cycle.
    pub fn trace_tree(&self, span_id: &str) -> Vec<&Span> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack = vec![span_id];

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(span) = self.spans.get(id) else {
                continue;
            };
            out.push(span);
            if let Some(kids) = self.children.get(&Some(id.to_owned())) {
                stack.extend(kids.iter().rev().map(String::as_str));
            }
        }
        out
    }

    /// Trace summaries, newest `start_ts` first
    ///
    /// Ties are broken by trace id so the order is stable.
    pub fn traces_newest_first(&self, limit: Option<usize>) -> Vec<&TraceInfo> {
        let mut traces: Vec<&TraceInfo> = self.traces.values().collect();
        traces.sort_by(|a, b| {
            b.start_ts
                .cmp(&a.start_ts)
                .then_with(|| a.trace_id.cmp(&b.trace_id))
        });
        if let Some(n) = limit {
            traces.truncate(n);
        }
        traces
    }

    /// Overall status of a trace, taken from its root span
    ///
    /// `None` when the trace is unknown or its root has not arrived yet.
    pub fn trace_status(&self, trace_id: &str) -> Option<SpanStatus> {
        let root = self.traces.get(trace_id)?.root_span_id.as_deref()?;
        self.spans.get(root).map(|s| s.status)
    }

    fn resolve<'a>(&'a self, ids: &'a [String]) -> Vec<&'a Span> {
        ids.iter().filter_map(|id| self.spans.get(id)).collect()
    }
}
