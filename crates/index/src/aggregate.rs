//! Trace rollup rules
//!
//! Folds one span record into its trace's [`TraceInfo`]. Runs inside the same
//! write as the identity/adjacency update, so the summary always agrees with
//! the span maps.
//!
//! ## Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `span_ids` | append on first sighting of the span id only |
//! | `root_span_id`, `duration_ms` | overwritten by every record with no parent |
//! | `model` | first truthy `data.model` on a `turn` span; sticky |
//! | `error_count` | +1 when a span enters `error`; re-emitting an errored span is a no-op |
//! | `start_ts` | set at creation, never touched here |

use spanscope_core::{Span, SpanKind, SpanStatus, TraceInfo};

/// Fold `span` into `info`.
///
/// `previous` is the status of the record being replaced, `None` when this is
/// the first record for `span.span_id`.
pub(crate) fn fold(info: &mut TraceInfo, span: &Span, previous: Option<SpanStatus>) {
    if previous.is_none() {
        info.span_ids.push(span.span_id.clone());
    }

    if span.is_root() {
        info.root_span_id = Some(span.span_id.clone());
        info.duration_ms = span.duration_ms;
    }

    if span.kind == SpanKind::Turn && !info.has_model() {
        if let Some(model) = span.data.model() {
            info.model = model;
        }
    }

    if span.status.is_error() && previous != Some(SpanStatus::Error) {
        info.error_count = info.error_count.saturating_add(1);
    }
}
