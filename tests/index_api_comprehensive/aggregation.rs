//! Trace Aggregation Tests
//!
//! Rollups kept per trace:
//! - Root span and its duration
//! - Sticky model name from the first qualifying turn
//! - Error count over distinct spans
//! - Start timestamp of the first span seen

use crate::*;

// =============================================================================
// ROOT AND DURATION
// =============================================================================

#[test]
fn test_root_and_duration_follow_root_record() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "child", Some("root"), 5));
    assert!(index.trace("t1").unwrap().root_span_id.is_none());

    index.ingest(span("t1", "root", None, 0).with_status(SpanStatus::Running));
    let info = index.trace("t1").unwrap();
    assert_eq!(info.root_span_id.as_deref(), Some("root"));
    assert_eq!(info.duration_ms, None);

    index.ingest(span("t1", "root", None, 0).with_duration_ms(1234.5));
    assert_eq!(index.trace("t1").unwrap().duration_ms, Some(1234.5));
}

#[test]
fn test_conversation_rollup() {
    let index = index_with_conversation("t1");
    let snap = index.snapshot();
    let info = snap.trace("t1").unwrap();

    assert_eq!(info.root_span_id.as_deref(), Some("conv"));
    assert_eq!(info.duration_ms, Some(1700.0));
    assert_eq!(info.model, "gpt-4o");
    assert_eq!(info.error_count, 1);
    assert_eq!(info.span_count(), 4);
    assert_eq!(info.start_ts, ts(0));
    assert_eq!(snap.trace_status("t1"), Some(SpanStatus::Ok));
}

#[test]
fn test_trace_status_running_until_root_closes() {
    let index = SpanIndex::new();
    let records = conversation("t1");
    index.ingest_batch(records[..7].to_vec());
    assert_eq!(index.snapshot().trace_status("t1"), Some(SpanStatus::Running));
}

// =============================================================================
// MODEL
// =============================================================================

#[test]
fn test_model_from_first_turn_is_sticky() {
    let index = SpanIndex::new();
    index.ingest(
        span("t1", "turn1", Some("root"), 0)
            .with_kind(SpanKind::Turn)
            .with_data("model", "claude-sonnet"),
    );
    index.ingest(
        span("t1", "turn2", Some("root"), 10)
            .with_kind(SpanKind::Turn)
            .with_data("model", "gpt-4o"),
    );
    assert_eq!(index.trace("t1").unwrap().model, "claude-sonnet");
}

#[test]
fn test_model_ignored_on_non_turn_spans() {
    let index = SpanIndex::new();
    index.ingest(
        span("t1", "llm", Some("turn"), 0)
            .with_kind(SpanKind::Llm)
            .with_data("model", "gpt-4o"),
    );
    assert!(!index.trace("t1").unwrap().has_model());

    index.ingest(
        span("t1", "turn", None, 0)
            .with_kind(SpanKind::Turn)
            .with_data("model", "o3"),
    );
    assert_eq!(index.trace("t1").unwrap().model, "o3");
}

#[test]
fn test_falsy_model_not_captured() {
    let index = SpanIndex::new();
    index.ingest(
        span("t1", "turn", None, 0)
            .with_kind(SpanKind::Turn)
            .with_data("model", ""),
    );
    assert_eq!(index.trace("t1").unwrap().model, "");

    // The same turn re-emitted with a real model still qualifies
    index.ingest(
        span("t1", "turn", None, 0)
            .with_kind(SpanKind::Turn)
            .with_data("model", "gpt-4o-mini"),
    );
    assert_eq!(index.trace("t1").unwrap().model, "gpt-4o-mini");
}

#[test]
fn test_model_arriving_on_closing_record() {
    // The producer attaches the model when the turn closes
    let index = index_with_conversation("t1");
    let turn = index.span("turn").unwrap();
    assert_eq!(turn.data.model().as_deref(), Some("gpt-4o"));
    assert_eq!(index.trace("t1").unwrap().model, "gpt-4o");
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_error_counted_once_per_span() {
    let index = SpanIndex::new();
    let failing = span("t1", "tool", Some("turn"), 0).with_error("timeout");
    index.ingest(failing.clone());
    index.ingest(failing.clone());
    index.ingest(failing);
    assert_eq!(index.trace("t1").unwrap().error_count, 1);

    index.ingest(span("t1", "tool2", Some("turn"), 0).with_error("refused"));
    assert_eq!(index.trace("t1").unwrap().error_count, 2);
}

#[test]
fn test_running_to_error_transition_counts() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "llm", None, 0).with_status(SpanStatus::Running));
    assert_eq!(index.trace("t1").unwrap().error_count, 0);

    index.ingest(span("t1", "llm", None, 0).with_error("rate limited"));
    let info = index.trace("t1").unwrap();
    assert_eq!(info.error_count, 1);
    assert!(info.has_errors());
}

#[test]
fn test_error_recovery_keeps_count_and_reentry_counts_again() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "s", None, 0).with_error("first"));
    index.ingest(span("t1", "s", None, 0).with_status(SpanStatus::Ok));
    assert_eq!(index.trace("t1").unwrap().error_count, 1);

    index.ingest(span("t1", "s", None, 0).with_error("second"));
    assert_eq!(index.trace("t1").unwrap().error_count, 2);
}

// =============================================================================
// START TIME AND ORDERING
// =============================================================================

#[test]
fn test_start_ts_is_first_seen_not_earliest() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "late", Some("root"), 500));
    index.ingest(span("t1", "root", None, 0));

    assert_eq!(index.trace("t1").unwrap().start_ts, ts(500));
}

#[test]
fn test_traces_newest_first() {
    let index = SpanIndex::new();
    index.ingest(span("old", "a", None, 0));
    index.ingest(span("new", "b", None, 2_000));
    index.ingest(span("mid", "c", None, 1_000));

    let snap = index.snapshot();
    let order: Vec<&str> = snap
        .traces_newest_first(None)
        .iter()
        .map(|t| t.trace_id.as_str())
        .collect();
    assert_eq!(order, vec!["new", "mid", "old"]);
    assert_eq!(snap.traces_newest_first(Some(1)).len(), 1);
}
