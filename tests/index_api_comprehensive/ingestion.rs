//! Ingestion Tests
//!
//! Identity map and timeline behavior:
//! - First sighting appends, re-emission replaces in place
//! - Timeline is first-seen order over distinct span ids
//! - Queries for unknown ids return empty, never fail

use crate::*;

#[test]
fn test_ingest_makes_span_visible() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "a", None, 0));

    let stored = index.span("a").unwrap();
    assert_eq!(stored.trace_id, "t1");
    assert_eq!(index.snapshot().span_count(), 1);
}

#[test]
fn test_reingest_replaces_record() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "a", None, 0).with_status(SpanStatus::Running));
    index.ingest(
        span("t1", "a", None, 0)
            .with_status(SpanStatus::Ok)
            .with_duration_ms(42.0),
    );

    let snap = index.snapshot();
    assert_eq!(snap.span_count(), 1);
    assert_eq!(snap.timeline_ids().len(), 1);
    assert_eq!(snap.roots().len(), 1);
    assert_eq!(snap.spans_of_trace("t1").len(), 1);

    let stored = snap.span("a").unwrap();
    assert_eq!(stored.status, SpanStatus::Ok);
    assert_eq!(stored.duration_ms, Some(42.0));
}

#[test]
fn test_identical_reingest_is_idempotent() {
    let once = SpanIndex::new();
    let twice = SpanIndex::new();
    let record = span("t1", "a", None, 0).with_error("boom");

    once.ingest(record.clone());
    twice.ingest(record.clone());
    twice.ingest(record);

    let (a, b) = (once.snapshot(), twice.snapshot());
    assert_eq!(a.timeline_ids(), b.timeline_ids());
    assert_eq!(a.trace("t1"), b.trace("t1"));
    assert_eq!(a.span("a"), b.span("a"));
}

#[test]
fn test_timeline_is_first_seen_order() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "b", Some("a"), 10));
    index.ingest(span("t2", "x", None, 0));
    index.ingest(span("t1", "a", None, 0));
    index.ingest(span("t1", "b", Some("a"), 20).with_status(SpanStatus::Error));

    let snap = index.snapshot();
    assert_eq!(ids(&snap.timeline()), vec!["b", "x", "a"]);
    // Timeline resolves to the latest record
    assert_eq!(snap.timeline()[0].status, SpanStatus::Error);
}

#[test]
fn test_timeline_preserved_across_updates_of_conversation() {
    let index = index_with_conversation("t1");
    assert_eq!(
        ids(&index.snapshot().timeline()),
        vec!["conv", "turn", "llm", "tool"]
    );
}

#[test]
fn test_unknown_ids_return_empty() {
    let index = index_with_conversation("t1");
    let snap = index.snapshot();

    assert!(snap.span("nope").is_none());
    assert!(snap.trace("nope").is_none());
    assert!(snap.children_of(Some("nope")).is_empty());
    assert!(snap.spans_of_trace("nope").is_empty());
    assert!(snap.trace_tree("nope").is_empty());
    assert!(snap.trace_status("nope").is_none());

    assert!(index.span("nope").is_none());
    assert!(index.children_of(Some("nope")).is_empty());
    assert!(index.spans_of_trace("nope").is_empty());
}

#[test]
fn test_empty_index_queries() {
    let index = SpanIndex::new();
    let snap = index.snapshot();

    assert!(snap.is_empty());
    assert_eq!(snap.version(), 0);
    assert!(snap.roots().is_empty());
    assert!(snap.timeline().is_empty());
    assert!(snap.traces_newest_first(None).is_empty());
}

#[test]
fn test_batch_equals_individual_ingest() {
    let single = index_with_conversation("t1");
    let batch = SpanIndex::new();
    assert_eq!(batch.ingest_batch(conversation("t1")), 8);

    let (a, b) = (single.snapshot(), batch.snapshot());
    assert_eq!(a.timeline_ids(), b.timeline_ids());
    assert_eq!(a.trace("t1"), b.trace("t1"));
    for id in a.timeline_ids() {
        assert_eq!(a.span(id), b.span(id));
    }
    assert_eq!(a.version(), 8);
    assert_eq!(b.version(), 1);
}

#[test]
fn test_span_round_trips_through_wire_format() {
    let wire = r#"{
        "ts": "2026-01-05T10:00:00.250Z",
        "trace_id": "t1",
        "span_id": "llm-1",
        "parent_id": "turn-1",
        "name": "llm",
        "kind": "llm",
        "duration_ms": 380.5,
        "status": "ok",
        "data": {"model": "gpt-4o", "input_tokens": 812, "cached": false}
    }"#;
    let parsed: Span = serde_json::from_str(wire).unwrap();

    let index = SpanIndex::new();
    index.ingest(parsed);

    let stored = index.span("llm-1").unwrap();
    assert_eq!(stored.timestamp, ts(250));
    assert_eq!(stored.kind, SpanKind::Llm);
    assert_eq!(stored.data.model().as_deref(), Some("gpt-4o"));
    assert_eq!(index.children_of(Some("turn-1")).len(), 1);
}
