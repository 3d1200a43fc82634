//! Adjacency Tests
//!
//! Parent to child lookups:
//! - Children in first-seen order
//! - Children recorded before their parent arrives
//! - Roots under the `None` key
//! - Pre-order trace trees

use crate::*;

#[test]
fn test_children_in_first_seen_order() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "root", None, 0));
    index.ingest(span("t1", "c2", Some("root"), 30));
    index.ingest(span("t1", "c1", Some("root"), 10));
    index.ingest(span("t1", "c3", Some("root"), 20));

    // Arrival order, not timestamp order
    assert_eq!(
        ids(&index.snapshot().children_of(Some("root"))),
        vec!["c2", "c1", "c3"]
    );
}

#[test]
fn test_child_before_parent() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "child", Some("parent"), 10));

    let snap = index.snapshot();
    assert_eq!(ids(&snap.children_of(Some("parent"))), vec!["child"]);
    assert!(snap.span("parent").is_none());
    assert!(snap.roots().is_empty());

    index.ingest(span("t1", "parent", None, 0));
    let snap = index.snapshot();
    assert_eq!(ids(&snap.roots()), vec!["parent"]);
    assert_eq!(ids(&snap.children_of(Some("parent"))), vec!["child"]);
}

#[test]
fn test_update_does_not_duplicate_child() {
    let index = SpanIndex::new();
    for status in [SpanStatus::Running, SpanStatus::Ok, SpanStatus::Ok] {
        index.ingest(span("t1", "child", Some("root"), 10).with_status(status));
    }
    let children = index.children_of(Some("root"));
    assert_eq!(owned_ids(&children), vec!["child"]);
    assert_eq!(children[0].status, SpanStatus::Ok);
}

#[test]
fn test_reparented_span_stays_under_first_parent() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "child", Some("p1"), 0));
    index.ingest(span("t1", "child", Some("p2"), 0));

    let snap = index.snapshot();
    assert_eq!(ids(&snap.children_of(Some("p1"))), vec!["child"]);
    assert!(snap.children_of(Some("p2")).is_empty());
    // The record itself reflects the latest parent
    assert_eq!(snap.span("child").unwrap().parent_id.as_deref(), Some("p2"));
}

#[test]
fn test_roots_across_traces() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "r1", None, 0));
    index.ingest(span("t2", "r2", None, 0));
    index.ingest(span("t1", "c1", Some("r1"), 5));

    assert_eq!(owned_ids(&index.children_of(None)), vec!["r1", "r2"]);
}

#[test]
fn test_trace_tree_pre_order() {
    let index = index_with_conversation("t1");
    let snap = index.snapshot();

    assert_eq!(ids(&snap.trace_tree("conv")), vec!["conv", "turn", "llm", "tool"]);
    assert_eq!(ids(&snap.trace_tree("turn")), vec!["turn", "llm", "tool"]);
    assert_eq!(ids(&snap.trace_tree("tool")), vec!["tool"]);
}

#[test]
fn test_trace_tree_survives_parent_cycle() {
    let index = SpanIndex::new();
    index.ingest(span("t1", "a", Some("b"), 0));
    index.ingest(span("t1", "b", Some("a"), 0));

    let tree = index.snapshot().trace_tree("a").len();
    assert_eq!(tree, 2);
}

#[test]
fn test_spans_of_trace_isolated_per_trace() {
    let index = SpanIndex::new();
    index.ingest_batch(conversation("t1"));
    index.ingest_batch(
        conversation("t2")
            .into_iter()
            .map(|mut s| {
                s.span_id = format!("t2-{}", s.span_id);
                s.parent_id = s.parent_id.map(|p| format!("t2-{}", p));
                s
            }),
    );

    let snap = index.snapshot();
    assert_eq!(ids(&snap.spans_of_trace("t1")), vec!["conv", "turn", "llm", "tool"]);
    assert_eq!(
        ids(&snap.spans_of_trace("t2")),
        vec!["t2-conv", "t2-turn", "t2-llm", "t2-tool"]
    );
    assert_eq!(snap.trace_count(), 2);
}
