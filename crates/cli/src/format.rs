//! Output formatting.
//!
//! Human mode prints aligned tables and indented trees; JSON mode prints the
//! underlying records so output can be piped into other tools.

use serde::Serialize;
use spanscope_core::{Span, SpanStatus, TraceInfo};
use spanscope_index::IndexSnapshot;
use std::collections::HashSet;

/// How results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Trace list, newest first.
pub fn format_traces(snap: &IndexSnapshot, limit: Option<usize>, mode: OutputMode) -> String {
    let traces = snap.traces_newest_first(limit);
    match mode {
        OutputMode::Json => to_json(&traces),
        OutputMode::Human => {
            if traces.is_empty() {
                return "(empty)".to_string();
            }
            let mut out = format!(
                "{:<24} {:<20} {:>5} {:>6} {:>10}  {:<7} {}",
                "TRACE", "STARTED", "SPANS", "ERRORS", "DURATION", "STATUS", "MODEL"
            );
            for info in traces {
                out.push('\n');
                out.push_str(&format_trace_row(info, snap.trace_status(&info.trace_id)));
            }
            out
        }
    }
}

fn format_trace_row(info: &TraceInfo, status: Option<SpanStatus>) -> String {
    format!(
        "{:<24} {:<20} {:>5} {:>6} {:>10}  {:<7} {}",
        info.trace_id,
        info.start_ts.format("%Y-%m-%d %H:%M:%S"),
        info.span_count(),
        info.error_count,
        format_duration(info.duration_ms),
        status.map(|s| s.as_str()).unwrap_or("-"),
        if info.has_model() { info.model.as_str() } else { "-" },
    )
}

/// Span tree of one trace, or `None` if the trace is unknown.
///
/// Spans whose parent has not arrived are printed as extra roots. Spans
/// caught in a parent cycle, and so reachable from no root, are printed as
/// roots too, in first-seen order.
pub fn format_tree(snap: &IndexSnapshot, trace_id: &str, mode: OutputMode) -> Option<String> {
    let members = snap.spans_of_trace(trace_id);
    if members.is_empty() {
        return None;
    }

    let mut ordered: Vec<(usize, &Span)> = Vec::with_capacity(members.len());
    let mut printed: HashSet<&str> = HashSet::with_capacity(members.len());
    let tops = members.iter().filter(|s| is_top(snap, s));
    let cyclic = members.iter().filter(|s| !is_top(snap, s));
    for top in tops.chain(cyclic) {
        if printed.contains(top.span_id.as_str()) {
            continue;
        }
        let mut depths: Vec<(&str, usize)> = Vec::new();
        for span in snap.trace_tree(&top.span_id) {
            if !printed.insert(&span.span_id) {
                continue;
            }
            let depth = span
                .parent_id
                .as_deref()
                .and_then(|p| depths.iter().rev().find(|(id, _)| *id == p))
                .map(|(_, d)| d + 1)
                .unwrap_or(0);
            depths.push((&span.span_id, depth));
            ordered.push((depth, span));
        }
    }

    Some(match mode {
        OutputMode::Json => {
            let spans: Vec<&Span> = ordered.iter().map(|(_, s)| *s).collect();
            to_json(&spans)
        }
        OutputMode::Human => ordered
            .iter()
            .map(|(depth, span)| format!("{}{}", "  ".repeat(*depth), format_span(span)))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn is_top(snap: &IndexSnapshot, span: &Span) -> bool {
    match span.parent_id.as_deref() {
        None => true,
        Some(parent) => snap.span(parent).is_none(),
    }
}

/// One span on one line.
pub fn format_span(span: &Span) -> String {
    let mut line = format!(
        "{} [{}] {} {}",
        span.name,
        span.kind,
        span.status,
        format_duration(span.duration_ms)
    );
    if let Some(model) = span.data.model() {
        line.push_str(&format!(" model={}", model));
    }
    if let Some(error) = &span.error {
        line.push_str(&format!(" error={:?}", error));
    }
    line
}

/// A live span as it arrives.
pub fn format_live_span(span: &Span, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string(span).unwrap_or_else(|e| format_error(&e)),
        OutputMode::Human => format!(
            "{} {} {} {}",
            span.timestamp.format("%H:%M:%S%.3f"),
            span.trace_id,
            span.span_id,
            format_span(span)
        ),
    }
}

/// Milliseconds below one second, seconds above.
pub fn format_duration(duration_ms: Option<f64>) -> String {
    match duration_ms {
        None => "-".to_string(),
        Some(ms) if ms < 1000.0 => format!("{:.1}ms", ms),
        Some(ms) => format!("{:.2}s", ms / 1000.0),
    }
}

pub fn format_error(e: &dyn std::fmt::Display) -> String {
    format!("(error) {}", e)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format_error(&e))
}
