//! Server-sent events decoder
//!
//! Incremental decoder for `text/event-stream` bodies. The span server frames
//! each record as:
//!
//! ```text
//! id: 42
//! event: span
//! data: {"ts": "...", "span_id": "...", ...}
//!
//! ```
//!
//! and sends `: ping` comments as keepalives. Only `id`, `event` and `data`
//! fields are interpreted; `retry` and unknown fields are ignored.

/// Event name used when a frame carries no `event:` field
pub const DEFAULT_EVENT: &str = "message";

/// One dispatched event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Last event id seen on the stream, if any
    pub id: Option<String>,
    /// Event name
    pub event: String,
    /// Payload; multiple `data:` lines joined with `\n`
    pub data: String,
}

/// Line-oriented SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    last_id: Option<String>,
    event: Option<String>,
    data: String,
    has_data: bool,
    discarding: bool,
    pending: String,
}

impl SseDecoder {
    /// Create a decoder with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its terminator); returns an event on a blank line
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            if self.discarding {
                self.discarding = false;
                self.reset_frame();
                return None;
            }
            return self.dispatch();
        }
        if self.discarding || line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    /// Feed an arbitrary chunk of the body; partial lines are buffered
    pub fn feed(&mut self, chunk: &str) -> Vec<SseEvent> {
        self.pending.push_str(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            if let Some(event) = self.feed_line(&line[..line.len() - 1]) {
                events.push(event);
            }
        }
        events
    }

    /// Drop the frame being assembled, including any lines that follow up
    /// to its terminating blank line
    ///
    /// Used when a line of the frame could not be read, so a partial payload
    /// is never dispatched.
    pub fn discard_frame(&mut self) {
        self.discarding = true;
        self.reset_frame();
    }

    /// Last event id seen, for resuming
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    fn reset_frame(&mut self) {
        self.event = None;
        self.data.clear();
        self.has_data = false;
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        Some(SseEvent {
            id: self.last_id.clone(),
            event: event.unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data: std::mem::take(&mut self.data),
        })
    }
}
