//! Live stream and history collaborators for spanscope
//!
//! The index itself never performs I/O. This crate connects it to a span
//! server:
//! - FeedConfig: where the server lives (TOML)
//! - HttpHistory / JsonLinesHistory: bootstrap batches
//! - SseDecoder: `text/event-stream` framing
//! - LiveFeed: connection state and event-to-ingest glue
//! - StreamClient: blocking transport with reconnect backoff

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backoff;
pub mod config;
pub mod history;
pub mod live;
pub mod sse;
pub mod stream;

#[cfg(test)]
mod test_server;

pub use backoff::Backoff;
pub use config::FeedConfig;
pub use history::{HttpHistory, JsonLinesHistory};
pub use live::{EventOutcome, FeedStatus, LiveFeed, CONNECTION_LOST, SPAN_EVENT};
pub use sse::{SseDecoder, SseEvent};
pub use stream::{SessionStats, StreamClient};
