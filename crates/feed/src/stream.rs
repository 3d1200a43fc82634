//! Blocking SSE transport
//!
//! [`StreamClient`] holds the connection to `<base>/api/spans/stream` and
//! drives a [`LiveFeed`]:
//!
//! ```text
//! loop:
//!   connect ── fail ──────────────────────────┐
//!     │ ok                                     │
//!   feed.on_open(history)   (bulk reload)      │
//!   read lines → SseDecoder → feed.on_event    │
//!     │ eof / read error / timeout             │
//!   feed.on_error() ◄──────────────────────────┘
//!   sleep(backoff)
//! ```
//!
//! The read timeout bounds how long a silent connection is trusted and how
//! long a stop request may take to be noticed.

use crate::backoff::Backoff;
use crate::config::FeedConfig;
use crate::history::{agent, http_error, HttpHistory};
use crate::live::{EventOutcome, LiveFeed};
use crate::sse::SseDecoder;
use spanscope_core::Result;
use std::io::{BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Granularity of the interruptible sleep between attempts
const STOP_POLL: Duration = Duration::from_millis(100);

/// Counters for one connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Records loaded by the bootstrap reload
    pub history: usize,
    /// Live records ingested
    pub ingested: usize,
    /// Live records dropped as malformed
    pub skipped: usize,
}

/// Connection to the span server's live stream
#[derive(Debug, Clone)]
pub struct StreamClient {
    config: FeedConfig,
    agent: ureq::Agent,
}

impl StreamClient {
    /// Build from feed configuration
    pub fn new(config: FeedConfig) -> Self {
        let agent = agent(&config);
        Self { config, agent }
    }

    /// Configuration in use
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// History source that shares this client's agent
    pub fn history(&self) -> HttpHistory {
        HttpHistory::with_agent(self.config.history_url(), self.agent.clone())
    }

    /// Connect once and pump events into `feed` until the stream ends
    ///
    /// Returns `Err` when the connection cannot be established or a read
    /// fails. A clean end of stream returns the session counters. Either way
    /// the caller is expected to report the drop with `feed.on_error()`.
    pub fn run_once(&self, feed: &LiveFeed, stop: &AtomicBool) -> Result<SessionStats> {
        let url = self.config.stream_url();
        let response = self
            .agent
            .get(&url)
            .set("Accept", "text/event-stream")
            .set("Cache-Control", "no-cache")
            .call()
            .map_err(|e| http_error(&url, e))?;

        let mut stats = SessionStats {
            history: feed.on_open(&self.history()),
            ..SessionStats::default()
        };

        let mut reader = BufReader::new(response.into_reader());
        let mut decoder = SseDecoder::new();
        let mut buf = Vec::new();

        while !stop.load(Ordering::Relaxed) {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                tracing::debug!(url = %url, "Stream closed by server");
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    // Drop only the frame this line belongs to
                    decoder.discard_frame();
                    feed.on_unreadable(&e);
                    stats.skipped += 1;
                    continue;
                }
            };
            let Some(event) = decoder.feed_line(line.trim_end_matches('\n')) else {
                continue;
            };
            match feed.on_event(&event) {
                EventOutcome::Ingested => stats.ingested += 1,
                EventOutcome::Skipped => stats.skipped += 1,
                EventOutcome::Ignored => {}
            }
        }
        Ok(stats)
    }

    /// Follow the stream until `stop` is set, reconnecting with backoff
    pub fn run(&self, feed: &LiveFeed, stop: &AtomicBool) {
        let mut backoff = Backoff::from_config(&self.config);

        while !stop.load(Ordering::Relaxed) {
            match self.run_once(feed, stop) {
                Ok(stats) => {
                    tracing::info!(
                        history = stats.history,
                        ingested = stats.ingested,
                        skipped = stats.skipped,
                        "Stream session ended"
                    );
                    backoff.reset();
                }
                Err(e) => {
                    tracing::warn!(url = %self.config.stream_url(), error = %e, "Stream failed");
                }
            }
            if stop.load(Ordering::Relaxed) {
                break;
            }

            feed.on_error();
            let delay = backoff.next_delay();
            tracing::info!(delay_ms = delay.as_millis() as u64, "Reconnecting");
            sleep_unless_stopped(delay, stop);
        }

        feed.disconnect();
    }
}

fn sleep_unless_stopped(delay: Duration, stop: &AtomicBool) {
    let mut remaining = delay;
    while !remaining.is_zero() && !stop.load(Ordering::Relaxed) {
        let step = remaining.min(STOP_POLL);
        std::thread::sleep(step);
        remaining -= step;
    }
}
