//! History sources
//!
//! Two [`HistorySource`] implementations used to bootstrap the index:
//!
//! - [`HttpHistory`]: `GET <base>/api/spans/history`, body `{"spans": [...]}`
//! - [`JsonLinesHistory`]: a file with one span record per line, as written
//!   by the producer's file exporter
//!
//! Both decode record by record. A malformed record is logged and skipped so
//! one bad line never costs the whole batch.

use crate::config::FeedConfig;
use serde::Deserialize;
use spanscope_core::{Error, HistorySource, Result, Span};
use std::path::{Path, PathBuf};

/// Decode a batch of raw JSON records, skipping the ones that don't parse
pub(crate) fn decode_records<I>(origin: &str, records: I) -> Vec<Span>
where
    I: IntoIterator<Item = serde_json::Value>,
{
    let mut spans = Vec::new();
    for (position, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Span>(record) {
            Ok(span) => spans.push(span),
            Err(e) => {
                tracing::warn!(origin, position, error = %e, "Skipping malformed span record");
            }
        }
    }
    spans
}

/// Map a ureq failure into our error type
pub(crate) fn http_error(url: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, _) => Error::Http(format!("{} returned status {}", url, code)),
        ureq::Error::Transport(transport) => Error::Http(format!("{}: {}", url, transport)),
    }
}

/// Build the blocking HTTP agent shared by history and stream requests
pub(crate) fn agent(config: &FeedConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(config.connect_timeout())
        .timeout_read(config.read_timeout())
        .build()
}

#[derive(Debug, Deserialize)]
struct HistoryBody {
    #[serde(default)]
    spans: Vec<serde_json::Value>,
}

// ============================================================================
// HTTP
// ============================================================================

/// History fetched from the span server
#[derive(Debug, Clone)]
pub struct HttpHistory {
    url: String,
    agent: ureq::Agent,
}

impl HttpHistory {
    /// Build from feed configuration
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_agent(config.history_url(), agent(config))
    }

    /// Build with an existing agent (shares its connection pool)
    pub fn with_agent(url: impl Into<String>, agent: ureq::Agent) -> Self {
        Self {
            url: url.into(),
            agent,
        }
    }

    /// Endpoint this source reads from
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HistorySource for HttpHistory {
    fn fetch(&self) -> Result<Vec<Span>> {
        let response = self
            .agent
            .get(&self.url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| http_error(&self.url, e))?;

        let body: HistoryBody = response
            .into_json()
            .map_err(|e| Error::Serialization(format!("{}: {}", self.url, e)))?;

        Ok(decode_records(&self.url, body.spans))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ============================================================================
// JSON Lines
// ============================================================================

/// History read from a JSON-Lines file
#[derive(Debug, Clone)]
pub struct JsonLinesHistory {
    path: PathBuf,
}

impl JsonLinesHistory {
    /// Read from `path` on every fetch
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this source reads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode a JSON-Lines document
    ///
    /// Blank lines are ignored. Lines that are not valid span records are
    /// logged with their 1-based line number and skipped.
    pub fn parse(origin: &str, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Span>(line) {
                Ok(span) => spans.push(span),
                Err(e) => {
                    tracing::warn!(origin, line = number + 1, error = %e, "Skipping malformed span line");
                }
            }
        }
        spans
    }
}

impl HistorySource for JsonLinesHistory {
    fn fetch(&self) -> Result<Vec<Span>> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(Self::parse(&self.describe(), &text))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
