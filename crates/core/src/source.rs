//! Boundary trait for historical span sources
//!
//! The index bootstraps itself from a finite batch of past spans before
//! resuming live ingestion. Where the batch comes from (an HTTP endpoint, a
//! JSON-Lines file, a fixture) is the implementor's concern.

use crate::error::Result;
use crate::primitives::Span;

/// A finite, replayable batch of span records
///
/// `fetch` returns records in the order they should be ingested. No ordering
/// guarantee beyond that is required; the index converges regardless.
pub trait HistorySource {
    /// Fetch the full batch
    fn fetch(&self) -> Result<Vec<Span>>;

    /// Short label used in log lines
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl HistorySource for Vec<Span> {
    fn fetch(&self) -> Result<Vec<Span>> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory batch ({} spans)", self.len())
    }
}

impl<T: HistorySource + ?Sized> HistorySource for &T {
    fn fetch(&self) -> Result<Vec<Span>> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
