//! Change notifications
//!
//! Observers register a callback with [`SpanIndex::subscribe`] and are told
//! about every published snapshot. Callbacks run on the writer's thread after
//! the new snapshot is visible, so `index.snapshot()` inside a callback
//! already reflects the change. Callbacks must not write to the index.
//!
//! [`SpanIndex::subscribe`]: crate::SpanIndex::subscribe

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A published change to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexChange {
    /// One span record was ingested
    Ingested {
        /// Span id of the record
        span_id: String,
        /// Trace the record belongs to
        trace_id: String,
        /// `true` on first sighting, `false` for an in-place replacement
        inserted: bool,
        /// Snapshot version that contains the change
        version: u64,
    },
    /// A batch of records was ingested in one publish
    BatchIngested {
        /// Records ingested
        spans: usize,
        /// Records that were first sightings
        inserted: usize,
        /// Snapshot version that contains the batch
        version: u64,
    },
    /// Every structure was reset to empty
    Cleared {
        /// Version of the empty snapshot
        version: u64,
    },
    /// The index was replaced by a freshly loaded history batch
    Reloaded {
        /// Records ingested from the batch
        spans: usize,
        /// Version of the reloaded snapshot
        version: u64,
    },
}

impl IndexChange {
    /// Snapshot version this change was published at
    pub fn version(&self) -> u64 {
        match self {
            IndexChange::Ingested { version, .. }
            | IndexChange::BatchIngested { version, .. }
            | IndexChange::Cleared { version }
            | IndexChange::Reloaded { version, .. } => *version,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&IndexChange) + Send + Sync>;

/// Registry of change callbacks
#[derive(Default)]
pub(crate) struct Listeners {
    entries: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl Listeners {
    pub(crate) fn add(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.write().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Invoke every callback
    ///
    /// The registry lock is released before any callback runs, so a callback
    /// may subscribe or unsubscribe.
    pub(crate) fn notify(&self, change: &IndexChange) {
        let listeners: Vec<Listener> = self
            .entries
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.len()).finish()
    }
}
