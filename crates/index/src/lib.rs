//! Span index for spanscope
//!
//! This crate implements the incremental indexing engine with:
//! - SpanIndex: single-writer index over a live span stream
//! - IndexSnapshot: immutable, versioned view for readers
//! - Trace rollups (root, duration, model, error count) kept in the same write
//! - Change notifications for observers
//!
//! Records may arrive in any order and may be re-emitted under the same
//! `span_id`; every structure stays consistent after each ingest without a
//! recomputation pass over history.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod aggregate;
pub mod change;
pub mod index;
pub mod snapshot;

pub use change::{IndexChange, SubscriptionId};
pub use index::{SpanIndex, SpanIndexBuilder};
pub use snapshot::IndexSnapshot;
