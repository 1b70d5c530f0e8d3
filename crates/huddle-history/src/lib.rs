//! Per-participant conversation history with optimistic concurrency.
//!
//! Histories are stored as one versioned document per (workspace, participant)
//! pair. Every mutation goes through [`OptimisticAppend`], a bounded
//! read-merge-write loop that retries on write conflicts with a randomized
//! backoff.

pub mod document;
pub mod error;
pub mod file;
pub mod history;
pub mod retry;
pub mod store;

/// Document and key types.
pub use document::{HistoryDocument, HistoryKey, Versioned};
/// History error type.
pub use error::HistoryError;
/// File-backed document store.
pub use file::FileDocumentStore;
/// High-level history operations.
pub use history::ChatHistoryStore;
/// Retry policy and the optimistic-append utility.
pub use retry::{OptimisticAppend, RetryPolicy};
/// Store abstraction and the in-memory implementation.
pub use store::{DocumentStore, InMemoryDocumentStore, open_document_store};
