//! Store engine and handle traits.

use crate::document::Document;
use crate::error::StoreResult;
use crate::outcome::{BulkReadItem, WriteOutcome};
use crate::selector::Selector;
use async_trait::async_trait;
use std::sync::Arc;

/// Options applied when opening a store.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Whether to create the store when it does not exist yet.
    pub create_if_missing: bool,
}

impl OpenOptions {
    /// Creates the default options (create the store when missing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the store when it does not exist.
    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
        }
    }
}

/// A document store engine.
///
/// Engines hand out handles to named stores. An engine is composed into
/// the plugin explicitly - there is no ambient registry.
///
/// # Implementors
///
/// - [`MemoryEngine`](crate::MemoryEngine) - in-memory, for tests and
///   ephemeral stores
#[async_trait]
pub trait StoreEngine: Send + Sync {
    /// Opens a handle to the named store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreMissing`](crate::StoreError::StoreMissing)
    /// when the store does not exist and `options.create_if_missing` is
    /// false, or a classified store failure.
    async fn open(&self, name: &str, options: &OpenOptions) -> StoreResult<Arc<dyn StoreHandle>>;
}

/// An open handle to a document store.
///
/// Handles are opened fresh per logical operation and are not pooled.
/// Dropping a handle releases it without an explicit close.
///
/// # Invariants
///
/// - Every call on a closed or destroyed handle fails with
///   [`StoreError::HandleClosed`](crate::StoreError::HandleClosed).
/// - `bulk_write` reports per-document outcomes; the call errors only
///   when the whole request could not be served.
/// - `bulk_read` returns one item per requested id, in request order; an
///   unknown id yields an item with no resolved revisions.
#[async_trait]
pub trait StoreHandle: Send + Sync {
    /// Finds all documents matching the selector.
    ///
    /// # Errors
    ///
    /// Returns a classified store failure, or `HandleClosed`.
    async fn find(&self, selector: &Selector) -> StoreResult<Vec<Document>>;

    /// Reads the given ids, one result item per id.
    ///
    /// # Errors
    ///
    /// Returns a classified store failure, or `HandleClosed`. Per-id read
    /// failures are reported inside the returned items, not as a call
    /// failure.
    async fn bulk_read(&self, ids: &[String]) -> StoreResult<Vec<BulkReadItem>>;

    /// Writes the given documents, one outcome per document, in input
    /// order.
    ///
    /// # Errors
    ///
    /// Returns a classified store failure, or `HandleClosed`. Per-document
    /// failures (conflicts, malformed documents) are reported as
    /// [`WriteOutcome::Failed`] items.
    async fn bulk_write(&self, docs: &[Document]) -> StoreResult<Vec<WriteOutcome>>;

    /// Closes the handle. Further calls fail with `HandleClosed`.
    ///
    /// # Errors
    ///
    /// Returns `HandleClosed` when the handle is already closed.
    async fn close(&self) -> StoreResult<()>;

    /// Destroys the underlying store and closes the handle.
    ///
    /// A destroyed handle is not closable; further calls fail with
    /// `HandleClosed`.
    ///
    /// # Errors
    ///
    /// Returns `HandleClosed` when the handle is already closed.
    async fn destroy(&self) -> StoreResult<()>;
}
