//! Fault-injecting engine wrapper.

use async_trait::async_trait;
use pontoon_store::{
    BulkReadItem, Document, OpenOptions, Selector, StoreEngine, StoreError, StoreHandle,
    StoreResult, WriteOutcome,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Wraps another engine and fails the first N bulk-writes with a
/// classified store failure before delegating.
///
/// The failure budget is shared across every handle the engine opens,
/// which makes retried transactions observable: each retry opens a fresh
/// handle, consumes one failure, and eventually reaches the inner store.
pub struct FlakyEngine {
    inner: Arc<dyn StoreEngine>,
    remaining: Arc<AtomicU32>,
    status: u16,
}

impl FlakyEngine {
    /// Wraps `inner`, injecting `failures` bulk-write failures carrying
    /// the given store status.
    pub fn new(inner: Arc<dyn StoreEngine>, failures: u32, status: u16) -> Self {
        Self {
            inner,
            remaining: Arc::new(AtomicU32::new(failures)),
            status,
        }
    }

    /// Returns the number of failures not yet injected.
    pub fn remaining_failures(&self) -> u32 {
        self.remaining.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreEngine for FlakyEngine {
    async fn open(&self, name: &str, options: &OpenOptions) -> StoreResult<Arc<dyn StoreHandle>> {
        let inner = self.inner.open(name, options).await?;
        Ok(Arc::new(FlakyHandle {
            inner,
            remaining: Arc::clone(&self.remaining),
            status: self.status,
        }))
    }
}

struct FlakyHandle {
    inner: Arc<dyn StoreHandle>,
    remaining: Arc<AtomicU32>,
    status: u16,
}

impl FlakyHandle {
    /// Consumes one unit of the failure budget, when any remains.
    fn take_failure(&self) -> Option<StoreError> {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .ok()
            .map(|_| StoreError::from_status(self.status, "injected failure"))
    }
}

#[async_trait]
impl StoreHandle for FlakyHandle {
    async fn find(&self, selector: &Selector) -> StoreResult<Vec<Document>> {
        self.inner.find(selector).await
    }

    async fn bulk_read(&self, ids: &[String]) -> StoreResult<Vec<BulkReadItem>> {
        self.inner.bulk_read(ids).await
    }

    async fn bulk_write(&self, docs: &[Document]) -> StoreResult<Vec<WriteOutcome>> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.inner.bulk_write(docs).await
    }

    async fn close(&self) -> StoreResult<()> {
        self.inner.close().await
    }

    async fn destroy(&self) -> StoreResult<()> {
        self.inner.destroy().await
    }
}
