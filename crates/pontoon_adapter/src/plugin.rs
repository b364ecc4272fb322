//! Plugin orchestrator: the operation set exposed to the db framework.

use crate::admission::{self, Prepared};
use crate::config::PluginConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::reconcile::{self, BulkResponse};
use crate::retry::RetryingTransaction;
use crate::validate;
use pontoon_store::{
    Document, ReadOutcome, Selector, StoreEngine, StoreError, StoreHandle, StoreResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-kind document batches for a bulk write.
#[derive(Debug, Clone, Default)]
pub struct BulkOperations {
    /// Documents to create.
    pub adds: Vec<Document>,
    /// Documents to delete; shaped as tombstones before the write.
    pub removes: Vec<Document>,
    /// Documents to update.
    pub updates: Vec<Document>,
}

/// The storage-adapter plugin.
///
/// Composes an explicitly supplied [`StoreEngine`] with the validation,
/// admission, reconciliation and retry pieces. Every operation opens a
/// fresh handle; nothing is pooled or registered globally.
pub struct StorePlugin {
    engine: Arc<dyn StoreEngine>,
    config: PluginConfig,
}

impl StorePlugin {
    /// Creates a plugin over the given engine and configuration.
    pub fn new(engine: Arc<dyn StoreEngine>, config: PluginConfig) -> Self {
        Self { engine, config }
    }

    /// Returns the plugin configuration.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    async fn open(&self) -> StoreResult<Arc<dyn StoreHandle>> {
        self.engine.open(&self.config.name, &self.config.options).await
    }

    /// Applies the read-best-effort policy shared by the listing reads:
    /// a closed handle is a lifecycle bug and is rethrown; any other
    /// failure degrades to an empty result set.
    fn degrade(
        operation: &'static str,
        result: StoreResult<Vec<Document>>,
    ) -> AdapterResult<Vec<Document>> {
        match result {
            Ok(docs) => Ok(docs),
            Err(StoreError::HandleClosed) => Err(StoreError::HandleClosed.into()),
            Err(error) => {
                warn!(operation, %error, "read failed, returning no documents");
                Ok(Vec::new())
            }
        }
    }

    /// Lists documents matching the selector (everything when `None`).
    ///
    /// Opens a handle, finds, closes, returns. Read-best-effort: a
    /// failure other than a closed handle yields an empty result.
    pub async fn all(&self, selector: Option<Selector>) -> AdapterResult<Vec<Document>> {
        let selector = selector.unwrap_or_default();
        let result = async {
            let handle = self.open().await?;
            let docs = handle.find(&selector).await?;
            handle.close().await?;
            Ok(docs)
        }
        .await;
        Self::degrade("all", result)
    }

    /// Reads documents by id set.
    ///
    /// The handle is released on drop rather than explicitly closed, so
    /// a caller chaining reads is not serialized behind the close. Same
    /// read-best-effort policy as [`all`](Self::all).
    pub async fn get(&self, ids: &[String]) -> AdapterResult<Vec<Document>> {
        let result = async {
            let handle = self.open().await?;
            handle.find(&Selector::ids(ids.iter().cloned())).await
        }
        .await;
        Self::degrade("get", result)
    }

    /// Reads documents by id, failing the whole batch on any per-id read
    /// error.
    ///
    /// An empty id set resolves empty without a store call. Ids unknown
    /// to the store are simply absent from the result.
    ///
    /// # Errors
    ///
    /// [`AdapterError::StrictRead`] naming the failing id, or any store
    /// failure.
    pub async fn get_strict(&self, ids: &[String]) -> AdapterResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let handle = self.open().await?;
        let items = handle.bulk_read(ids).await?;

        let mut docs = Vec::new();
        for item in items {
            for outcome in item.docs {
                match outcome {
                    ReadOutcome::Found(doc) => docs.push(doc),
                    ReadOutcome::Error { message } => {
                        return Err(AdapterError::strict_read(item.id, message));
                    }
                }
            }
        }
        Ok(docs)
    }

    /// Destroys the underlying store. The destroyed handle is not
    /// closable, so no close is attempted afterward.
    pub async fn destroy(&self) -> AdapterResult<()> {
        let handle = self.open().await?;
        handle.destroy().await?;
        Ok(())
    }

    /// Writes the collated batch - removals, then adds, then updates -
    /// through the retrying transaction and reconciles the outcome.
    ///
    /// Removals are shaped as tombstones before the write (idempotent,
    /// so pre-formatted tombstones pass through unchanged). The returned
    /// response does not touch the caller's documents; apply
    /// [`BulkResponse::apply_revisions`] to back-fill the new tokens.
    pub async fn bulk_operations(&self, ops: BulkOperations) -> AdapterResult<BulkResponse> {
        let BulkOperations {
            adds,
            removes,
            updates,
        } = ops;
        let batch = Arc::new(reconcile::collate(
            admission::format_deletions(&removes),
            adds,
            updates,
        ));

        let txn = RetryingTransaction::new(self.config.retry.clone());
        let (outcomes, handle) = txn
            .execute(
                || self.open(),
                |handle| {
                    let batch = Arc::clone(&batch);
                    async move { handle.bulk_write(&batch).await }
                },
            )
            .await?;

        if let Err(error) = handle.close().await {
            debug!(%error, "close after bulk write failed");
        }

        Ok(reconcile::reconcile(&outcomes))
    }

    /// Returns true when the document may be treated as a new addition.
    pub fn can_add(&self, doc: &Document) -> bool {
        admission::can_add(doc)
    }

    /// Admits a batch of new documents (all-or-nothing).
    pub fn prepare_additions(&self, docs: &[Document]) -> Prepared {
        admission::check_additions(docs)
    }

    /// Admits a batch of documents for detachment (all-or-nothing).
    pub fn prepare_detachments(&self, docs: &[Document]) -> Prepared {
        admission::check_detachments(docs)
    }

    /// Shapes documents as the tombstones the store expects.
    pub fn format_deletions(&self, docs: &[Document]) -> Vec<Document> {
        admission::format_deletions(docs)
    }

    /// Associates externally constructed documents with their current
    /// store-known revisions.
    ///
    /// Validation runs first; any failure short-circuits with a rejected
    /// batch and **no store call**. Otherwise the ids are read strictly
    /// and each returned document carries the store's revision token -
    /// documents unknown to the store come back with the token cleared.
    ///
    /// # Errors
    ///
    /// Store failures from the strict read; validation failures are a
    /// structured result, not an error.
    pub async fn prepare_attachments(&self, docs: &[Document]) -> AdapterResult<Prepared> {
        let failures = validate::failures(docs);
        if !failures.is_empty() {
            return Ok(Prepared::rejected(failures));
        }

        let ids: Vec<String> = docs
            .iter()
            .filter_map(|doc| doc.id().map(str::to_owned))
            .collect();
        let found = self.get_strict(&ids).await?;

        let revs: HashMap<String, String> = found
            .iter()
            .filter_map(|doc| Some((doc.id()?.to_owned(), doc.rev()?.to_owned())))
            .collect();
        Ok(Prepared::accepted(admission::apply_revisions(docs, &revs)))
    }
}
