//! In-memory store engine for tests and ephemeral stores.

use crate::document::Document;
use crate::engine::{OpenOptions, StoreEngine, StoreHandle};
use crate::error::{StoreError, StoreResult};
use crate::outcome::{BulkReadItem, WriteOutcome};
use crate::selector::Selector;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Shared registry of named stores.
type Registry = Arc<RwLock<HashMap<String, Arc<MemoryStore>>>>;

/// An in-memory document store engine.
///
/// Suitable for unit tests, integration tests and ephemeral databases.
/// All handles to the same named store share its contents; `destroy`
/// removes the store from the engine.
///
/// # Revision semantics
///
/// Revision tokens are `"<generation>-<random>"`. A write without a token
/// creates the document (conflicting when the id already exists); a write
/// with a token must present the store's current one; a tombstone removes
/// the document under the same rule.
#[derive(Debug, Default, Clone)]
pub struct MemoryEngine {
    stores: Registry,
}

impl MemoryEngine {
    /// Creates an engine with no stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the named store exists.
    pub fn contains(&self, name: &str) -> bool {
        self.stores.read().contains_key(name)
    }

    /// Returns the number of documents in the named store, when it exists.
    pub fn len(&self, name: &str) -> Option<usize> {
        let stores = self.stores.read();
        stores.get(name).map(|store| store.docs.read().len())
    }

    /// Returns true when the named store exists and holds no documents.
    pub fn is_empty(&self, name: &str) -> bool {
        self.len(name) == Some(0)
    }
}

#[async_trait]
impl StoreEngine for MemoryEngine {
    async fn open(&self, name: &str, options: &OpenOptions) -> StoreResult<Arc<dyn StoreHandle>> {
        let store = {
            let mut stores = self.stores.write();
            match stores.get(name) {
                Some(store) => Arc::clone(store),
                None if options.create_if_missing => {
                    let store = Arc::new(MemoryStore::default());
                    stores.insert(name.to_owned(), Arc::clone(&store));
                    store
                }
                None => {
                    return Err(StoreError::StoreMissing {
                        name: name.to_owned(),
                    })
                }
            }
        };

        Ok(Arc::new(MemoryHandle {
            name: name.to_owned(),
            store,
            registry: Arc::clone(&self.stores),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Contents of one named store.
#[derive(Debug, Default)]
struct MemoryStore {
    docs: RwLock<HashMap<String, StoredDoc>>,
}

/// A stored document and its revision generation.
#[derive(Debug, Clone)]
struct StoredDoc {
    generation: u64,
    doc: Document,
}

/// An open handle to a [`MemoryEngine`] store.
#[derive(Debug)]
pub struct MemoryHandle {
    name: String,
    store: Arc<MemoryStore>,
    registry: Registry,
    closed: AtomicBool,
}

impl MemoryHandle {
    fn guard(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(StoreError::HandleClosed)
        } else {
            Ok(())
        }
    }
}

/// Mints the revision token for a given generation.
fn revision_token(generation: u64) -> String {
    format!("{}-{}", generation, Uuid::new_v4().simple())
}

/// Applies one document write against the store contents.
fn write_one(docs: &mut HashMap<String, StoredDoc>, doc: &Document) -> WriteOutcome {
    let Some(id) = doc.id() else {
        return WriteOutcome::failed(None, "document has no id");
    };
    let id = id.to_owned();
    let current = docs.get(&id);

    if doc.is_deleted() {
        return match current {
            None => WriteOutcome::failed(Some(id), "not found: no document to delete"),
            Some(stored) if stored.doc.rev() != doc.rev() => WriteOutcome::Failed {
                id: Some(id),
                message: "conflict: revision token mismatch".into(),
                rev: stored.doc.rev().map(str::to_owned),
            },
            Some(stored) => {
                let generation = stored.generation + 1;
                docs.remove(&id);
                WriteOutcome::written(id, revision_token(generation))
            }
        };
    }

    match (doc.rev(), current) {
        // Fresh document: the id must not be taken.
        (None, Some(_)) => WriteOutcome::failed(Some(id), "conflict: document already exists"),
        (None, None) => {
            let rev = revision_token(1);
            let mut stored = doc.clone();
            stored.set_rev(rev.clone());
            docs.insert(
                id.clone(),
                StoredDoc {
                    generation: 1,
                    doc: stored,
                },
            );
            WriteOutcome::written(id, rev)
        }
        // Update: the presented token must be current.
        (Some(_), None) => WriteOutcome::failed(Some(id), "not found: no document to update"),
        (Some(rev), Some(stored)) if stored.doc.rev() != Some(rev) => WriteOutcome::Failed {
            id: Some(id),
            message: "conflict: revision token mismatch".into(),
            rev: stored.doc.rev().map(str::to_owned),
        },
        (Some(_), Some(stored)) => {
            let generation = stored.generation + 1;
            let rev = revision_token(generation);
            let mut updated = doc.clone();
            updated.set_rev(rev.clone());
            docs.insert(id.clone(), StoredDoc { generation, doc: updated });
            WriteOutcome::written(id, rev)
        }
    }
}

#[async_trait]
impl StoreHandle for MemoryHandle {
    async fn find(&self, selector: &Selector) -> StoreResult<Vec<Document>> {
        self.guard()?;
        let docs = self.store.docs.read();
        let mut matched: Vec<Document> = docs
            .values()
            .filter(|stored| selector.matches(&stored.doc))
            .map(|stored| stored.doc.clone())
            .collect();
        matched.sort_by(|a, b| a.id().cmp(&b.id()));
        Ok(matched)
    }

    async fn bulk_read(&self, ids: &[String]) -> StoreResult<Vec<BulkReadItem>> {
        self.guard()?;
        let docs = self.store.docs.read();
        Ok(ids
            .iter()
            .map(|id| match docs.get(id) {
                Some(stored) => BulkReadItem::found(id.clone(), stored.doc.clone()),
                None => BulkReadItem::missing(id.clone()),
            })
            .collect())
    }

    async fn bulk_write(&self, batch: &[Document]) -> StoreResult<Vec<WriteOutcome>> {
        self.guard()?;
        let mut docs = self.store.docs.write();
        Ok(batch.iter().map(|doc| write_one(&mut docs, doc)).collect())
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(StoreError::HandleClosed);
        }
        Ok(())
    }

    async fn destroy(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(StoreError::HandleClosed);
        }
        self.registry.write().remove(&self.name);
        Ok(())
    }
}
