//! Document builders and pre-populated engines.

use pontoon_store::{Document, MemoryEngine, OpenOptions, StoreEngine};

/// Builds an unpersisted document of the given type.
pub fn doc(doc_type: &str, id: &str) -> Document {
    Document::new(doc_type, id)
}

/// Builds a document carrying a revision token, as if already persisted.
pub fn persisted_doc(doc_type: &str, id: &str, rev: &str) -> Document {
    let mut doc = Document::new(doc_type, id);
    doc.set_rev(rev);
    doc
}

/// Creates an in-memory engine whose named store holds `count` documents
/// of type `note`, ids `note-0` through `note-{count-1}`.
pub async fn populated_engine(store: &str, count: usize) -> MemoryEngine {
    let engine = MemoryEngine::new();
    let handle = engine
        .open(store, &OpenOptions::default())
        .await
        .expect("open populated store");

    let docs: Vec<Document> = (0..count)
        .map(|index| {
            let mut doc = Document::new("note", format!("note-{index}"));
            doc.set("index", index);
            doc
        })
        .collect();
    let outcomes = handle.bulk_write(&docs).await.expect("seed documents");
    assert!(
        outcomes.iter().all(|outcome| !outcome.is_failure()),
        "seeding must not conflict"
    );
    handle.close().await.expect("close seeding handle");

    engine
}
