//! Admission policy: which documents may be added, detached or deleted.

use crate::validate;
use pontoon_store::{Document, REV_FIELD};
use std::collections::HashMap;

/// Result of preparing a batch of documents for a store operation.
///
/// Batches are all-or-nothing: any failure empties `docs` and sets `ok`
/// to false. This is a structured result, never an error - callers must
/// check `ok`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prepared {
    /// Whether the whole batch was accepted.
    pub ok: bool,
    /// The admitted documents; empty when the batch was rejected.
    pub docs: Vec<Document>,
    /// Failure messages; empty when the batch was accepted.
    pub errors: Vec<String>,
}

impl Prepared {
    /// An accepted batch.
    pub fn accepted(docs: Vec<Document>) -> Self {
        Self {
            ok: true,
            docs,
            errors: Vec::new(),
        }
    }

    /// A rejected batch carrying the failure messages.
    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            ok: false,
            docs: Vec::new(),
            errors,
        }
    }
}

/// Returns true when the document may be treated as a new addition.
///
/// A present revision token signals the record already exists in the
/// store and must go through the update path instead.
pub fn can_add(doc: &Document) -> bool {
    !doc.has_field(REV_FIELD)
}

/// Admits a batch of new documents.
///
/// Every document carrying a revision token is an admission conflict;
/// one conflict rejects the whole batch. An accepted batch echoes the
/// input unchanged.
pub fn check_additions(docs: &[Document]) -> Prepared {
    let errors: Vec<String> = docs
        .iter()
        .filter(|doc| !can_add(doc))
        .map(|doc| {
            format!(
                "Cannot add a document that is already in the store: {}",
                validate::snapshot(doc)
            )
        })
        .collect();

    if errors.is_empty() {
        Prepared::accepted(docs.to_vec())
    } else {
        Prepared::rejected(errors)
    }
}

/// Admits a batch of documents for detachment.
///
/// A document may only be released from tracking when it carries full
/// identity; any validation failure rejects the whole batch.
pub fn check_detachments(docs: &[Document]) -> Prepared {
    let errors = validate::failures(docs);
    if errors.is_empty() {
        Prepared::accepted(docs.to_vec())
    } else {
        Prepared::rejected(errors)
    }
}

/// Shapes a batch of documents as the tombstones the store's bulk-write
/// expects: id, revision token and document type survive, everything
/// else is dropped, and the deletion marker is set. Idempotent.
pub fn format_deletions(docs: &[Document]) -> Vec<Document> {
    docs.iter().map(Document::to_tombstone).collect()
}

/// Returns copies of the documents with revision tokens overwritten from
/// the map; documents whose id is absent from the map have the token
/// cleared.
pub(crate) fn apply_revisions(
    docs: &[Document],
    revs: &HashMap<String, String>,
) -> Vec<Document> {
    docs.iter()
        .map(|doc| {
            let mut out = doc.clone();
            match doc.id().and_then(|id| revs.get(id)) {
                Some(rev) => out.set_rev(rev.clone()),
                None => out.clear_rev(),
            }
            out
        })
        .collect()
}
