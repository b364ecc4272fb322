//! Bulk-write response reconciliation.

use pontoon_store::{Document, WriteOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An acknowledged write in a reconciled response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    /// Document id.
    pub id: String,
    /// The store's acknowledgement flag.
    pub ok: bool,
    /// The revision token the store assigned.
    pub rev: String,
}

/// An attributed failure in a reconciled response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFailure {
    /// Document id.
    pub id: String,
    /// Always false; kept so both maps share one entry shape.
    pub ok: bool,
    /// Store-provided failure message.
    pub error: String,
    /// The store-side revision token at the time of the conflict, when
    /// known.
    pub rev: Option<String>,
}

/// The uniform view of a mixed bulk-write result set.
///
/// Every outcome with an id lands in exactly one of `successes` and
/// `errors`; outcomes the store could not attribute to a document are
/// collected in `unattributed`. The counts always equal the cardinality
/// of the respective map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Acknowledged writes, keyed by document id.
    pub successes: BTreeMap<String, WriteAck>,
    /// Attributed failures, keyed by document id.
    pub errors: BTreeMap<String, WriteFailure>,
    /// Number of entries in `successes`.
    pub successes_count: usize,
    /// Number of entries in `errors`.
    pub errors_count: usize,
    /// Messages from failures the store could not attribute to an id.
    pub unattributed: Vec<String>,
}

impl BulkResponse {
    /// Back-fills store-assigned revision tokens into the caller's
    /// documents.
    ///
    /// For each document, by position, the token is overwritten **in
    /// place** when `successes` holds an acknowledged entry for its id.
    /// This is the documented side effect that lets callers keep working
    /// with the documents they passed to a bulk write without
    /// re-fetching.
    pub fn apply_revisions(&self, docs: &mut [Document]) {
        for doc in docs.iter_mut() {
            let rev = match doc.id().and_then(|id| self.successes.get(id)) {
                Some(ack) if ack.ok => Some(ack.rev.clone()),
                _ => None,
            };
            if let Some(rev) = rev {
                doc.set_rev(rev);
            }
        }
    }
}

/// Folds raw per-document outcomes into the uniform response.
pub fn reconcile(outcomes: &[WriteOutcome]) -> BulkResponse {
    let mut response = BulkResponse::default();

    for outcome in outcomes {
        match outcome {
            WriteOutcome::Written { id, rev, ok } => {
                response.successes.insert(
                    id.clone(),
                    WriteAck {
                        id: id.clone(),
                        ok: *ok,
                        rev: rev.clone(),
                    },
                );
            }
            WriteOutcome::Failed {
                id: Some(id),
                message,
                rev,
            } => {
                response.errors.insert(
                    id.clone(),
                    WriteFailure {
                        id: id.clone(),
                        ok: false,
                        error: message.clone(),
                        rev: rev.clone(),
                    },
                );
            }
            WriteOutcome::Failed {
                id: None, message, ..
            } => {
                response.unattributed.push(message.clone());
            }
        }
    }

    response.successes_count = response.successes.len();
    response.errors_count = response.errors.len();
    response
}

/// Concatenates per-kind batches in store write order: removals first,
/// then adds, then updates.
///
/// Removals go first so a delete-then-recreate of the same id within one
/// batch resolves as a create rather than a conflict.
pub fn collate(
    removes: Vec<Document>,
    adds: Vec<Document>,
    updates: Vec<Document>,
) -> Vec<Document> {
    let mut batch = Vec::with_capacity(removes.len() + adds.len() + updates.len());
    batch.extend(removes);
    batch.extend(adds);
    batch.extend(updates);
    batch
}
