//! Per-document results of bulk store operations.

use crate::document::Document;
use serde::{Deserialize, Serialize};

/// Per-document outcome of a bulk write.
///
/// A bulk write succeeds or fails per item; the call itself only errors
/// when the whole request could not be served (see
/// [`StoreError`](crate::StoreError)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteOutcome {
    /// The document was written and assigned a new revision token.
    Written {
        /// Document id.
        id: String,
        /// Newly assigned revision token.
        rev: String,
        /// The store's acknowledgement flag.
        ok: bool,
    },
    /// The write failed for this document.
    Failed {
        /// Document id; absent when the store could not attribute the
        /// failure to a document.
        id: Option<String>,
        /// Store-provided failure message.
        message: String,
        /// The store-side revision token at the time of the conflict,
        /// when known.
        rev: Option<String>,
    },
}

impl WriteOutcome {
    /// Creates an acknowledged success.
    pub fn written(id: impl Into<String>, rev: impl Into<String>) -> Self {
        Self::Written {
            id: id.into(),
            rev: rev.into(),
            ok: true,
        }
    }

    /// Creates a failure, attributed when an id is given.
    pub fn failed(id: Option<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            id,
            message: message.into(),
            rev: None,
        }
    }

    /// Returns the document id this outcome refers to, when known.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Written { id, .. } => Some(id),
            Self::Failed { id, .. } => id.as_deref(),
        }
    }

    /// Returns true for failed outcomes.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-id result of a bulk read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkReadItem {
    /// The id that was looked up.
    pub id: String,
    /// Resolved revisions for this id; empty when the id is unknown to
    /// the store.
    pub docs: Vec<ReadOutcome>,
}

impl BulkReadItem {
    /// An id that resolved to a document.
    pub fn found(id: impl Into<String>, doc: Document) -> Self {
        Self {
            id: id.into(),
            docs: vec![ReadOutcome::Found(doc)],
        }
    }

    /// An id unknown to the store.
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            docs: Vec::new(),
        }
    }

    /// An id whose read failed.
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            docs: vec![ReadOutcome::Error {
                message: message.into(),
            }],
        }
    }
}

/// One resolved revision (or read failure) within a [`BulkReadItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReadOutcome {
    /// The document at its current revision.
    Found(Document),
    /// Reading this id failed.
    Error {
        /// Store-provided failure message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_id_attribution() {
        let written = WriteOutcome::written("doc-1", "1-abc");
        assert_eq!(written.id(), Some("doc-1"));
        assert!(!written.is_failure());

        let attributed = WriteOutcome::failed(Some("doc-2".into()), "conflict");
        assert_eq!(attributed.id(), Some("doc-2"));
        assert!(attributed.is_failure());

        let unattributed = WriteOutcome::failed(None, "malformed document");
        assert!(unattributed.id().is_none());
        assert!(unattributed.is_failure());
    }

    #[test]
    fn missing_read_item_has_no_docs() {
        let item = BulkReadItem::missing("doc-9");
        assert_eq!(item.id, "doc-9");
        assert!(item.docs.is_empty());
    }
}
