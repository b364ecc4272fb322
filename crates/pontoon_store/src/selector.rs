//! Field-equality selectors for find operations.

use crate::document::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A conjunction of field-equality clauses over document fields.
///
/// The empty selector matches every document. A clause whose value is an
/// array matches when the document's field equals any element, which is
/// how find-by-id-set is expressed.
///
/// Query-language semantics beyond this belong to the underlying store;
/// the in-memory engine implements exactly this subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector {
    clauses: Map<String, Value>,
}

impl Selector {
    /// The empty selector, matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// A selector with a single equality clause.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().with_field(name, value)
    }

    /// Adds an equality clause.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.insert(name.into(), value.into());
        self
    }

    /// A selector matching documents whose id is in the given set.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: Vec<Value> = ids
            .into_iter()
            .map(|id| Value::String(id.into()))
            .collect();
        Self::field(crate::document::ID_FIELD, set)
    }

    /// Returns true when the selector has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns the underlying clause map.
    pub fn clauses(&self) -> &Map<String, Value> {
        &self.clauses
    }

    /// Returns true when the document satisfies every clause.
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|(name, expected)| {
            let Some(actual) = doc.field(name) else {
                return false;
            };
            match expected {
                Value::Array(set) => set.contains(actual),
                value => actual == value,
            }
        })
    }
}
