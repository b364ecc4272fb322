//! Document model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the document identifier.
pub const ID_FIELD: &str = "id";

/// Field holding the store-assigned revision token.
pub const REV_FIELD: &str = "rev";

/// Field holding the document-type discriminator.
pub const TYPE_FIELD: &str = "doc_type";

/// Field marking a document as a tombstone in bulk writes.
pub const DELETED_FIELD: &str = "deleted";

/// A document: a mapping of field names to JSON values.
///
/// Three reserved fields identify a document to the store: [`ID_FIELD`],
/// [`REV_FIELD`] and [`TYPE_FIELD`]. A fourth, [`DELETED_FIELD`], shapes
/// the tombstone the store's bulk-write recognizes.
///
/// # Presence semantics
///
/// Field access distinguishes *presence* from *truthiness*: a field that
/// is absent or set to JSON `null` is missing, while any other value -
/// including the empty string - is present. Validation and admission
/// decisions in the adapter rely on this distinction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Creates a document with the given document type and id.
    ///
    /// The revision token is left absent: the document counts as not yet
    /// persisted until the store assigns one.
    pub fn new(doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_FIELD.into(), Value::String(id.into()));
        fields.insert(TYPE_FIELD.into(), Value::String(doc_type.into()));
        Self { fields }
    }

    /// Wraps an existing field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the value of a field, treating JSON `null` as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }

    /// Returns true when the field is present and non-null.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns the document id, when present as a string.
    pub fn id(&self) -> Option<&str> {
        self.field(ID_FIELD).and_then(Value::as_str)
    }

    /// Returns the revision token, when present as a string.
    pub fn rev(&self) -> Option<&str> {
        self.field(REV_FIELD).and_then(Value::as_str)
    }

    /// Returns the document-type discriminator, when present as a string.
    pub fn doc_type(&self) -> Option<&str> {
        self.field(TYPE_FIELD).and_then(Value::as_str)
    }

    /// Sets a field to the given value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Overwrites the revision token.
    pub fn set_rev(&mut self, rev: impl Into<String>) {
        self.set(REV_FIELD, rev.into());
    }

    /// Removes the revision token, returning the document to the
    /// not-yet-persisted shape.
    pub fn clear_rev(&mut self) {
        self.fields.remove(REV_FIELD);
    }

    /// Returns true when the document carries the deletion marker.
    pub fn is_deleted(&self) -> bool {
        self.field(DELETED_FIELD)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Returns the tombstone shape of this document: a copy retaining only
    /// id, revision token and document type, with the deletion marker set.
    ///
    /// Idempotent - the tombstone of a tombstone is the same tombstone.
    pub fn to_tombstone(&self) -> Document {
        let mut fields = Map::new();
        for name in [ID_FIELD, REV_FIELD, TYPE_FIELD] {
            if let Some(value) = self.field(name) {
                fields.insert(name.into(), value.clone());
            }
        }
        fields.insert(DELETED_FIELD.into(), Value::Bool(true));
        Self { fields }
    }

    /// Returns the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the document and returns the field map.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_document_has_no_rev() {
        let doc = Document::new("note", "note-1");
        assert_eq!(doc.id(), Some("note-1"));
        assert_eq!(doc.doc_type(), Some("note"));
        assert!(doc.rev().is_none());
    }

    #[test]
    fn null_field_counts_as_absent() {
        let mut doc = Document::new("note", "note-1");
        doc.set(TYPE_FIELD, Value::Null);
        assert!(!doc.has_field(TYPE_FIELD));
        assert!(doc.doc_type().is_none());
    }

    #[test]
    fn falsy_but_present_fields_count_as_present() {
        let mut doc = Document::new("note", "");
        doc.set("count", 0);
        doc.set("archived", false);
        assert!(doc.has_field(ID_FIELD));
        assert_eq!(doc.id(), Some(""));
        assert!(doc.has_field("count"));
        assert!(doc.has_field("archived"));
    }

    #[test]
    fn set_and_clear_rev() {
        let mut doc = Document::new("note", "note-1");
        doc.set_rev("1-abc");
        assert_eq!(doc.rev(), Some("1-abc"));
        doc.clear_rev();
        assert!(doc.rev().is_none());
    }

    #[test]
    fn tombstone_keeps_identity_fields_only() {
        let mut doc = Document::new("note", "note-1");
        doc.set_rev("3-abc");
        doc.set("title", "groceries");
        doc.set("body", json!({"items": ["milk"]}));

        let tombstone = doc.to_tombstone();
        assert_eq!(tombstone.id(), Some("note-1"));
        assert_eq!(tombstone.rev(), Some("3-abc"));
        assert_eq!(tombstone.doc_type(), Some("note"));
        assert!(tombstone.is_deleted());
        assert!(tombstone.field("title").is_none());
        assert_eq!(tombstone.fields().len(), 4);
    }

    #[test]
    fn tombstone_is_idempotent() {
        let mut doc = Document::new("note", "note-1");
        doc.set_rev("3-abc");
        doc.set("title", "groceries");

        let once = doc.to_tombstone();
        let twice = once.to_tombstone();
        assert_eq!(once, twice);
    }

    #[test]
    fn tombstone_of_unpersisted_document_has_no_rev() {
        let doc = Document::new("note", "note-1");
        let tombstone = doc.to_tombstone();
        assert!(tombstone.rev().is_none());
        assert!(tombstone.is_deleted());
    }
}
