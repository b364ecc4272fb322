//! Identity-field validation.

use pontoon_store::{Document, ID_FIELD, REV_FIELD, TYPE_FIELD};

/// The identity fields every attached or detached document must carry.
pub const REQUIRED_FIELDS: [&str; 3] = [ID_FIELD, REV_FIELD, TYPE_FIELD];

/// Outcome of checking one required field on one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    /// Name of the field that was checked.
    pub property: &'static str,
    /// Whether the field passed the presence check.
    pub ok: bool,
    /// Failure message; `None` when the check passed.
    pub error: Option<String>,
}

/// Checks that a document carries the three identity fields.
///
/// One result per required field, in [`REQUIRED_FIELDS`] order. This is a
/// presence check, not a truthiness check: a field fails only when it is
/// absent or null; the empty string, zero and `false` all pass. No side
/// effects.
pub fn validate(doc: &Document) -> Vec<FieldCheck> {
    REQUIRED_FIELDS
        .iter()
        .map(|&property| {
            if doc.has_field(property) {
                FieldCheck {
                    property,
                    ok: true,
                    error: None,
                }
            } else {
                FieldCheck {
                    property,
                    ok: false,
                    error: Some(format!(
                        "missing required field `{}` on document: {}",
                        property,
                        snapshot(doc)
                    )),
                }
            }
        })
        .collect()
}

/// Collects the failure messages across a batch, in input order.
pub(crate) fn failures(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .flat_map(validate)
        .filter_map(|check| check.error)
        .collect()
}

/// JSON snapshot of a document for diagnostics.
pub(crate) fn snapshot(doc: &Document) -> String {
    serde_json::to_string(doc).unwrap_or_else(|_| "<unserializable document>".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn attached_doc() -> Document {
        let mut doc = Document::new("note", "note-1");
        doc.set_rev("1-abc");
        doc
    }

    #[test]
    fn complete_document_passes_every_check() {
        let checks = validate(&attached_doc());
        assert_eq!(checks.len(), 3);
        assert!(checks.iter().all(|check| check.ok));
        assert!(checks.iter().all(|check| check.error.is_none()));
    }

    #[test]
    fn missing_rev_fails_that_check_only() {
        let doc = Document::new("note", "note-1");
        let checks = validate(&doc);
        let failed: Vec<_> = checks.iter().filter(|check| !check.ok).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].property, REV_FIELD);
    }

    #[test]
    fn null_doc_type_fails_like_absence() {
        let mut doc = attached_doc();
        doc.set(TYPE_FIELD, Value::Null);
        let checks = validate(&doc);
        let failed: Vec<_> = checks.iter().filter(|check| !check.ok).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].property, TYPE_FIELD);
    }

    #[test]
    fn empty_string_id_passes() {
        let mut doc = attached_doc();
        doc.set(ID_FIELD, "");
        assert!(validate(&doc).iter().all(|check| check.ok));
    }

    #[test]
    fn error_names_the_field_and_snapshots_the_document() {
        let doc = Document::new("note", "note-1");
        let checks = validate(&doc);
        let error = checks
            .iter()
            .find_map(|check| check.error.as_deref())
            .unwrap();
        assert!(error.contains("`rev`"));
        assert!(error.contains("note-1"));
    }

    #[test]
    fn batch_failures_preserve_input_order() {
        let missing_rev = Document::new("note", "a");
        let mut missing_type = Document::new("note", "b");
        missing_type.set_rev("1-x");
        missing_type.set(TYPE_FIELD, Value::Null);

        let messages = failures(&[missing_rev, missing_type]);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("`rev`"));
        assert!(messages[1].contains("`doc_type`"));
    }
}
