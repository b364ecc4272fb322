//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
///
/// The taxonomy is closed and decided here, at the store boundary: a
/// server-side failure (status 500 and above) is [`StoreError::Transient`],
/// everything else is terminal. Callers branch on the variant, never on a
/// probed status field.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transient server-side failure; the operation may be retried.
    #[error("transient store failure (status {status}): {message}")]
    Transient {
        /// Store status code, always 500 or above.
        status: u16,
        /// Store-provided failure message.
        message: String,
    },

    /// The store rejected the request; retrying will not help.
    #[error("store rejected request (status {status}): {message}")]
    Rejected {
        /// Store status code, always below 500.
        status: u16,
        /// Store-provided failure message.
        message: String,
    },

    /// The handle was used after `close` or `destroy`.
    #[error("store handle is closed")]
    HandleClosed,

    /// The named store does not exist and creation was not requested.
    #[error("no such store: {name}")]
    StoreMissing {
        /// Name of the missing store.
        name: String,
    },
}

impl StoreError {
    /// Creates a transient failure.
    pub fn transient(status: u16, message: impl Into<String>) -> Self {
        Self::Transient {
            status,
            message: message.into(),
        }
    }

    /// Creates a rejected-request failure.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Classifies a store failure by status: 500 and above is transient,
    /// anything below is a rejection.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        if status >= 500 {
            Self::transient(status, message)
        } else {
            Self::rejected(status, message)
        }
    }

    /// Returns the store status code, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transient { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::HandleClosed | Self::StoreMissing { .. } => None,
        }
    }

    /// Returns true when the operation may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_boundary() {
        assert!(StoreError::from_status(500, "internal").is_transient());
        assert!(StoreError::from_status(503, "unavailable").is_transient());
        assert!(!StoreError::from_status(499, "client closed request").is_transient());
        assert!(!StoreError::from_status(404, "missing").is_transient());
    }

    #[test]
    fn closed_handle_is_not_transient() {
        assert!(!StoreError::HandleClosed.is_transient());
        assert!(StoreError::HandleClosed.status().is_none());
    }

    #[test]
    fn error_display() {
        let err = StoreError::from_status(503, "service unavailable");
        assert_eq!(
            err.to_string(),
            "transient store failure (status 503): service unavailable"
        );

        let err = StoreError::StoreMissing {
            name: "ledger".into(),
        };
        assert_eq!(err.to_string(), "no such store: ledger");
    }
}
