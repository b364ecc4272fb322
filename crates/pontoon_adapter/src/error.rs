//! Error types for adapter operations.

use pontoon_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors that can occur in adapter operations.
///
/// Validation and admission failures are *not* represented here - they
/// are structured [`Prepared`](crate::Prepared) results the caller must
/// inspect. This enum covers the error channel only.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A store failure, propagated unmodified.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A strict bulk read failed for a specific document id. Fatal for
    /// the whole batch.
    #[error("strict read failed for document {id}: {message}")]
    StrictRead {
        /// The id whose read failed.
        id: String,
        /// Store-provided failure message.
        message: String,
    },

    /// A retried transaction gave up after the backoff ceiling was
    /// reached. The original failure is preserved as the source.
    #[error("Retry Failed. Max Wait: {max_wait_ms}. Original Message: {source}")]
    RetryExhausted {
        /// The wait, in milliseconds, that reached the ceiling.
        max_wait_ms: u64,
        /// The transient failure that exhausted the schedule.
        #[source]
        source: StoreError,
    },
}

impl AdapterError {
    /// Creates a strict-read failure.
    pub fn strict_read(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StrictRead {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a retry-exhausted failure from the wait that reached the
    /// ceiling and the original transient error.
    pub fn retry_exhausted(max_wait: Duration, source: StoreError) -> Self {
        Self::RetryExhausted {
            max_wait_ms: max_wait.as_millis() as u64,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_exhausted_message_prefix() {
        let err = AdapterError::retry_exhausted(
            Duration::from_millis(2000),
            StoreError::from_status(503, "service unavailable"),
        );
        let message = err.to_string();
        assert!(message.starts_with("Retry Failed. Max Wait: 2000."));
        assert!(message.contains("service unavailable"));
    }

    #[test]
    fn store_errors_pass_through_unmodified() {
        let err = AdapterError::from(StoreError::HandleClosed);
        assert_eq!(err.to_string(), "store handle is closed");
    }

    #[test]
    fn strict_read_names_the_id() {
        let err = AdapterError::strict_read("note-1", "checksum mismatch");
        assert_eq!(
            err.to_string(),
            "strict read failed for document note-1: checksum mismatch"
        );
    }
}
