//! Retry-with-backoff transaction wrapper.

use crate::config::RetryPolicy;
use crate::error::{AdapterError, AdapterResult};
use pontoon_store::{StoreHandle, StoreResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Re-executes a unit of work against a freshly opened store handle
/// until it succeeds, fails terminally, or exhausts the backoff
/// schedule.
///
/// Each attempt opens a new handle and runs the unit of work from
/// scratch - there is no partial-progress resumption. Only
/// [`StoreError::Transient`](pontoon_store::StoreError::Transient)
/// failures are retried; any other failure rejects immediately with the
/// original error.
///
/// A transaction is single-flight: the next attempt starts only after
/// the previous one settles, and backoff waits suspend this transaction
/// alone. Instances are independent; each holds its own backoff state,
/// and there is no cancellation - a started transaction runs to a
/// terminal resolution.
#[derive(Debug, Clone, Default)]
pub struct RetryingTransaction {
    policy: RetryPolicy,
}

impl RetryingTransaction {
    /// Creates a transaction wrapper with the given backoff policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Opens a handle via `open` and runs `action` against it, retrying
    /// transient failures per the backoff schedule.
    ///
    /// On success resolves with the action's value and the still-open
    /// handle - the caller decides the handle's lifecycle.
    ///
    /// # Errors
    ///
    /// - The original store failure, unmodified, when it is not
    ///   transient.
    /// - [`AdapterError::RetryExhausted`] wrapping the original failure
    ///   once the about-to-be-used wait reaches the policy ceiling.
    pub async fn execute<T, O, OFut, A, AFut>(
        &self,
        open: O,
        action: A,
    ) -> AdapterResult<(T, Arc<dyn StoreHandle>)>
    where
        O: Fn() -> OFut,
        OFut: Future<Output = StoreResult<Arc<dyn StoreHandle>>>,
        A: Fn(Arc<dyn StoreHandle>) -> AFut,
        AFut: Future<Output = StoreResult<T>>,
    {
        let mut wait = Duration::ZERO;

        loop {
            let error = match open().await {
                Ok(handle) => match action(Arc::clone(&handle)).await {
                    Ok(value) => return Ok((value, handle)),
                    Err(error) => error,
                },
                Err(error) => error,
            };

            if !error.is_transient() {
                return Err(error.into());
            }

            wait = self.policy.next_wait(wait);
            if self.policy.exhausted(wait) {
                warn!(max_wait_ms = wait.as_millis() as u64, %error, "giving up on transient store failure");
                return Err(AdapterError::retry_exhausted(wait, error));
            }

            debug!(wait_ms = wait.as_millis() as u64, %error, "transient store failure, backing off");
            tokio::time::sleep(wait).await;
        }
    }
}
