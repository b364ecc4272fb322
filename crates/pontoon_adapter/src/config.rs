//! Configuration for the store plugin.

use pontoon_store::OpenOptions;
use std::time::Duration;

/// Configuration for a [`StorePlugin`](crate::StorePlugin).
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Name of the store the plugin operates on.
    pub name: String,
    /// Options applied every time a handle is opened.
    pub options: OpenOptions,
    /// Backoff schedule for retried transactions.
    pub retry: RetryPolicy,
}

impl PluginConfig {
    /// Creates a configuration for the named store with default options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: OpenOptions::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the open options.
    pub fn with_options(mut self, options: OpenOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Backoff schedule for retried transactions.
///
/// The first retry waits `first_wait`, each subsequent retry doubles the
/// previous wait, and the schedule is clamped to `max_wait`. A transaction
/// whose *about-to-be-used* wait reaches the ceiling stops retrying.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Wait before the first retry.
    pub first_wait: Duration,
    /// Ceiling on any single wait; reaching it ends the transaction.
    pub max_wait: Duration,
}

impl RetryPolicy {
    /// Creates the default schedule (25 ms doubling to a 2000 ms ceiling).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wait before the first retry.
    pub fn with_first_wait(mut self, wait: Duration) -> Self {
        self.first_wait = wait;
        self
    }

    /// Sets the ceiling on any single wait.
    pub fn with_max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = wait;
        self
    }

    /// Advances the schedule: the first wait when none has been taken
    /// yet, otherwise double the previous wait, clamped to the ceiling.
    pub fn next_wait(&self, current: Duration) -> Duration {
        if current.is_zero() {
            self.first_wait
        } else {
            (current * 2).min(self.max_wait)
        }
    }

    /// Returns true when the wait has reached the ceiling and the
    /// transaction must stop retrying.
    pub fn exhausted(&self, wait: Duration) -> bool {
        wait >= self.max_wait
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            first_wait: Duration::from_millis(25),
            max_wait: Duration::from_millis(2000),
        }
    }
}
