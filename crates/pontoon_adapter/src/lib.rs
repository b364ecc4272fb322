//! # Pontoon Adapter
//!
//! Storage-adapter plugin bridging a generic document-database contract
//! (collections of typed documents keyed by a document-type discriminator)
//! to an underlying embedded/replicating document store.
//!
//! This crate provides:
//! - Identity-field validation for attach and detach decisions
//! - Admission policy (add vs. update, all-or-nothing batches)
//! - Bulk-write response reconciliation into a uniform success/error map
//! - Retry with exponential backoff against a freshly reopened handle
//! - The [`StorePlugin`] orchestrator tying the pieces together
//!
//! ## Key Invariants
//!
//! - Validation and admission failures are structured results, never
//!   errors; store failures use the error channel.
//! - Only [`StoreError::Transient`](pontoon_store::StoreError::Transient)
//!   failures are retried; everything else propagates immediately.
//! - Every store handle is opened fresh per logical operation.
//! - Documents passed to bulk operations are mutated in place when
//!   store-assigned revision tokens are applied back.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod admission;
mod config;
mod error;
mod plugin;
mod reconcile;
mod retry;
mod validate;

pub use admission::{can_add, check_additions, check_detachments, format_deletions, Prepared};
pub use config::{PluginConfig, RetryPolicy};
pub use error::{AdapterError, AdapterResult};
pub use plugin::{BulkOperations, StorePlugin};
pub use reconcile::{collate, reconcile, BulkResponse, WriteAck, WriteFailure};
pub use retry::RetryingTransaction;
pub use validate::{validate, FieldCheck, REQUIRED_FIELDS};
