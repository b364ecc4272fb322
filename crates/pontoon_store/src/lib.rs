//! # Pontoon Store
//!
//! Document model and store operation set for Pontoon.
//!
//! This crate defines the narrow contract through which the adapter
//! consumes an underlying document store:
//!
//! - [`Document`] - a mapping of field names to JSON values with reserved
//!   identity fields (id, revision token, document type)
//! - [`Selector`] - field-equality selectors for find operations
//! - [`StoreEngine`] / [`StoreHandle`] - open, close/destroy, find,
//!   bulk-read-by-id and bulk-write
//! - [`StoreError`] - the closed error taxonomy the adapter branches on
//! - [`MemoryEngine`] - an in-memory engine for tests and ephemeral stores
//!
//! ## Design Principles
//!
//! - The store's query language, replication and indexing are external;
//!   only the operation set above is modeled here.
//! - Errors are classified **at the store boundary**: a transient failure
//!   is a [`StoreError::Transient`], never an untyped status probed later.
//! - Engines are composed explicitly - nothing is registered globally.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod engine;
mod error;
mod memory;
mod outcome;
mod selector;

pub use document::{Document, DELETED_FIELD, ID_FIELD, REV_FIELD, TYPE_FIELD};
pub use engine::{OpenOptions, StoreEngine, StoreHandle};
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryEngine, MemoryHandle};
pub use outcome::{BulkReadItem, ReadOutcome, WriteOutcome};
pub use selector::Selector;
