//! # Pontoon Testkit
//!
//! Test utilities for Pontoon: document builders, pre-populated
//! in-memory engines and a fault-injecting engine wrapper.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fixtures;
mod flaky;

pub use fixtures::{doc, persisted_doc, populated_engine};
pub use flaky::FlakyEngine;
