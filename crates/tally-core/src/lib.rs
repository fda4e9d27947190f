//! tally core: counter records, the keyed store contract, and error types.
//!
//! This crate defines the data shapes and the store seam shared by the gateway
//! and its backends. It carries no transport or runtime dependencies so the
//! counter protocol can be exercised against any store implementation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Every fallible path surfaces as `TallyError`/`Result` so a single bad
//! request or store reply never takes the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod record;
pub mod store;

/// Shared result type.
pub use error::{Result, TallyError};
pub use record::{CounterRecord, Lookup};
pub use store::{KeyedCounterStore, StoreCatalog, StoreInfo};
