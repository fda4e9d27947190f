//! Store seam: the keyed document database behind every counter.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{CounterRecord, Lookup};

/// One collection of counter documents addressed by key.
///
/// Implementations report a missing key as [`Lookup::NotFound`] and keep
/// `Err` for failures (transport, auth, malformed replies). Callers rely on
/// that split to choose between "initialize" and "fail the request".
#[async_trait]
pub trait KeyedCounterStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Lookup>;

    /// Insert a new record. Fails if the key already exists.
    async fn create(&self, record: CounterRecord) -> Result<CounterRecord>;

    /// Insert or replace the record stored under `record.id`.
    async fn upsert(&self, record: CounterRecord) -> Result<CounterRecord>;
}

/// Connectivity summary reported by `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    pub database: String,
    pub collections: Vec<String>,
}

/// Database-level view used for diagnostics.
#[async_trait]
pub trait StoreCatalog: Send + Sync {
    async fn describe(&self) -> Result<StoreInfo>;
}
