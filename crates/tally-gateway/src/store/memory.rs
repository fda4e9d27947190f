//! Process-local store for development and tests.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use tally_core::error::{Result, TallyError};
use tally_core::{CounterRecord, KeyedCounterStore, Lookup, StoreCatalog, StoreInfo};

/// One in-memory collection. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<String, CounterRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyedCounterStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Lookup> {
        Ok(match self.docs.get(key) {
            Some(rec) => Lookup::Found(rec.value().clone()),
            None => Lookup::NotFound,
        })
    }

    async fn create(&self, record: CounterRecord) -> Result<CounterRecord> {
        match self.docs.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(TallyError::Store(format!(
                "record {} already exists",
                record.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn upsert(&self, record: CounterRecord) -> Result<CounterRecord> {
        self.docs.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}

/// Catalog view over the in-memory collections.
pub struct MemoryCatalog {
    collections: Vec<String>,
}

impl MemoryCatalog {
    pub const DATABASE: &'static str = "memory";

    pub fn new(collections: Vec<String>) -> Self {
        Self { collections }
    }
}

#[async_trait]
impl StoreCatalog for MemoryCatalog {
    async fn describe(&self) -> Result<StoreInfo> {
        Ok(StoreInfo {
            database: Self::DATABASE.to_string(),
            collections: self.collections.clone(),
        })
    }
}
