//! Test stores shared by the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use tally_core::error::{Result, TallyError};
use tally_core::{CounterRecord, KeyedCounterStore, Lookup};
use tally_gateway::store::MemoryStore;

/// Memory store that counts every call it receives.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    pub gets: AtomicUsize,
    pub creates: AtomicUsize,
    pub upserts: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
            + self.creates.load(Ordering::SeqCst)
            + self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyedCounterStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Lookup> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn create(&self, record: CounterRecord) -> Result<CounterRecord> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(record).await
    }

    async fn upsert(&self, record: CounterRecord) -> Result<CounterRecord> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(record).await
    }
}

/// Store whose every call fails, as when the database is unreachable.
pub struct DownStore {
    pub writes: AtomicUsize,
}

impl DownStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { writes: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl KeyedCounterStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Lookup> {
        Err(TallyError::Store("connection refused".into()))
    }

    async fn create(&self, _record: CounterRecord) -> Result<CounterRecord> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(TallyError::Store("connection refused".into()))
    }

    async fn upsert(&self, _record: CounterRecord) -> Result<CounterRecord> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(TallyError::Store("connection refused".into()))
    }
}

/// Memory store whose reads return a snapshot and then stall, so overlapping
/// increments both act on the same stale value.
pub struct SlowReadStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

impl SlowReadStore {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            delay,
        })
    }
}

#[async_trait]
impl KeyedCounterStore for SlowReadStore {
    async fn get(&self, key: &str) -> Result<Lookup> {
        let snapshot = self.inner.get(key).await;
        tokio::time::sleep(self.delay).await;
        snapshot
    }

    async fn create(&self, record: CounterRecord) -> Result<CounterRecord> {
        self.inner.create(record).await
    }

    async fn upsert(&self, record: CounterRecord) -> Result<CounterRecord> {
        self.inner.upsert(record).await
    }
}
