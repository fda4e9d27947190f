//! Latency/outcome metering around any store.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use tally_core::error::Result;
use tally_core::{CounterRecord, KeyedCounterStore, Lookup};

use crate::obs::TallyMetrics;

pub struct MeteredStore {
    inner: Arc<dyn KeyedCounterStore>,
    collection: String,
    metrics: Arc<TallyMetrics>,
}

impl MeteredStore {
    pub fn new(
        inner: Arc<dyn KeyedCounterStore>,
        collection: impl Into<String>,
        metrics: Arc<TallyMetrics>,
    ) -> Self {
        Self {
            inner,
            collection: collection.into(),
            metrics,
        }
    }

    fn observe(&self, op: &str, outcome: &str, started: Instant) {
        self.metrics.store_ops.observe(
            &[("collection", self.collection.as_str()), ("op", op), ("outcome", outcome)],
            started.elapsed(),
        );
    }
}

#[async_trait]
impl KeyedCounterStore for MeteredStore {
    async fn get(&self, key: &str) -> Result<Lookup> {
        let started = Instant::now();
        let res = self.inner.get(key).await;
        let outcome = match &res {
            Ok(Lookup::Found(_)) => "found",
            Ok(Lookup::NotFound) => "not_found",
            Err(_) => "error",
        };
        self.observe("get", outcome, started);
        res
    }

    async fn create(&self, record: CounterRecord) -> Result<CounterRecord> {
        let started = Instant::now();
        let res = self.inner.create(record).await;
        self.observe("create", if res.is_ok() { "ok" } else { "error" }, started);
        res
    }

    async fn upsert(&self, record: CounterRecord) -> Result<CounterRecord> {
        let started = Instant::now();
        let res = self.inner.upsert(record).await;
        self.observe("upsert", if res.is_ok() { "ok" } else { "error" }, started);
        res
    }
}
