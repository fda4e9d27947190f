use std::sync::Arc;

use tally_core::error::Result;
use tally_core::KeyedCounterStore;

use super::increment_key;

/// Key of the single site-wide visitor counter.
pub const VISITOR_COUNTER_ID: &str = "visitor-count";

/// Global visitor counter. Every call counts a visit; there is no peek.
#[derive(Clone)]
pub struct CounterService {
    store: Arc<dyn KeyedCounterStore>,
}

impl CounterService {
    pub fn new(store: Arc<dyn KeyedCounterStore>) -> Self {
        Self { store }
    }

    pub async fn increment(&self) -> Result<u64> {
        increment_key(self.store.as_ref(), VISITOR_COUNTER_ID).await
    }
}
