//! Counter services.
//!
//! Both services are stateless handles over a store collection. All counter
//! state lives in the store, so any number of handler tasks (or processes)
//! can serve requests without in-process coordination.

pub mod likes;
pub mod visitor;

use tally_core::error::Result;
use tally_core::{CounterRecord, KeyedCounterStore, Lookup};

pub use likes::{LikeKey, LikesService};
pub use visitor::{CounterService, VISITOR_COUNTER_ID};

/// Read-modify-write one key: bump an existing record, or create it at 1.
///
/// Not transactional. Two overlapping calls on the same key can both read `n`
/// and both write `n + 1`, losing one increment.
pub(crate) async fn increment_key(store: &dyn KeyedCounterStore, key: &str) -> Result<u64> {
    match store.get(key).await? {
        Lookup::Found(mut rec) => {
            let count = rec.increment();
            store.upsert(rec).await?;
            Ok(count)
        }
        Lookup::NotFound => {
            tracing::debug!(key = %key, "counter missing, creating");
            let rec = CounterRecord::first(key);
            let count = rec.count;
            store.create(rec).await?;
            Ok(count)
        }
    }
}
