//! Counter documents as they live in the store.

use serde::{Deserialize, Serialize};

/// One counter document.
///
/// Only `id` and `count` are modelled. Anything else the store attaches
/// (`_rid`, `_etag`, `_ts`, ...) is dropped on read and never written back.
/// `count` is unsigned, so a negative or fractional value in the store fails
/// to decode instead of being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub id: String,
    #[serde(default)]
    pub count: u64,
}

impl CounterRecord {
    pub fn new(id: impl Into<String>, count: u64) -> Self {
        Self { id: id.into(), count }
    }

    /// The record written the first time a key is incremented.
    pub fn first(id: impl Into<String>) -> Self {
        Self::new(id, 1)
    }

    /// Bump the local copy by one and return the new count.
    pub fn increment(&mut self) -> u64 {
        self.count = self.count.saturating_add(1);
        self.count
    }
}

/// Result of reading one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(CounterRecord),
    NotFound,
}

impl Lookup {
    /// Count held by the record, or zero for a key never written.
    pub fn count_or_zero(&self) -> u64 {
        match self {
            Lookup::Found(rec) => rec.count,
            Lookup::NotFound => 0,
        }
    }
}
