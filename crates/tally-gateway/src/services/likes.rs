use std::sync::Arc;

use tally_core::error::{Result, TallyError};
use tally_core::KeyedCounterStore;

use super::increment_key;

/// Caller-supplied identifier of a likeable item. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeKey(String);

impl LikeKey {
    /// Validate the raw `id` query value. Absent and empty are both rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(s) if !s.is_empty() => Ok(Self(s.to_string())),
            _ => Err(TallyError::MissingIdentifier),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LikeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-item like counters, created lazily on first like.
#[derive(Clone)]
pub struct LikesService {
    store: Arc<dyn KeyedCounterStore>,
}

impl LikesService {
    pub fn new(store: Arc<dyn KeyedCounterStore>) -> Self {
        Self { store }
    }

    /// Current likes. A never-liked key reads as 0 and nothing is written.
    pub async fn get(&self, key: &LikeKey) -> Result<u64> {
        Ok(self.store.get(key.as_str()).await?.count_or_zero())
    }

    pub async fn increment(&self, key: &LikeKey) -> Result<u64> {
        increment_key(self.store.as_ref(), key.as_str()).await
    }
}
