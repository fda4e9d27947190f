//! Store backends and their assembly from config.

pub mod cosmos;
pub mod memory;
pub mod metered;

use std::sync::Arc;

use tally_core::error::{Result, TallyError};
use tally_core::{KeyedCounterStore, StoreCatalog};

use crate::config::{StoreBackend, StoreSection};
use crate::obs::TallyMetrics;

pub use cosmos::{ConnectionString, CosmosClient, CosmosContainer};
pub use memory::{MemoryCatalog, MemoryStore};
pub use metered::MeteredStore;

/// The collections the services run against.
#[derive(Clone)]
pub struct Backend {
    pub visitors: Arc<dyn KeyedCounterStore>,
    pub likes: Arc<dyn KeyedCounterStore>,
    pub catalog: Arc<dyn StoreCatalog>,
}

impl Backend {
    /// Fresh in-memory collections.
    pub fn memory(cfg: &StoreSection) -> Self {
        Self {
            visitors: Arc::new(MemoryStore::new()),
            likes: Arc::new(MemoryStore::new()),
            catalog: Arc::new(MemoryCatalog::new(vec![
                cfg.visitor_container.clone(),
                cfg.likes_container.clone(),
            ])),
        }
    }

    /// Wrap both collections with latency/outcome metering.
    pub fn metered(self, cfg: &StoreSection, metrics: &Arc<TallyMetrics>) -> Self {
        Self {
            visitors: Arc::new(MeteredStore::new(
                self.visitors,
                cfg.visitor_container.clone(),
                Arc::clone(metrics),
            )),
            likes: Arc::new(MeteredStore::new(
                self.likes,
                cfg.likes_container.clone(),
                Arc::clone(metrics),
            )),
            catalog: self.catalog,
        }
    }
}

/// Build the configured backend.
///
/// `connection_string` is the raw value of `cfg.connection_env`; `None` or an
/// empty value yields `MissingSetting` naming that variable.
pub fn connect(cfg: &StoreSection, connection_string: Option<&str>) -> Result<Backend> {
    match cfg.backend {
        StoreBackend::Memory => Ok(Backend::memory(cfg)),
        StoreBackend::Cosmos => {
            let raw = connection_string
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| TallyError::MissingSetting(cfg.connection_env.clone()))?;
            let conn = ConnectionString::parse(raw, &cfg.connection_env)?;
            let client = CosmosClient::new(conn, &cfg.database)?;
            Ok(Backend {
                visitors: Arc::new(client.container(&cfg.visitor_container)),
                likes: Arc::new(client.container(&cfg.likes_container)),
                catalog: Arc::new(client),
            })
        }
    }
}
