//! Shared application state for the tally gateway.
//!
//! The backend is resolved once at startup. When the store credential is
//! missing or malformed the process still serves, and every request that needs
//! the store gets the config error back as a 500.

use std::sync::Arc;

use tally_core::error::{Result, TallyError};
use tally_core::StoreCatalog;

use crate::config::{GatewayConfig, StoreSection};
use crate::obs::TallyMetrics;
use crate::services::{CounterService, LikesService};
use crate::store::{self, Backend};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    backend: std::result::Result<Backend, TallyError>,
    metrics: Arc<TallyMetrics>,
}

impl AppState {
    /// Build state from config, reading the credential from the environment.
    pub fn new(cfg: &GatewayConfig) -> Self {
        let conn = std::env::var(&cfg.store.connection_env).ok();
        Self::from_connection_string(&cfg.store, conn.as_deref())
    }

    /// Build state with an explicit credential value (`None` = unset).
    pub fn from_connection_string(cfg: &StoreSection, connection_string: Option<&str>) -> Self {
        let metrics = Arc::new(TallyMetrics::default());
        let backend = store::connect(cfg, connection_string).map(|b| b.metered(cfg, &metrics));

        match &backend {
            Ok(_) => tracing::info!(
                backend = ?cfg.backend,
                database = %cfg.database,
                "store configured"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "store unavailable; counter routes answer 500 until restarted"
            ),
        }

        Self {
            inner: Arc::new(AppStateInner { backend, metrics }),
        }
    }

    /// Wrap an already-built backend.
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                backend: Ok(backend),
                metrics: Arc::new(TallyMetrics::default()),
            }),
        }
    }

    fn backend(&self) -> Result<&Backend> {
        self.inner.backend.as_ref().map_err(|e| e.clone())
    }

    pub fn counter_service(&self) -> Result<CounterService> {
        Ok(CounterService::new(Arc::clone(&self.backend()?.visitors)))
    }

    pub fn likes_service(&self) -> Result<LikesService> {
        Ok(LikesService::new(Arc::clone(&self.backend()?.likes)))
    }

    pub fn catalog(&self) -> Result<Arc<dyn StoreCatalog>> {
        Ok(Arc::clone(&self.backend()?.catalog))
    }

    pub fn metrics(&self) -> &TallyMetrics {
        &self.inner.metrics
    }
}
