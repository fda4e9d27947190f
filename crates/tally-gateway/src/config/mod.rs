//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use tally_core::error::{Result, TallyError};

pub use schema::{GatewayConfig, ServerSection, StoreBackend, StoreSection};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "TALLY_CONFIG";
/// File read when `TALLY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "tally.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TallyError::InvalidConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| TallyError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config the way the binary does.
///
/// An explicitly named file must exist. The default file is optional and
/// built-in defaults apply when it is absent.
pub fn load_from_env() -> Result<GatewayConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => load_from_file(path.trim()),
        _ if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
        _ => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
            let cfg = GatewayConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}
