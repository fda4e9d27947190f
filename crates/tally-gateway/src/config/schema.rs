use std::net::SocketAddr;

use serde::Deserialize;
use tally_core::error::{Result, TallyError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TallyError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.store.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            TallyError::InvalidConfig(format!(
                "server.listen {:?} is not a socket address: {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:7071".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Cosmos,
    Memory,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_visitor_container")]
    pub visitor_container: String,

    #[serde(default = "default_likes_container")]
    pub likes_container: String,

    /// Env var holding the store connection string.
    #[serde(default = "default_connection_env")]
    pub connection_env: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database: default_database(),
            visitor_container: default_visitor_container(),
            likes_container: default_likes_container(),
            connection_env: default_connection_env(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("store.database", &self.database),
            ("store.visitor_container", &self.visitor_container),
            ("store.likes_container", &self.likes_container),
            ("store.connection_env", &self.connection_env),
        ];
        for (field, v) in names {
            if v.trim().is_empty() {
                return Err(TallyError::InvalidConfig(format!("{field} must not be empty")));
            }
        }
        if self.visitor_container == self.likes_container {
            return Err(TallyError::InvalidConfig(
                "store.visitor_container and store.likes_container must differ".into(),
            ));
        }
        Ok(())
    }
}

fn default_database() -> String {
    "ResumeDB".into()
}
fn default_visitor_container() -> String {
    "Counter".into()
}
fn default_likes_container() -> String {
    "Likes".into()
}
fn default_connection_env() -> String {
    "CosmosDbConnectionString".into()
}
