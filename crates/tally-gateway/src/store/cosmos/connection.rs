//! `AccountEndpoint=...;AccountKey=...;` connection strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use tally_core::error::{Result, TallyError};

/// Parsed store credential.
#[derive(Clone)]
pub struct ConnectionString {
    pub endpoint: String,
    pub key: Vec<u8>,
}

// Keep the key out of logs.
impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionString")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl ConnectionString {
    /// Parse a connection string read from the setting named `setting`.
    /// Errors name the setting, never echo the secret.
    pub fn parse(raw: &str, setting: &str) -> Result<Self> {
        let mut endpoint = None;
        let mut key = None;

        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((name, value)) = part.split_once('=') else {
                return Err(TallyError::InvalidConfig(format!(
                    "{setting}: malformed segment (expected Name=Value)"
                )));
            };
            match name.trim() {
                "AccountEndpoint" => endpoint = Some(value.trim().to_string()),
                "AccountKey" => key = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                TallyError::InvalidConfig(format!("{setting}: AccountEndpoint missing"))
            })?;
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(TallyError::InvalidConfig(format!(
                "{setting}: AccountEndpoint must be an http(s) url"
            )));
        }

        let key = key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TallyError::InvalidConfig(format!("{setting}: AccountKey missing")))?;
        let key = STANDARD
            .decode(key)
            .map_err(|_| {
                TallyError::InvalidConfig(format!("{setting}: AccountKey is not base64"))
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key,
        })
    }
}
