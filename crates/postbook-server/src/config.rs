use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Settings for the HTTP server. Every field has a default, so a config
/// file only needs the keys it wants to change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Deadline applied to every request.
    pub request_timeout_ms: u64,
    /// Page size used when a list request has no `limit`.
    pub default_page_limit: usize,
    /// Upper bound for a requested `limit`; larger values are clamped.
    pub max_page_limit: usize,
    /// Answer cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            request_timeout_ms: 10_000,
            default_page_limit: postbook_store::DEFAULT_LIMIT,
            max_page_limit: 100,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded server config");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.max_page_limit == 0 {
            return Err(ServerError::Config("max_page_limit must be positive".into()));
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(ServerError::Config(format!(
                "default_page_limit {} exceeds max_page_limit {}",
                self.default_page_limit, self.max_page_limit
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ServerError::Config("request_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
