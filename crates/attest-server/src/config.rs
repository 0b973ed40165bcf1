//! Server configuration with validation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use attest_core::{KeyStoreConfig, Payload};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// Port of the reference deployment.
pub const DEFAULT_PORT: u16 = 3000;

/// Message served when no payload is configured.
pub const DEFAULT_MESSAGE: &str = "Confidential information from the server";

/// Main server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Where the key pair lives.
    pub keys: KeyStoreConfig,
    /// The payload served, signed, by `GET /data`.
    pub data: Payload,
    /// Allow cross-origin requests from any origin.
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            keys: KeyStoreConfig::default(),
            data: Payload::message(DEFAULT_MESSAGE),
            permissive_cors: true,
        }
    }
}

impl ServerConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| ServerError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.keys.validate()?;
        if self.data.is_empty() {
            return Err(ServerError::Config("served payload cannot be empty".into()));
        }
        Ok(())
    }
}
